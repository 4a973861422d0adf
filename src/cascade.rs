/// Identifies one dispatched fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Generation counter for one cascading fetch target.
///
/// Every dispatch takes a fresh ticket; a result is only applied while its
/// ticket is still the newest one, so an older response that lands late
/// cannot overwrite a newer one.
#[derive(Debug, Default)]
pub struct FetchSlot {
    generation: u64,
}

impl FetchSlot {
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        Ticket(self.generation)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }
}
