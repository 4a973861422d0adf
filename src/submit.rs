use crate::data::loader;
use crate::data::store::ListStore;
use crate::data::{ChangeRequest, ListNames};
use crate::error::CrmError;
use crate::form::FormValues;

/// Whether a submission is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting,
}

/// Resolve the task id, then create the change request.
///
/// Returns the payload that was stored. Any `Err` means the form must be
/// left as it is. A lookup that finds no record is `LookupMiss`; a lookup
/// request that fails keeps its own error so the caller logs the real cause.
pub fn submit_change_request(
    store: &dyn ListStore,
    lists: &ListNames,
    values: &FormValues,
) -> Result<ChangeRequest, CrmError> {
    let task_id = match loader::lookup_item_id(store, &lists.tasks, "Task", &values.task)? {
        Some(id) => id,
        None => {
            return Err(CrmError::LookupMiss {
                task: values.task.clone(),
            })
        }
    };

    let request = ChangeRequest {
        description: values.description.clone(),
        client_id: values.client.clone(),
        project_id: values.project.clone(),
        task_id,
        request_type: values.request_type.clone(),
        start_date: values.start_date.clone(),
    };

    let body = serde_json::to_value(&request).map_err(CrmError::Encode)?;
    store.add_item(&lists.requests, &body)?;
    Ok(request)
}
