use crate::cascade::{FetchSlot, Ticket};
use crate::data::loader;
use crate::data::store::ListStore;
use crate::data::{ChangeRequest, Client, ListNames, Project, TaskName};
use crate::error::CrmError;
use crate::form::{Field, FormState};
use crate::submit::{self, SubmitState};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info};

/// Which list a background fetch targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Clients,
    Projects,
    Tasks,
}

/// Rows returned by a finished fetch.
#[derive(Debug)]
pub enum Loaded {
    Clients(Vec<Client>),
    Projects(Vec<Project>),
    Tasks(Vec<TaskName>),
}

/// A fetch running on a worker thread.
pub struct FetchJob {
    pub kind: FetchKind,
    pub ticket: Ticket,
    handle: JoinHandle<Result<Loaded, CrmError>>,
}

/// A joined fetch, ready to be applied.
pub struct FetchOutcome {
    pub kind: FetchKind,
    pub ticket: Ticket,
    pub result: thread::Result<Result<Loaded, CrmError>>,
}

impl FetchJob {
    fn join(self) -> FetchOutcome {
        FetchOutcome {
            kind: self.kind,
            ticket: self.ticket,
            result: self.handle.join(),
        }
    }
}

pub struct App {
    store: Arc<dyn ListStore>,
    lists: ListNames,
    pub site_url: String,

    /// `None` until the first client fetch succeeds.
    pub form: Option<FormState>,

    client_slot: FetchSlot,
    project_slot: FetchSlot,
    task_slot: FetchSlot,
    pending: Vec<FetchJob>,

    pub submit_state: SubmitState,
    submit_handle: Option<JoinHandle<Result<ChangeRequest, CrmError>>>,

    // UI state
    pub show_help: bool,
    pub should_quit: bool,
}

impl App {
    /// Create the app and start loading clients.
    pub fn new(store: Arc<dyn ListStore>, lists: ListNames, site_url: String) -> Self {
        let mut app = App {
            store,
            lists,
            site_url,
            form: None,
            client_slot: FetchSlot::default(),
            project_slot: FetchSlot::default(),
            task_slot: FetchSlot::default(),
            pending: Vec::new(),
            submit_state: SubmitState::Idle,
            submit_handle: None,
            show_help: false,
            should_quit: false,
        };
        app.reload();
        app
    }

    /// Number of fetches still in flight.
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    pub fn is_loading_clients(&self) -> bool {
        self.pending.iter().any(|j| j.kind == FetchKind::Clients)
    }

    // ── Fetch dispatch ───────────────────────────────────────────────────

    /// Re-fetch clients and re-render the form from scratch.
    ///
    /// Project and task fetches already in flight belong to the old form and
    /// are invalidated.
    pub fn reload(&mut self) {
        let ticket = self.client_slot.begin();
        self.project_slot.begin();
        self.task_slot.begin();
        let store = Arc::clone(&self.store);
        let lists = self.lists.clone();
        self.spawn_fetch(FetchKind::Clients, ticket, move || {
            loader::fetch_clients(store.as_ref(), &lists).map(Loaded::Clients)
        });
    }

    fn dispatch_projects(&mut self, client_key: String) {
        let ticket = self.project_slot.begin();
        let store = Arc::clone(&self.store);
        let lists = self.lists.clone();
        debug!(client = %client_key, "loading projects");
        self.spawn_fetch(FetchKind::Projects, ticket, move || {
            loader::fetch_projects(store.as_ref(), &lists, &client_key).map(Loaded::Projects)
        });
    }

    fn dispatch_tasks(&mut self, project_id: i64) {
        let ticket = self.task_slot.begin();
        let store = Arc::clone(&self.store);
        let lists = self.lists.clone();
        debug!(project_id, "loading tasks");
        self.spawn_fetch(FetchKind::Tasks, ticket, move || {
            loader::fetch_tasks(store.as_ref(), &lists, project_id).map(Loaded::Tasks)
        });
    }

    fn spawn_fetch<F>(&mut self, kind: FetchKind, ticket: Ticket, job: F)
    where
        F: FnOnce() -> Result<Loaded, CrmError> + Send + 'static,
    {
        self.pending.push(FetchJob {
            kind,
            ticket,
            handle: thread::spawn(job),
        });
    }

    fn slot(&self, kind: FetchKind) -> &FetchSlot {
        match kind {
            FetchKind::Clients => &self.client_slot,
            FetchKind::Projects => &self.project_slot,
            FetchKind::Tasks => &self.task_slot,
        }
    }

    fn list_name(&self, kind: FetchKind) -> &str {
        match kind {
            FetchKind::Clients => &self.lists.clients,
            FetchKind::Projects => &self.lists.projects,
            FetchKind::Tasks => &self.lists.tasks,
        }
    }

    // ── Completion ───────────────────────────────────────────────────────

    /// Poll background work (call each tick).
    pub fn tick(&mut self) {
        let mut waiting = Vec::new();
        for job in std::mem::take(&mut self.pending) {
            if job.handle.is_finished() {
                let outcome = job.join();
                self.apply_fetch(outcome);
            } else {
                waiting.push(job);
            }
        }
        waiting.append(&mut self.pending);
        self.pending = waiting;

        self.submit_check_completion();
    }

    /// Apply a finished fetch if it is still the newest for its target.
    pub fn apply_fetch(&mut self, outcome: FetchOutcome) {
        let list = self.list_name(outcome.kind).to_string();
        if !self.slot(outcome.kind).is_current(outcome.ticket) {
            debug!(list = %list, "dropping superseded response");
            return;
        }

        let loaded = match outcome.result {
            Ok(Ok(loaded)) => loaded,
            Ok(Err(e)) => {
                error!(list = %list, kind = e.kind(), error = %e, "error fetching list items");
                return;
            }
            Err(_) => {
                error!(list = %list, "fetch worker panicked");
                return;
            }
        };

        match loaded {
            Loaded::Clients(clients) => {
                debug!(count = clients.len(), "clients loaded");
                self.form = Some(FormState::new(clients));
            }
            Loaded::Projects(projects) => {
                if let Some(form) = &mut self.form {
                    form.replace_projects(projects);
                }
            }
            Loaded::Tasks(tasks) => {
                if let Some(form) = &mut self.form {
                    form.replace_tasks(tasks);
                }
            }
        }
    }

    // ── Submit ───────────────────────────────────────────────────────────

    /// Start a submission from the current form values.
    pub fn submit(&mut self) {
        if self.submit_state == SubmitState::Submitting {
            return;
        }
        let values = match &self.form {
            Some(form) => form.values(),
            None => return,
        };

        let store = Arc::clone(&self.store);
        let lists = self.lists.clone();
        self.submit_state = SubmitState::Submitting;
        self.submit_handle = Some(thread::spawn(move || {
            submit::submit_change_request(store.as_ref(), &lists, &values)
        }));
    }

    /// Poll for submission completion (call each tick).
    pub fn submit_check_completion(&mut self) {
        let handle = match self.submit_handle.take() {
            Some(h) => h,
            None => return,
        };

        if handle.is_finished() {
            self.finish_submit(handle.join());
        } else {
            self.submit_handle = Some(handle);
        }
    }

    fn finish_submit(&mut self, result: thread::Result<Result<ChangeRequest, CrmError>>) {
        self.submit_state = SubmitState::Idle;
        match result {
            Ok(Ok(request)) => {
                info!(
                    task_id = request.task_id,
                    client = %request.client_id,
                    project = %request.project_id,
                    "change request submitted"
                );
                if let Some(form) = &mut self.form {
                    form.reset();
                }
            }
            Ok(Err(e)) => {
                error!(kind = e.kind(), error = %e, "error submitting change request");
            }
            Err(_) => {
                error!("submit worker panicked");
            }
        }
    }

    // ── Input ────────────────────────────────────────────────────────────

    /// Route a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.show_help {
            self.show_help = false;
            return;
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Esc) => {
                self.should_quit = true;
                return;
            }
            (_, KeyCode::F(1)) => {
                self.show_help = true;
                return;
            }
            (_, KeyCode::F(5)) => {
                // A pending submit would reset the re-rendered form.
                if self.submit_state == SubmitState::Idle {
                    self.reload();
                }
                return;
            }
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => {
                self.submit();
                return;
            }
            _ => {}
        }

        let focus = match &self.form {
            Some(form) => form.focus,
            None => {
                if key.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
                return;
            }
        };

        match key.code {
            KeyCode::Tab => self.focus_next(),
            KeyCode::BackTab => self.focus_prev(),
            KeyCode::Enter if focus == Field::Submit => self.submit(),
            KeyCode::Enter if focus.is_select() => {
                self.select_changed(focus);
                self.focus_next();
            }
            KeyCode::Enter => self.focus_next(),
            KeyCode::Up | KeyCode::Char('k') if focus.is_select() => {
                self.move_selection(focus, false)
            }
            KeyCode::Down | KeyCode::Char('j') if focus.is_select() => {
                self.move_selection(focus, true)
            }
            KeyCode::Up => self.focus_prev(),
            KeyCode::Down => self.focus_next(),
            KeyCode::Char('q') if !focus.is_text() => self.should_quit = true,
            _ => {
                if let Some(input) = self.form.as_mut().and_then(|f| f.input_mut(focus)) {
                    use tui_input::backend::crossterm::EventHandler;
                    input.handle_event(&crossterm::event::Event::Key(key));
                }
            }
        }
    }

    fn focus_next(&mut self) {
        if let Some(form) = &mut self.form {
            form.focus = form.focus.next();
        }
    }

    fn focus_prev(&mut self) {
        if let Some(form) = &mut self.form {
            form.focus = form.focus.prev();
        }
    }

    fn move_selection(&mut self, field: Field, down: bool) {
        let form = match &mut self.form {
            Some(f) => f,
            None => return,
        };
        let changed = match (field, down) {
            (Field::Client, true) => form.clients.select_next(),
            (Field::Client, false) => form.clients.select_prev(),
            (Field::Project, true) => form.projects.select_next(),
            (Field::Project, false) => form.projects.select_prev(),
            (Field::Task, true) => form.tasks.select_next(),
            (Field::Task, false) => form.tasks.select_prev(),
            _ => false,
        };
        if changed {
            self.select_changed(field);
        }
    }

    /// Fire the `change` event for a select: load whatever depends on it.
    fn select_changed(&mut self, field: Field) {
        let form = match &self.form {
            Some(f) => f,
            None => return,
        };
        match field {
            Field::Client => {
                if let Some(client) = form.clients.selected() {
                    let key = client.name.clone();
                    self.dispatch_projects(key);
                }
            }
            Field::Project => {
                if let Some(project) = form.projects.selected() {
                    let id = project.id;
                    self.dispatch_tasks(id);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
impl App {
    /// Join every outstanding job, applying results in dispatch order.
    fn settle(&mut self) {
        while !self.pending.is_empty() || self.submit_handle.is_some() {
            for job in std::mem::take(&mut self.pending) {
                let outcome = job.join();
                self.apply_fetch(outcome);
            }
            if let Some(handle) = self.submit_handle.take() {
                self.finish_submit(handle.join());
            }
        }
    }

    /// Join outstanding fetches without applying them.
    fn take_outcomes(&mut self) -> Vec<FetchOutcome> {
        std::mem::take(&mut self.pending)
            .into_iter()
            .map(FetchJob::join)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::store::fake::FakeStore;
    use crate::data::store::EqFilter;
    use crate::form::OptionItem;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn scripted_store() -> Arc<FakeStore> {
        let store = FakeStore::new();
        store
            .respond(
                "ClientName",
                None,
                json!([
                    {"ID": 1, "Client": "Acme"},
                    {"ID": 2, "Client": "Globex"},
                    {"ID": 3, "Client": "Initech"}
                ]),
            )
            .respond(
                "ClientProject",
                Some("Client eq 'Acme'"),
                json!([{"ID": 10, "Project": "Website"}]),
            )
            .respond(
                "ClientProject",
                Some("Client eq 'Globex'"),
                json!([{"ID": 20, "Project": "Migration"}, {"ID": 21, "Project": "Audit"}]),
            )
            .respond(
                "ClientProject",
                Some("Client eq 'Initech'"),
                json!([{"ID": 30, "Project": "TPS Reports"}]),
            )
            .respond(
                "ProjectTask",
                Some("ProjectId eq '10'"),
                json!([{"Task": "Design"}, {"Task": "Build"}]),
            )
            .respond("ProjectTask", Some("Task eq 'Design'"), json!([{"Id": 42}]));
        Arc::new(store)
    }

    fn app_with(store: &Arc<FakeStore>) -> App {
        let dyn_store: Arc<dyn ListStore> = store.clone();
        let mut app = App::new(
            dyn_store,
            ListNames::default(),
            "https://contoso.sharepoint.com/sites/crm".to_string(),
        );
        app.settle();
        app
    }

    /// Select Acme → Website → Design and fill the text fields.
    fn fill_form(app: &mut App) {
        app.handle_key(key(KeyCode::Enter)); // client
        app.settle();
        app.handle_key(key(KeyCode::Enter)); // project
        app.settle();
        app.handle_key(key(KeyCode::Tab)); // task stays on "Design"
        type_text(app, "Scope");
        app.handle_key(key(KeyCode::Tab));
        type_text(app, "2024-05-01");
        app.handle_key(key(KeyCode::Tab));
        type_text(app, "Extend sprint");
        app.handle_key(key(KeyCode::Tab));
    }

    fn filters(store: &FakeStore, list: &str) -> Vec<Option<EqFilter>> {
        store
            .queries()
            .into_iter()
            .filter(|q| q.list == list)
            .map(|q| q.filter)
            .collect()
    }

    #[test]
    fn test_client_options_match_fetched_rows() {
        let store = scripted_store();
        let app = app_with(&store);
        let form = app.form.as_ref().unwrap();
        let pairs: Vec<(String, String)> = form
            .clients
            .options()
            .iter()
            .map(|c| (c.value(), c.label().to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("1".to_string(), "Acme".to_string()),
                ("2".to_string(), "Globex".to_string()),
                ("3".to_string(), "Initech".to_string()),
            ]
        );
        assert!(form.projects.options().is_empty());
    }

    #[test]
    fn test_client_fetch_failure_leaves_form_absent() {
        let store = FakeStore::new();
        store.fail("ClientName", None, 500);
        let store = Arc::new(store);
        let app = app_with(&store);
        assert!(app.form.is_none());
    }

    #[test]
    fn test_reload_after_failure_renders_form() {
        let store = FakeStore::new();
        store.fail("ClientName", None, 500);
        let store = Arc::new(store);
        let mut app = app_with(&store);
        store.respond("ClientName", None, json!([{"ID": 1, "Client": "Acme"}]));
        app.handle_key(key(KeyCode::F(5)));
        app.settle();
        assert_eq!(app.form.unwrap().clients.options().len(), 1);
    }

    #[test]
    fn test_selecting_client_fetches_projects_by_name() {
        let store = scripted_store();
        let mut app = app_with(&store);
        app.handle_key(key(KeyCode::Enter));
        app.settle();

        assert_eq!(
            filters(&store, "ClientProject"),
            vec![Some(EqFilter::new("Client", "Acme"))]
        );
        let form = app.form.as_ref().unwrap();
        assert_eq!(form.projects.options()[0].name, "Website");
        assert_eq!(form.focus, Field::Project);
    }

    #[test]
    fn test_selecting_project_fetches_tasks_by_id() {
        let store = scripted_store();
        let mut app = app_with(&store);
        app.handle_key(key(KeyCode::Enter));
        app.settle();
        app.handle_key(key(KeyCode::Enter));
        app.settle();

        assert_eq!(
            filters(&store, "ProjectTask"),
            vec![Some(EqFilter::new("ProjectId", "10"))]
        );
        let tasks: Vec<&str> = app
            .form
            .as_ref()
            .unwrap()
            .tasks
            .options()
            .iter()
            .map(|t| t.as_str())
            .collect();
        assert_eq!(tasks, vec!["Design", "Build"]);
    }

    #[test]
    fn test_client_change_replaces_project_options() {
        let store = scripted_store();
        let mut app = app_with(&store);
        app.handle_key(key(KeyCode::Enter));
        app.settle();
        app.handle_key(key(KeyCode::BackTab));
        app.handle_key(key(KeyCode::Down));
        app.settle();

        let names: Vec<String> = app
            .form
            .as_ref()
            .unwrap()
            .projects
            .options()
            .iter()
            .map(|p| p.name.clone())
            .collect();
        assert_eq!(names, vec!["Migration", "Audit"]);
    }

    #[test]
    fn test_select_without_change_fetches_nothing() {
        let store = scripted_store();
        let mut app = app_with(&store);
        app.handle_key(key(KeyCode::Up));
        app.settle();
        assert!(filters(&store, "ClientProject").is_empty());
    }

    #[test]
    fn test_stale_project_response_is_dropped() {
        let store = scripted_store();
        let mut app = app_with(&store);
        app.handle_key(key(KeyCode::Down)); // Globex
        app.handle_key(key(KeyCode::Down)); // Initech
        let mut outcomes = app.take_outcomes();
        assert_eq!(outcomes.len(), 2);

        // Newest lands first, the older one afterwards.
        outcomes.reverse();
        for outcome in outcomes {
            app.apply_fetch(outcome);
        }

        let form = app.form.as_ref().unwrap();
        assert_eq!(form.projects.options().len(), 1);
        assert_eq!(form.projects.options()[0].name, "TPS Reports");
    }

    #[test]
    fn test_reload_drops_projects_dispatched_before_it() {
        let store = scripted_store();
        let mut app = app_with(&store);
        app.handle_key(key(KeyCode::Down)); // Globex
        let held = app.take_outcomes();
        assert_eq!(held.len(), 1);

        app.handle_key(key(KeyCode::F(5)));
        app.settle();
        for outcome in held {
            app.apply_fetch(outcome);
        }

        let form = app.form.as_ref().unwrap();
        assert_eq!(form.clients.selected().unwrap().name, "Acme");
        assert!(form.projects.options().is_empty());
    }

    #[test]
    fn test_reload_ignored_while_submitting() {
        let store = scripted_store();
        let mut app = app_with(&store);
        fill_form(&mut app);
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.submit_state, SubmitState::Submitting);

        app.handle_key(key(KeyCode::F(5)));
        assert!(!app.is_loading_clients());
        app.settle();

        let client_reads = store
            .queries()
            .into_iter()
            .filter(|q| q.list == "ClientName")
            .count();
        assert_eq!(client_reads, 1);
        assert_eq!(store.created().len(), 1);
    }

    #[test]
    fn test_failed_project_fetch_keeps_previous_options() {
        let store = scripted_store();
        store.fail("ClientProject", Some("Client eq 'Globex'"), 500);
        let mut app = app_with(&store);
        app.handle_key(key(KeyCode::Enter)); // Acme → Website
        app.settle();
        app.handle_key(key(KeyCode::BackTab));
        app.handle_key(key(KeyCode::Down)); // Globex fails
        app.settle();

        let form = app.form.as_ref().unwrap();
        assert_eq!(form.projects.options()[0].name, "Website");
    }

    #[test]
    fn test_options_render_before_form_is_noop() {
        let store = Arc::new(FakeStore::new());
        let dyn_store: Arc<dyn ListStore> = store.clone();
        let mut app = App::new(dyn_store, ListNames::default(), String::new());
        let _ = app.take_outcomes();

        let ticket = app.project_slot.begin();
        app.apply_fetch(FetchOutcome {
            kind: FetchKind::Projects,
            ticket,
            result: Ok(Ok(Loaded::Projects(vec![Project {
                id: 10,
                name: "Website".to_string(),
            }]))),
        });
        assert!(app.form.is_none());
    }

    #[test]
    fn test_submit_unknown_task_does_not_create_or_reset() {
        let store = scripted_store();
        let mut app = app_with(&store);
        app.handle_key(key(KeyCode::Enter));
        app.settle();
        app.handle_key(key(KeyCode::Enter));
        app.settle();
        app.handle_key(key(KeyCode::Down)); // task "Build" has no record
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "Scope");
        app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        app.settle();

        assert!(store.created().is_empty());
        let form = app.form.as_ref().unwrap();
        assert_eq!(form.request_type.value(), "Scope");
        assert_eq!(form.tasks.value(), "Build");
        assert_eq!(app.submit_state, SubmitState::Idle);
    }

    #[test]
    fn test_submit_creates_once_and_resets() {
        let store = scripted_store();
        let mut app = app_with(&store);
        fill_form(&mut app);
        assert_eq!(app.form.as_ref().unwrap().focus, Field::Submit);

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.submit_state, SubmitState::Submitting);
        app.settle();

        let created = store.created();
        assert_eq!(created.len(), 1);
        assert_eq!(
            created[0].1,
            json!({
                "Description": "Extend sprint",
                "ClientId": "1",
                "ProjectId": "10",
                "TaskId": 42,
                "RequestType": "Scope",
                "StartDate": "2024-05-01"
            })
        );
        let form = app.form.as_ref().unwrap();
        assert_eq!(form.request_type.value(), "");
        assert_eq!(form.description.value(), "");
        assert_eq!(app.submit_state, SubmitState::Idle);
    }

    #[test]
    fn test_failed_create_keeps_fields() {
        let store = scripted_store();
        store.fail_create(500);
        let mut app = app_with(&store);
        fill_form(&mut app);
        app.handle_key(key(KeyCode::Enter));
        app.settle();

        assert_eq!(store.created().len(), 1);
        let form = app.form.as_ref().unwrap();
        assert_eq!(form.request_type.value(), "Scope");
        assert_eq!(form.start_date.value(), "2024-05-01");
        assert_eq!(form.description.value(), "Extend sprint");
    }

    #[test]
    fn test_second_submit_ignored_while_submitting() {
        let store = scripted_store();
        let mut app = app_with(&store);
        fill_form(&mut app);
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Enter));
        app.settle();
        assert_eq!(store.created().len(), 1);
    }

    #[test]
    fn test_q_types_into_text_fields() {
        let store = scripted_store();
        let mut app = app_with(&store);
        for _ in 0..3 {
            app.handle_key(key(KeyCode::Tab));
        }
        type_text(&mut app, "quick");
        assert!(!app.should_quit);
        assert_eq!(app.form.as_ref().unwrap().request_type.value(), "quick");
    }

    #[test]
    fn test_help_swallows_next_key() {
        let store = scripted_store();
        let mut app = app_with(&store);
        app.handle_key(key(KeyCode::F(1)));
        assert!(app.show_help);
        app.handle_key(key(KeyCode::Esc));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }
}
