use crate::data::{Client, Project, TaskName};
use chrono::NaiveDate;
use tui_input::Input;

/// Form controls in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Client,
    Project,
    Task,
    RequestType,
    StartDate,
    Description,
    Submit,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Client,
        Field::Project,
        Field::Task,
        Field::RequestType,
        Field::StartDate,
        Field::Description,
        Field::Submit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Client => "Client:",
            Field::Project => "Project:",
            Field::Task => "Task:",
            Field::RequestType => "Request Type :",
            Field::StartDate => "Start Date:",
            Field::Description => "Description:",
            Field::Submit => "Submit",
        }
    }

    pub fn is_select(self) -> bool {
        matches!(self, Field::Client | Field::Project | Field::Task)
    }

    pub fn is_text(self) -> bool {
        matches!(self, Field::RequestType | Field::StartDate | Field::Description)
    }

    fn index(self) -> usize {
        Field::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Field {
        Field::ALL[(self.index() + 1) % Field::ALL.len()]
    }

    pub fn prev(self) -> Field {
        let i = self.index();
        Field::ALL[if i == 0 { Field::ALL.len() - 1 } else { i - 1 }]
    }
}

/// Something that can be shown as a `<select>` option.
pub trait OptionItem {
    /// The submitted value.
    fn value(&self) -> String;
    /// The visible text.
    fn label(&self) -> &str;
}

impl OptionItem for Client {
    fn value(&self) -> String {
        self.id.to_string()
    }
    fn label(&self) -> &str {
        &self.name
    }
}

impl OptionItem for Project {
    fn value(&self) -> String {
        self.id.to_string()
    }
    fn label(&self) -> &str {
        &self.name
    }
}

impl OptionItem for TaskName {
    fn value(&self) -> String {
        self.0.clone()
    }
    fn label(&self) -> &str {
        &self.0
    }
}

/// Option list with a single selection. A non-empty list always has one
/// option selected, like a browser `<select>`.
#[derive(Debug, Clone)]
pub struct Select<T> {
    options: Vec<T>,
    selected: Option<usize>,
}

impl<T> Default for Select<T> {
    fn default() -> Self {
        Select {
            options: Vec::new(),
            selected: None,
        }
    }
}

impl<T: OptionItem> Select<T> {
    pub fn new(options: Vec<T>) -> Self {
        let selected = if options.is_empty() { None } else { Some(0) };
        Select { options, selected }
    }

    /// Drop every option and rebuild from `options`.
    pub fn replace(&mut self, options: Vec<T>) {
        *self = Select::new(options);
    }

    pub fn options(&self) -> &[T] {
        &self.options
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected.and_then(|i| self.options.get(i))
    }

    /// Submitted value of the selection, or empty when there are no options.
    pub fn value(&self) -> String {
        self.selected().map(|o| o.value()).unwrap_or_default()
    }

    /// Move selection down. Returns true if the selection changed.
    pub fn select_next(&mut self) -> bool {
        match self.selected {
            Some(i) if i + 1 < self.options.len() => {
                self.selected = Some(i + 1);
                true
            }
            _ => false,
        }
    }

    /// Move selection up. Returns true if the selection changed.
    pub fn select_prev(&mut self) -> bool {
        match self.selected {
            Some(i) if i > 0 => {
                self.selected = Some(i - 1);
                true
            }
            _ => false,
        }
    }

    fn reset(&mut self) {
        self.selected = if self.options.is_empty() { None } else { Some(0) };
    }
}

/// The six raw values read from the form at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub client: String,
    pub project: String,
    pub task: String,
    pub request_type: String,
    pub start_date: String,
    pub description: String,
}

/// Everything the change-request form currently shows.
pub struct FormState {
    pub clients: Select<Client>,
    pub projects: Select<Project>,
    pub tasks: Select<TaskName>,
    pub request_type: Input,
    pub start_date: Input,
    pub description: Input,
    pub focus: Field,
}

impl FormState {
    /// Fresh form: populated client select, empty project and task selects.
    pub fn new(clients: Vec<Client>) -> Self {
        FormState {
            clients: Select::new(clients),
            projects: Select::default(),
            tasks: Select::default(),
            request_type: Input::default(),
            start_date: Input::default(),
            description: Input::default(),
            focus: Field::Client,
        }
    }

    pub fn replace_projects(&mut self, projects: Vec<Project>) {
        self.projects.replace(projects);
    }

    pub fn replace_tasks(&mut self, tasks: Vec<TaskName>) {
        self.tasks.replace(tasks);
    }

    pub fn input_mut(&mut self, field: Field) -> Option<&mut Input> {
        match field {
            Field::RequestType => Some(&mut self.request_type),
            Field::StartDate => Some(&mut self.start_date),
            Field::Description => Some(&mut self.description),
            _ => None,
        }
    }

    pub fn input(&self, field: Field) -> Option<&Input> {
        match field {
            Field::RequestType => Some(&self.request_type),
            Field::StartDate => Some(&self.start_date),
            Field::Description => Some(&self.description),
            _ => None,
        }
    }

    pub fn values(&self) -> FormValues {
        FormValues {
            client: self.clients.value(),
            project: self.projects.value(),
            task: self.tasks.value(),
            request_type: self.request_type.value().to_string(),
            start_date: normalize_date(self.start_date.value()),
            description: self.description.value().to_string(),
        }
    }

    /// Clear text fields and return each select to its first option.
    /// Option lists are kept.
    pub fn reset(&mut self) {
        self.clients.reset();
        self.projects.reset();
        self.tasks.reset();
        self.request_type.reset();
        self.start_date.reset();
        self.description.reset();
    }
}

/// `YYYY-MM-DD` for a valid calendar date, empty otherwise.
pub fn normalize_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
