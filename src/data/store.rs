use crate::error::CrmError;
use serde_json::Value;

/// Equality filter on a single column, rendered as an OData expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqFilter {
    pub field: String,
    pub value: String,
}

impl EqFilter {
    pub fn new(field: &str, value: impl Into<String>) -> Self {
        EqFilter {
            field: field.to_string(),
            value: value.into(),
        }
    }

    /// `Field eq 'value'`, with embedded single quotes doubled.
    pub fn to_odata(&self) -> String {
        format!("{} eq '{}'", self.field, self.value.replace('\'', "''"))
    }
}

/// A read against one list: which columns to return and an optional filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub list: String,
    pub select: Vec<String>,
    pub filter: Option<EqFilter>,
}

impl ListQuery {
    pub fn new(list: &str, select: &[&str]) -> Self {
        ListQuery {
            list: list.to_string(),
            select: select.iter().map(|s| s.to_string()).collect(),
            filter: None,
        }
    }

    pub fn filter(mut self, field: &str, value: impl Into<String>) -> Self {
        self.filter = Some(EqFilter::new(field, value));
        self
    }
}

/// The remote list store the form reads from and writes to.
///
/// Calls block the current thread; the app runs them on worker threads.
pub trait ListStore: Send + Sync {
    /// Return the raw rows matching `query`.
    fn get_items(&self, query: &ListQuery) -> Result<Vec<Value>, CrmError>;

    /// Create a new item in `list`.
    fn add_item(&self, list: &str, body: &Value) -> Result<(), CrmError>;
}
