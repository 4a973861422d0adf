pub mod loader;
pub mod sharepoint;
pub mod store;

use serde::{Deserialize, Serialize};

/// A row from the clients list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Client {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Client", default, deserialize_with = "null_as_empty")]
    pub name: String,
}

/// A row from the projects list, scoped to one client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Project", default, deserialize_with = "null_as_empty")]
    pub name: String,
}

/// Tasks only carry their display text locally; the record id is resolved
/// by lookup at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskName(pub String);

impl TaskName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Deserialize)]
pub(crate) struct TaskRow {
    #[serde(rename = "Task", default, deserialize_with = "null_as_empty")]
    pub task: String,
}

#[derive(Deserialize)]
pub(crate) struct IdRow {
    #[serde(rename = "Id")]
    pub id: i64,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of the create request sent to the change-request list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangeRequest {
    pub description: String,
    pub client_id: String,
    pub project_id: String,
    pub task_id: i64,
    pub request_type: String,
    pub start_date: String,
}

/// Titles of the four backing lists.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListNames {
    pub clients: String,
    pub projects: String,
    pub tasks: String,
    pub requests: String,
}

impl Default for ListNames {
    fn default() -> Self {
        ListNames {
            clients: "ClientName".to_string(),
            projects: "ClientProject".to_string(),
            tasks: "ProjectTask".to_string(),
            requests: "CRMList".to_string(),
        }
    }
}
