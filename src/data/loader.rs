use crate::data::store::{ListQuery, ListStore};
use crate::data::{Client, IdRow, ListNames, Project, TaskName, TaskRow};
use crate::error::CrmError;
use serde::de::DeserializeOwned;
use serde_json::Value;

fn decode_rows<T: DeserializeOwned>(list: &str, rows: Vec<Value>) -> Result<Vec<T>, CrmError> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(row).map_err(|source| CrmError::Decode {
                list: list.to_string(),
                source,
            })
        })
        .collect()
}

/// All clients, in list order.
pub fn fetch_clients(store: &dyn ListStore, lists: &ListNames) -> Result<Vec<Client>, CrmError> {
    let query = ListQuery::new(&lists.clients, &["ID", "Client"]);
    let rows = store.get_items(&query)?;
    decode_rows(&lists.clients, rows)
}

/// Projects whose `Client` column equals `client_key`.
pub fn fetch_projects(
    store: &dyn ListStore,
    lists: &ListNames,
    client_key: &str,
) -> Result<Vec<Project>, CrmError> {
    let query = ListQuery::new(&lists.projects, &["ID", "Project"]).filter("Client", client_key);
    let rows = store.get_items(&query)?;
    decode_rows(&lists.projects, rows)
}

/// Task names belonging to `project_id`.
pub fn fetch_tasks(
    store: &dyn ListStore,
    lists: &ListNames,
    project_id: i64,
) -> Result<Vec<TaskName>, CrmError> {
    let query =
        ListQuery::new(&lists.tasks, &["Task"]).filter("ProjectId", project_id.to_string());
    let rows = store.get_items(&query)?;
    let tasks: Vec<TaskRow> = decode_rows(&lists.tasks, rows)?;
    Ok(tasks.into_iter().map(|t| TaskName(t.task)).collect())
}

/// Resolve the id of the first item in `list` whose `field` equals `value`.
pub fn lookup_item_id(
    store: &dyn ListStore,
    list: &str,
    field: &str,
    value: &str,
) -> Result<Option<i64>, CrmError> {
    let query = ListQuery::new(list, &["Id"]).filter(field, value);
    let rows = store.get_items(&query)?;
    let ids: Vec<IdRow> = decode_rows(list, rows)?;
    Ok(ids.first().map(|r| r.id))
}
