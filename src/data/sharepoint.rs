use crate::data::store::{ListQuery, ListStore};
use crate::error::CrmError;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const NO_METADATA_JSON: &str = "application/json;odata=nometadata";

#[derive(Deserialize)]
struct ItemsEnvelope {
    #[serde(default)]
    value: Vec<Value>,
}

/// SharePoint REST list store rooted at a site URL.
pub struct SharePointStore {
    site: Url,
    client: Client,
    access_token: Option<String>,
}

impl SharePointStore {
    /// Build a store for `site_url`. `timeout` of `None` leaves requests unbounded.
    pub fn new(
        site_url: &str,
        access_token: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, CrmError> {
        let site = Url::parse(site_url.trim_end_matches('/'))
            .map_err(|_| CrmError::InvalidSiteUrl(site_url.to_string()))?;
        if site.cannot_be_a_base() {
            return Err(CrmError::InvalidSiteUrl(site_url.to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(SharePointStore {
            site,
            client,
            access_token,
        })
    }

    fn authorize(
        &self,
        request: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// `{site}/_api/web/lists/getbytitle('{list}')/items`, plus `$select`/`$filter`
/// when the query carries them.
pub fn items_url(site: &Url, list: &str, query: Option<&ListQuery>) -> Result<Url, CrmError> {
    let raw = format!(
        "{}/_api/web/lists/getbytitle('{}')/items",
        site.as_str().trim_end_matches('/'),
        list.replace('\'', "''")
    );
    let mut url = Url::parse(&raw).map_err(|_| CrmError::InvalidSiteUrl(site.to_string()))?;
    if let Some(q) = query {
        let mut pairs = url.query_pairs_mut();
        if !q.select.is_empty() {
            pairs.append_pair("$select", &q.select.join(","));
        }
        if let Some(filter) = &q.filter {
            pairs.append_pair("$filter", &filter.to_odata());
        }
    }
    Ok(url)
}

impl ListStore for SharePointStore {
    fn get_items(&self, query: &ListQuery) -> Result<Vec<Value>, CrmError> {
        let url = items_url(&self.site, &query.list, Some(query))?;
        debug!(list = %query.list, %url, "GET list items");

        let response = self
            .authorize(self.client.get(url))
            .header(ACCEPT, NO_METADATA_JSON)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrmError::Fetch {
                list: query.list.clone(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.text()?;
        let envelope: ItemsEnvelope =
            serde_json::from_str(&body).map_err(|source| CrmError::Decode {
                list: query.list.clone(),
                source,
            })?;
        Ok(envelope.value)
    }

    fn add_item(&self, list: &str, body: &Value) -> Result<(), CrmError> {
        let url = items_url(&self.site, list, None)?;
        debug!(list, %url, "POST list item");

        let response = self
            .authorize(self.client.post(url))
            .header(CONTENT_TYPE, NO_METADATA_JSON)
            .header(ACCEPT, NO_METADATA_JSON)
            .body(body.to_string())
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrmError::Submit {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }
        Ok(())
    }
}
