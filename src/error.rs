use thiserror::Error;

/// Failures raised while talking to the list store.
///
/// None of these reach the form UI; every boundary that receives one logs
/// it and leaves the displayed state alone.
#[derive(Debug, Error)]
pub enum CrmError {
    #[error("failed to fetch items from list '{list}': HTTP {status} {reason}")]
    Fetch {
        list: String,
        status: u16,
        reason: String,
    },

    #[error("no task record found for '{task}'")]
    LookupMiss { task: String },

    #[error("failed to submit change request: HTTP {status} {reason}")]
    Submit { status: u16, reason: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected item shape in list '{list}': {source}")]
    Decode {
        list: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode change request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("invalid site URL '{0}'")]
    InvalidSiteUrl(String),
}

impl CrmError {
    /// Short tag used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            CrmError::Fetch { .. } => "fetch_failure",
            CrmError::LookupMiss { .. } => "lookup_miss",
            CrmError::Submit { .. } => "submit_failure",
            CrmError::Transport(_) => "transport",
            CrmError::Decode { .. } => "decode",
            CrmError::Encode(_) => "encode",
            CrmError::InvalidSiteUrl(_) => "config",
        }
    }
}
