use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{capture::capture_model::CapturedCredential, page::document::NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    FormAttached,
    Captured,
    Suppressed,
}

#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub kind: TraceKind,
    pub page_url: String,

    pub form: Option<NodeId>,

    pub username: Option<String>,
    pub password_fingerprint: Option<String>,
    pub field_names: Vec<String>,

    pub suppression_reason: Option<String>,
}

impl TraceEvent {
    pub fn now(kind: TraceKind, page_url: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            kind,
            page_url: page_url.to_string(),
            form: None,
            username: None,
            password_fingerprint: None,
            field_names: vec![],
            suppression_reason: None,
        }
    }

    pub fn with_form(mut self, form: NodeId) -> Self {
        self.form = Some(form);
        self
    }

    /// Record what was captured. The password is only kept as a fingerprint.
    pub fn with_credential(mut self, credential: &CapturedCredential) -> Self {
        self.username = Some(credential.username.clone());
        self.password_fingerprint = Some(fingerprint(&credential.password));
        self.field_names = credential.fields.names().map(str::to_string).collect();
        self
    }

    pub fn with_suppression(mut self, reason: impl ToString) -> Self {
        self.suppression_reason = Some(reason.to_string());
        self
    }
}

pub fn fingerprint(secret: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}
