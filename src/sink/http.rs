use std::time::Duration;

use tracing::{debug, warn};

use crate::capture::capture_model::CapturedCredential;
use crate::sink::sink::AutofillSink;

// ============================================================================
// HTTP sink: hands captures to an autofill service over JSON
// ============================================================================

/// POSTs each capture as a JSON body (`originURL`, `username`, `password`,
/// `fields`) to the autofill service endpoint.
///
/// Transport errors and non-success statuses are logged and dropped.
pub struct HttpSink {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpSink {
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl AutofillSink for HttpSink {
    fn on_form_submitted(&self, credential: CapturedCredential) {
        let response = self.client.post(&self.endpoint).json(&credential).send();

        match response {
            Ok(r) if r.status().is_success() => {
                debug!(endpoint = %self.endpoint, "delivered capture");
            }
            Ok(r) => {
                warn!(endpoint = %self.endpoint, status = %r.status(), "autofill service rejected capture");
            }
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "could not reach autofill service");
            }
        }
    }
}
