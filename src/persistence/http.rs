//! Remote form store over the `/api/forms` endpoints.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{FormError, Result};
use crate::model::{FormConfig, FormPatch};
use crate::persistence::{FormStore, NewForm};

const FORMS_PATH: &str = "/api/forms";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpFormStore {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpFormStore {
    /// A store talking to the API at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_millis(DEFAULT_TIMEOUT_MS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn form_url(&self, id: &str) -> String {
        format!("{}{}/{}", self.base_url, FORMS_PATH, id)
    }

    fn send<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: reqwest::blocking::RequestBuilder,
    ) -> Result<T> {
        let failed = |message: String| FormError::Persistence {
            operation: operation.to_string(),
            message,
        };
        let fallback = || format!("Failed to {} form", operation);

        let response = request.send().map_err(|e| {
            tracing::warn!(operation, error = %e, "form store unreachable");
            failed(fallback())
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(fallback);
            tracing::warn!(operation, %status, %message, "form store rejected request");
            return Err(failed(message));
        }

        response
            .json::<T>()
            .map_err(|e| failed(format!("Invalid response from form store: {}", e)))
    }
}

impl FormStore for HttpFormStore {
    fn create(&mut self, form: &FormConfig) -> Result<FormConfig> {
        let url = format!("{}{}", self.base_url, FORMS_PATH);
        let request = self.client.post(&url).json(&NewForm::from(form));
        self.send("create", request)
    }

    fn update(&mut self, id: &str, patch: &FormPatch) -> Result<FormConfig> {
        let request = self.client.put(self.form_url(id)).json(patch);
        self.send("update", request)
    }

    fn load(&mut self, id: &str) -> Result<FormConfig> {
        let request = self.client.get(self.form_url(id));
        self.send("load", request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let store = HttpFormStore::new("http://forms.local/").unwrap();
        assert_eq!(store.base_url(), "http://forms.local");
        assert_eq!(store.form_url("abc"), "http://forms.local/api/forms/abc");
    }

    #[test]
    fn test_unreachable_store_reports_fallback_message() {
        let mut store =
            HttpFormStore::with_timeout("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        let err = store.create(&FormConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "Form create failed: Failed to create form");
        assert!(err.is_recoverable());
    }
}
