use crate::VitalsError;
use crate::firestore::FirestoreRecordStore;
use crate::http_client::ReqwestSummaryClient;
use secrecy::SecretString;

pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";

#[derive(Clone, Debug)]
pub struct Config {
    pub summary_base_url: String,
    pub api_token: SecretString,
    pub firestore_base_url: String,
    pub firestore_project_id: String,
    pub firestore_api_key: Option<SecretString>,
}

impl Config {
    pub fn from_env() -> Result<Self, VitalsError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function instead of the process environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, VitalsError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut required = |key: &str| {
            get(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| VitalsError::Config(format!("{key} missing")))
        };
        let summary_base_url = required("VITALS_SUMMARY_BASE_URL")?;
        let api_token = required("VITALS_API_TOKEN")?;
        let firestore_project_id = required("FIRESTORE_PROJECT_ID")?;
        let firestore_base_url =
            get("FIRESTORE_BASE_URL").unwrap_or_else(|| DEFAULT_FIRESTORE_BASE_URL.into());
        let firestore_api_key = get("FIRESTORE_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .map(|k| SecretString::new(k.into()));
        Ok(Self {
            summary_base_url,
            api_token: SecretString::new(api_token.into()),
            firestore_base_url,
            firestore_project_id,
            firestore_api_key,
        })
    }

    pub fn summary_client(&self) -> ReqwestSummaryClient {
        ReqwestSummaryClient::new(&self.summary_base_url, self.api_token.clone())
    }

    pub fn record_store(&self) -> FirestoreRecordStore {
        FirestoreRecordStore::new(
            &self.firestore_base_url,
            self.firestore_project_id.clone(),
            self.firestore_api_key.clone(),
        )
    }
}
