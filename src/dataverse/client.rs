use super::model::{DatasetVersion, FieldList, ResumeMessage, VaultMetadataKey};
use super::version::released_or_deaccessioned;
use super::{DataverseError, RepositoryClient, StepInvocation};
use crate::config::DataverseConfig;
use serde::Deserialize;
use std::thread;
use std::time::Duration;

const API_KEY_HEADER: &str = "X-Dataverse-key";
const WORKFLOW_LOCK: &str = "Workflow";

/// Blocking client for the Dataverse native API, scoped to what a
/// workflow step may do with its invocation id.
#[derive(Debug, Clone)]
pub struct DataverseClient {
    agent: ureq::Agent,
    base_url: String,
    api_key: Option<String>,
    await_lock_max_checks: u32,
    await_lock_interval: Duration,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatasetLock {
    lock_type: String,
}

impl DataverseClient {
    pub fn new(config: &DataverseConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build();
        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|v| !v.trim().is_empty()),
            await_lock_max_checks: config.await_lock_max_checks,
            await_lock_interval: Duration::from_millis(config.await_lock_interval_ms),
        }
    }

    fn dataset_url(
        &self,
        invocation: &StepInvocation,
        path: &str,
        extra_query: &[(String, String)],
    ) -> String {
        let mut query = vec![
            ("persistentId".to_string(), invocation.global_id.clone()),
            ("invocationId".to_string(), invocation.invocation_id.clone()),
        ];
        query.extend(extra_query.iter().cloned());
        let encoded = query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!(
            "{}/api/datasets/:persistentId{path}?{encoded}",
            self.base_url
        )
    }

    fn request(&self, method: &'static str, url: &str) -> ureq::Request {
        let request = self.agent.request(method, url);
        match &self.api_key {
            Some(key) => request.set(API_KEY_HEADER, key),
            None => request,
        }
    }

    fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, DataverseError> {
        let response = self
            .request("GET", url)
            .call()
            .map_err(|e| map_ureq_error("GET", url, e))?;
        decode_envelope(url, response)
    }

    fn send_json(
        &self,
        method: &'static str,
        url: &str,
        body: serde_json::Value,
    ) -> Result<(), DataverseError> {
        self.request(method, url)
            .send_json(body)
            .map_err(|e| map_ureq_error(method, url, e))?;
        Ok(())
    }

    fn has_workflow_lock(&self, invocation: &StepInvocation) -> Result<bool, DataverseError> {
        let url = self.dataset_url(
            invocation,
            "/locks",
            &[("type".to_string(), WORKFLOW_LOCK.to_string())],
        );
        let locks: Vec<DatasetLock> = self.get_json(&url)?;
        Ok(locks.iter().any(|lock| lock.lock_type == WORKFLOW_LOCK))
    }
}

impl RepositoryClient for DataverseClient {
    fn get_version(
        &self,
        invocation: &StepInvocation,
        version_tag: &str,
    ) -> Result<Option<DatasetVersion>, DataverseError> {
        let path = format!("/versions/{}", urlencoding::encode(version_tag));
        let url = self.dataset_url(invocation, &path, &[]);
        match self.get_json::<DatasetVersion>(&url) {
            Ok(version) => Ok(Some(version)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn get_released_or_deaccessioned_versions(
        &self,
        invocation: &StepInvocation,
    ) -> Result<Vec<DatasetVersion>, DataverseError> {
        let url = self.dataset_url(invocation, "/versions", &[]);
        let versions: Vec<DatasetVersion> = self.get_json(&url)?;
        Ok(released_or_deaccessioned(versions))
    }

    /// Waits until Dataverse reports the workflow lock on the dataset.
    fn lock_dataset(&self, invocation: &StepInvocation) -> Result<(), DataverseError> {
        for check in 1..=self.await_lock_max_checks {
            if self.has_workflow_lock(invocation)? {
                return Ok(());
            }
            if check < self.await_lock_max_checks {
                thread::sleep(self.await_lock_interval);
            }
        }
        Err(DataverseError::LockTimeout {
            global_id: invocation.global_id.clone(),
            lock_type: WORKFLOW_LOCK.to_string(),
            checks: self.await_lock_max_checks,
        })
    }

    fn edit_metadata(
        &self,
        invocation: &StepInvocation,
        fields: &FieldList,
        key: Option<&VaultMetadataKey>,
    ) -> Result<(), DataverseError> {
        let mut query = vec![("replace".to_string(), "true".to_string())];
        if let Some(key) = key {
            query.push(key.query_param());
        }
        let url = self.dataset_url(invocation, "/editMetadata", &query);
        let body = serde_json::to_value(fields).map_err(|e| DataverseError::Encode {
            url: url.clone(),
            message: e.to_string(),
        })?;
        self.send_json("PUT", &url, body)
    }

    fn resume_workflow(
        &self,
        invocation: &StepInvocation,
        message: &ResumeMessage,
    ) -> Result<(), DataverseError> {
        let url = format!(
            "{}/api/workflows/{}",
            self.base_url,
            urlencoding::encode(&invocation.invocation_id)
        );
        let body = serde_json::to_value(message).map_err(|e| DataverseError::Encode {
            url: url.clone(),
            message: e.to_string(),
        })?;
        self.send_json("POST", &url, body)
    }
}

fn decode_envelope<T: for<'de> Deserialize<'de>>(
    url: &str,
    response: ureq::Response,
) -> Result<T, DataverseError> {
    response
        .into_json::<Envelope<T>>()
        .map(|envelope| envelope.data)
        .map_err(|e| DataverseError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
}

fn map_ureq_error(method: &'static str, url: &str, error: ureq::Error) -> DataverseError {
    match error {
        ureq::Error::Status(status, response) => {
            let raw = response.into_string().unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&raw)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or(raw);
            DataverseError::Status {
                status,
                method,
                url: url.to_string(),
                message,
            }
        }
        ureq::Error::Transport(transport) => DataverseError::Transport {
            method,
            url: url.to_string(),
            message: transport.to_string(),
        },
    }
}
