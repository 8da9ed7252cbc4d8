//! Typed calls, one per endpoint.

use super::*;
use crate::model::ServiceRecord;

impl<T: Transport> Gateway<T> {
    pub async fn list_services(&self) -> Result<Vec<ServiceRecord>, GatewayError> {
        let services: Option<Vec<ServiceRecord>> =
            self.request_as(&Endpoint::ListServices, None).await?;
        Ok(services.unwrap_or_default())
    }

    pub async fn control(&self, key: &ControlKey) -> Result<ActionReply, GatewayError> {
        self.request_as(&Endpoint::control(key), None).await
    }

    pub async fn status(&self, unit: &str) -> Result<StatusReply, GatewayError> {
        self.request_as(
            &Endpoint::Status {
                unit: unit.to_string(),
            },
            None,
        )
        .await
    }

    pub async fn logs(&self, unit: &str) -> Result<LogsReply, GatewayError> {
        self.request_as(
            &Endpoint::Logs {
                unit: unit.to_string(),
            },
            None,
        )
        .await
    }

    pub async fn read_file(&self, unit: &str) -> Result<FileReply, GatewayError> {
        self.request_as(
            &Endpoint::ReadFile {
                unit: unit.to_string(),
            },
            None,
        )
        .await
    }

    pub async fn write_file(&self, unit: &str, content: &str) -> Result<ActionReply, GatewayError> {
        let body = serde_json::to_value(WriteFileRequest { content }).map_err(|e| {
            GatewayError::Decode {
                detail: e.to_string(),
            }
        })?;
        self.request_as(
            &Endpoint::WriteFile {
                unit: unit.to_string(),
            },
            Some(body),
        )
        .await
    }
}
