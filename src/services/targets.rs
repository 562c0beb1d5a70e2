//! Target management service.

use crate::config::VwsConfig;
use crate::credentials::KeyRole;
use crate::error::{ValidationError, VwsError};
use crate::operations::Operation;
use crate::pipeline::RequestPipeline;
use crate::response::check_status;
use crate::signing::VwsSigner;
use crate::transport::HttpTransport;
use crate::types::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// How [`TargetsService::poll_until_processed`] waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between two report calls.
    pub interval: Duration,
    /// Maximum number of report calls, at least one.
    pub max_attempts: u32,
}

impl PollPolicy {
    /// Create a polling policy.
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

/// Service for cloud target management, signed with the server key pair.
pub struct TargetsService {
    config: Arc<VwsConfig>,
    pipeline: RequestPipeline,
}

impl TargetsService {
    /// Create a new targets service.
    pub fn new(
        config: Arc<VwsConfig>,
        transport: Arc<dyn HttpTransport>,
        signer: Arc<dyn VwsSigner>,
    ) -> Self {
        let pipeline = RequestPipeline::new(
            config.provisioning_url.clone(),
            KeyRole::Server,
            transport,
            signer,
        );
        Self { config, pipeline }
    }

    /// Create a target.
    ///
    /// Returns as soon as the service has accepted the image; processing
    /// continues remotely. Use [`Self::target_summary`] or
    /// [`Self::poll_until_processed`] to follow it.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: CreateTargetRequest) -> Result<TargetCreated, VwsError> {
        let created: TargetCreated = self
            .pipeline
            .execute(&Operation::CreateTarget(request))
            .await?
            .into_typed()?;
        info!(target_id = %created.target_id, "Target created");
        Ok(created)
    }

    /// Get a target record.
    pub async fn get(&self, target_id: &str) -> Result<TargetRecordResponse, VwsError> {
        self.pipeline
            .execute(&Operation::GetTarget {
                target_id: target_id.to_string(),
            })
            .await?
            .into_typed()
    }

    /// Update a target. Only the fields set on `request` are sent.
    pub async fn update(
        &self,
        target_id: &str,
        request: UpdateTargetRequest,
    ) -> Result<Acknowledged, VwsError> {
        if request.is_empty() {
            debug!(target_id, "Sending update with no fields set");
        }
        self.pipeline
            .execute(&Operation::UpdateTarget {
                target_id: target_id.to_string(),
                request,
            })
            .await?
            .into_typed()
    }

    /// Delete a target.
    pub async fn delete(&self, target_id: &str) -> Result<Acknowledged, VwsError> {
        self.pipeline
            .execute(&Operation::DeleteTarget {
                target_id: target_id.to_string(),
            })
            .await?
            .into_typed()
    }

    /// List the IDs of every target in the database.
    pub async fn list(&self) -> Result<TargetList, VwsError> {
        self.pipeline
            .execute(&Operation::ListTargets)
            .await?
            .into_typed()
    }

    /// Get the summary report of a target.
    pub async fn target_summary(&self, target_id: &str) -> Result<TargetSummary, VwsError> {
        self.pipeline
            .execute(&Operation::TargetSummary {
                target_id: target_id.to_string(),
            })
            .await?
            .into_typed()
    }

    /// Get the summary report of the database.
    pub async fn database_summary(&self) -> Result<DatabaseSummary, VwsError> {
        self.pipeline
            .execute(&Operation::DatabaseSummary)
            .await?
            .into_typed()
    }

    /// List targets that look like duplicates of the given one.
    pub async fn duplicates(&self, target_id: &str) -> Result<DuplicatesResponse, VwsError> {
        self.pipeline
            .execute(&Operation::Duplicates {
                target_id: target_id.to_string(),
            })
            .await?
            .into_typed()
    }

    /// Render a VuMark instance of a VuMark template target.
    ///
    /// The response body is the rendered image itself, not a result
    /// envelope, so only the HTTP status is checked.
    #[instrument(skip(self, request), fields(format = ?request.format))]
    pub async fn generate_instance(
        &self,
        target_id: &str,
        request: GenerateInstanceRequest,
    ) -> Result<InstanceOutput, VwsError> {
        let response = self
            .pipeline
            .dispatch(&Operation::GenerateInstance {
                target_id: target_id.to_string(),
                request,
            })
            .await?;
        check_status(&response)?;

        Ok(InstanceOutput {
            content_type: response.content_type().map(String::from),
            data: response.body,
        })
    }

    /// Poll the target summary until processing finishes or the attempts run out.
    ///
    /// Returns the last summary seen, whose status may still be
    /// [`TargetStatus::Processing`]. Any failed report call ends polling.
    #[instrument(skip(self))]
    pub async fn poll_until_processed(
        &self,
        target_id: &str,
        policy: PollPolicy,
    ) -> Result<TargetSummary, VwsError> {
        if policy.max_attempts == 0 {
            return Err(VwsError::Validation(ValidationError::InvalidField {
                field: "max_attempts",
                message: "must be at least 1".to_string(),
            }));
        }

        let mut attempt = 1;
        loop {
            let summary = self.target_summary(target_id).await?;
            if summary.status.is_settled() || attempt >= policy.max_attempts {
                debug!(attempt, status = ?summary.status, "Polling finished");
                return Ok(summary);
            }
            attempt += 1;
            tokio::time::sleep(policy.interval).await;
        }
    }

    /// The configuration this service was built from.
    pub fn config(&self) -> &VwsConfig {
        &self.config
    }
}

impl std::fmt::Debug for TargetsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetsService")
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}
