//! Recognition query service.

use crate::config::VwsConfig;
use crate::credentials::KeyRole;
use crate::error::VwsError;
use crate::operations::Operation;
use crate::pipeline::RequestPipeline;
use crate::signing::VwsSigner;
use crate::transport::HttpTransport;
use crate::types::{QueryRequest, QueryResponse};
use std::sync::Arc;
use tracing::instrument;

/// Service for image recognition, signed with the client key pair.
pub struct QueryService {
    pipeline: RequestPipeline,
}

impl QueryService {
    /// Create a new query service.
    pub fn new(
        config: Arc<VwsConfig>,
        transport: Arc<dyn HttpTransport>,
        signer: Arc<dyn VwsSigner>,
    ) -> Self {
        Self {
            pipeline: RequestPipeline::new(config.query_url.clone(), KeyRole::Client, transport, signer),
        }
    }

    /// Recognize an image. An empty result list means no match.
    #[instrument(skip(self, request), fields(max_num_results = request.max_num_results))]
    pub async fn query(&self, request: QueryRequest) -> Result<QueryResponse, VwsError> {
        self.pipeline
            .execute(&Operation::Query(request))
            .await?
            .into_typed()
    }
}

impl std::fmt::Debug for QueryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryService")
            .field("pipeline", &self.pipeline)
            .finish()
    }
}
