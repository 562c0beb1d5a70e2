//! Operation descriptors.
//!
//! Every remote call is described by one [`Operation`] variant. The
//! descriptor knows its method, path, endpoint, key role, body encoding and
//! the result code that marks success; the request pipeline does the rest.

mod body;

pub use body::RequestBody;

use crate::credentials::KeyRole;
use crate::error::{ValidationError, VwsError};
use crate::types::{CreateTargetRequest, GenerateInstanceRequest, QueryRequest, UpdateTargetRequest};
use http::Method;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Result code of a successful create.
pub const TARGET_CREATED: &str = "TargetCreated";

/// Result code of every other successful operation.
pub const SUCCESS: &str = "Success";

const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Which base URL an operation is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Target management (`vws.vuforia.com`).
    Provisioning,
    /// Image recognition (`cloudreco.vuforia.com`).
    Query,
}

/// A single VWS operation.
#[derive(Debug, Clone)]
pub enum Operation {
    /// `POST /targets`
    CreateTarget(CreateTargetRequest),
    /// `GET /targets/{id}`
    GetTarget {
        /// Target ID.
        target_id: String,
    },
    /// `PUT /targets/{id}`
    UpdateTarget {
        /// Target ID.
        target_id: String,
        /// Fields to change.
        request: UpdateTargetRequest,
    },
    /// `DELETE /targets/{id}`
    DeleteTarget {
        /// Target ID.
        target_id: String,
    },
    /// `GET /targets`
    ListTargets,
    /// `GET /summary/{id}`
    TargetSummary {
        /// Target ID.
        target_id: String,
    },
    /// `GET /summary`
    DatabaseSummary,
    /// `GET /duplicates/{id}`
    Duplicates {
        /// Target ID.
        target_id: String,
    },
    /// `POST /v1/query`
    Query(QueryRequest),
    /// `POST /targets/{id}/instances`
    GenerateInstance {
        /// VuMark template target ID.
        target_id: String,
        /// Instance to render.
        request: GenerateInstanceRequest,
    },
}

impl Operation {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CreateTarget(_) => "create_target",
            Operation::GetTarget { .. } => "get_target",
            Operation::UpdateTarget { .. } => "update_target",
            Operation::DeleteTarget { .. } => "delete_target",
            Operation::ListTargets => "list_targets",
            Operation::TargetSummary { .. } => "target_summary",
            Operation::DatabaseSummary => "database_summary",
            Operation::Duplicates { .. } => "duplicates",
            Operation::Query(_) => "query",
            Operation::GenerateInstance { .. } => "generate_instance",
        }
    }

    /// HTTP method.
    pub fn method(&self) -> Method {
        match self {
            Operation::CreateTarget(_) | Operation::Query(_) | Operation::GenerateInstance { .. } => {
                Method::POST
            }
            Operation::UpdateTarget { .. } => Method::PUT,
            Operation::DeleteTarget { .. } => Method::DELETE,
            Operation::GetTarget { .. }
            | Operation::ListTargets
            | Operation::TargetSummary { .. }
            | Operation::DatabaseSummary
            | Operation::Duplicates { .. } => Method::GET,
        }
    }

    /// Base URL the operation targets.
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Operation::Query(_) => Endpoint::Query,
            _ => Endpoint::Provisioning,
        }
    }

    /// Key pair the operation must be signed with.
    pub fn key_role(&self) -> KeyRole {
        match self.endpoint() {
            Endpoint::Query => KeyRole::Client,
            Endpoint::Provisioning => KeyRole::Server,
        }
    }

    /// URL path, target IDs percent-encoded.
    pub fn path(&self) -> String {
        match self {
            Operation::CreateTarget(_) | Operation::ListTargets => "/targets".to_string(),
            Operation::GetTarget { target_id }
            | Operation::UpdateTarget { target_id, .. }
            | Operation::DeleteTarget { target_id } => format!("/targets/{}", encode(target_id)),
            Operation::TargetSummary { target_id } => format!("/summary/{}", encode(target_id)),
            Operation::DatabaseSummary => "/summary".to_string(),
            Operation::Duplicates { target_id } => format!("/duplicates/{}", encode(target_id)),
            Operation::Query(_) => "/v1/query".to_string(),
            Operation::GenerateInstance { target_id, .. } => {
                format!("/targets/{}/instances", encode(target_id))
            }
        }
    }

    /// The `result_code` that marks success.
    pub fn expected_result_code(&self) -> &'static str {
        match self {
            Operation::CreateTarget(_) => TARGET_CREATED,
            _ => SUCCESS,
        }
    }

    /// `Accept` header value, for operations that return non-JSON bodies.
    pub fn accept(&self) -> Option<&'static str> {
        match self {
            Operation::GenerateInstance { request, .. } => Some(request.format.mime_type()),
            _ => None,
        }
    }

    /// The target ID the operation addresses, if any.
    pub fn target_id(&self) -> Option<&str> {
        match self {
            Operation::GetTarget { target_id }
            | Operation::UpdateTarget { target_id, .. }
            | Operation::DeleteTarget { target_id }
            | Operation::TargetSummary { target_id }
            | Operation::Duplicates { target_id }
            | Operation::GenerateInstance { target_id, .. } => Some(target_id),
            _ => None,
        }
    }

    /// Check the inputs before anything is built or sent.
    pub fn validate(&self) -> Result<(), VwsError> {
        if let Some(target_id) = self.target_id() {
            validate_target_id(target_id)?;
        }

        match self {
            Operation::CreateTarget(request) => request.validate(),
            Operation::UpdateTarget { request, .. } => request.validate(),
            Operation::Query(request) => request.validate(),
            Operation::GenerateInstance { request, .. } => request.validate(),
            _ => Ok(()),
        }
    }

    /// Encode the request body.
    pub fn body(&self) -> Result<RequestBody, VwsError> {
        match self {
            Operation::CreateTarget(request) => RequestBody::json(&request.payload()),
            Operation::UpdateTarget { request, .. } => RequestBody::json(&request.payload()),
            Operation::GenerateInstance { request, .. } => RequestBody::json(&request.payload()),
            Operation::Query(request) => Ok(RequestBody::query_form(request)),
            _ => Ok(RequestBody::empty()),
        }
    }
}

/// A target ID must stay a single path segment once placed in the URL.
fn validate_target_id(target_id: &str) -> Result<(), VwsError> {
    if target_id.is_empty() {
        return Err(VwsError::Validation(ValidationError::MissingField {
            field: "target_id",
        }));
    }

    let invalid = |message: &str| -> Result<(), VwsError> {
        Err(VwsError::Validation(ValidationError::InvalidField {
            field: "target_id",
            message: message.to_string(),
        }))
    };
    if target_id == "." || target_id == ".." {
        return invalid("must not be a dot segment");
    }
    if let Some(c) = target_id
        .chars()
        .find(|c| matches!(c, '/' | '\\' | '?' | '#') || c.is_control())
    {
        return invalid(&format!("contains reserved character {:?}", c));
    }
    Ok(())
}

fn encode(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}
