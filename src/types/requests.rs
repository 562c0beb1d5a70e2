//! Request types for VWS operations.

use super::common::{IncludeTargetData, InstanceFormat};
use crate::error::{ValidationError, VwsError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use serde::Serialize;

/// JSON body shared by target create and update.
///
/// Absent fields are omitted, never serialized as `null`.
#[derive(Debug, Serialize)]
pub(crate) struct TargetPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    application_metadata: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    active_flag: Option<bool>,
}

/// JSON body for instance generation.
#[derive(Debug, Serialize)]
pub(crate) struct InstancePayload<'a> {
    instance_id: &'a str,
}

fn validate_width(width: f64) -> Result<(), VwsError> {
    if !width.is_finite() || width <= 0.0 {
        return Err(VwsError::Validation(ValidationError::InvalidField {
            field: "width",
            message: format!("must be a positive number, got {}", width),
        }));
    }
    Ok(())
}

fn require(field: &'static str, present: bool) -> Result<(), VwsError> {
    if present {
        Ok(())
    } else {
        Err(VwsError::Validation(ValidationError::MissingField { field }))
    }
}

/// Request to create a cloud target.
#[derive(Debug, Clone)]
pub struct CreateTargetRequest {
    /// Target name, unique within the database.
    pub name: String,
    /// Raw JPG or PNG bytes.
    pub image: Bytes,
    /// Target width in scene units.
    pub width: f64,
    /// Base64 application metadata, passed through as given.
    pub application_metadata: Option<String>,
    /// Whether the target is active for recognition.
    pub active_flag: Option<bool>,
}

impl CreateTargetRequest {
    /// Create a new request.
    pub fn new(name: impl Into<String>, image: impl Into<Bytes>, width: f64) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            width,
            application_metadata: None,
            active_flag: None,
        }
    }

    /// Attach base64-encoded application metadata.
    pub fn with_metadata(mut self, metadata_base64: impl Into<String>) -> Self {
        self.application_metadata = Some(metadata_base64.into());
        self
    }

    /// Set the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active_flag = Some(active);
        self
    }

    /// Check required fields.
    pub fn validate(&self) -> Result<(), VwsError> {
        require("name", !self.name.is_empty())?;
        require("image", !self.image.is_empty())?;
        validate_width(self.width)
    }

    pub(crate) fn payload(&self) -> TargetPayload<'_> {
        TargetPayload {
            name: Some(&self.name),
            image: Some(BASE64.encode(&self.image)),
            width: Some(self.width),
            application_metadata: self.application_metadata.as_deref(),
            active_flag: self.active_flag,
        }
    }
}

/// Request to update a cloud target. Every field is optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateTargetRequest {
    /// Replacement image bytes.
    pub image: Option<Bytes>,
    /// New name.
    pub name: Option<String>,
    /// New width in scene units.
    pub width: Option<f64>,
    /// New base64 application metadata.
    pub application_metadata: Option<String>,
    /// New active flag.
    pub active_flag: Option<bool>,
}

impl UpdateTargetRequest {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the image.
    pub fn with_image(mut self, image: impl Into<Bytes>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Rename the target.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Change the width.
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Replace the application metadata.
    pub fn with_metadata(mut self, metadata_base64: impl Into<String>) -> Self {
        self.application_metadata = Some(metadata_base64.into());
        self
    }

    /// Change the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active_flag = Some(active);
        self
    }

    /// Returns true if no field is set.
    ///
    /// Empty updates are still sent; the service decides what they mean.
    pub fn is_empty(&self) -> bool {
        self.image.is_none()
            && self.name.is_none()
            && self.width.is_none()
            && self.application_metadata.is_none()
            && self.active_flag.is_none()
    }

    /// Check the fields that are set.
    pub fn validate(&self) -> Result<(), VwsError> {
        if let Some(image) = &self.image {
            require("image", !image.is_empty())?;
        }
        if let Some(name) = &self.name {
            require("name", !name.is_empty())?;
        }
        if let Some(width) = self.width {
            validate_width(width)?;
        }
        Ok(())
    }

    pub(crate) fn payload(&self) -> TargetPayload<'_> {
        TargetPayload {
            name: self.name.as_deref(),
            image: self.image.as_ref().map(|image| BASE64.encode(image)),
            width: self.width,
            application_metadata: self.application_metadata.as_deref(),
            active_flag: self.active_flag,
        }
    }
}

/// Image recognition query.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    /// Raw query image bytes.
    pub image: Bytes,
    /// File name reported in the multipart part.
    pub filename: String,
    /// Maximum number of matches to return.
    pub max_num_results: u32,
    /// How much target data to include.
    pub include_target_data: IncludeTargetData,
}

impl QueryRequest {
    /// Create a query returning the single best match.
    pub fn new(image: impl Into<Bytes>) -> Self {
        Self {
            image: image.into(),
            filename: "query.jpg".to_string(),
            max_num_results: 1,
            include_target_data: IncludeTargetData::default(),
        }
    }

    /// Set the file name of the image part.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Set the maximum number of matches.
    pub fn with_max_results(mut self, max_num_results: u32) -> Self {
        self.max_num_results = max_num_results;
        self
    }

    /// Set how much target data to include.
    pub fn with_include_target_data(mut self, include: IncludeTargetData) -> Self {
        self.include_target_data = include;
        self
    }

    /// Check required fields.
    pub fn validate(&self) -> Result<(), VwsError> {
        require("image", !self.image.is_empty())
    }
}

/// Request to render a VuMark instance.
#[derive(Debug, Clone)]
pub struct GenerateInstanceRequest {
    /// Instance ID encoded into the VuMark.
    pub instance_id: String,
    /// Output format.
    pub format: InstanceFormat,
}

impl GenerateInstanceRequest {
    /// Create a request for an SVG instance.
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            format: InstanceFormat::default(),
        }
    }

    /// Set the output format.
    pub fn with_format(mut self, format: InstanceFormat) -> Self {
        self.format = format;
        self
    }

    /// Check required fields.
    pub fn validate(&self) -> Result<(), VwsError> {
        require("instance_id", !self.instance_id.is_empty())
    }

    pub(crate) fn payload(&self) -> InstancePayload<'_> {
        InstancePayload {
            instance_id: &self.instance_id,
        }
    }
}
