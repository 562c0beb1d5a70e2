//! Common types shared by requests and responses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Remote processing status of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStatus {
    /// The image is still being analysed.
    Processing,
    /// The target is ready for recognition.
    Success,
    /// The image could not be processed.
    Failed,
    /// A status value this client does not know.
    #[default]
    #[serde(other)]
    Unknown,
}

impl TargetStatus {
    /// Returns true once the status has left `processing`.
    pub fn is_settled(&self) -> bool {
        !matches!(self, TargetStatus::Processing)
    }
}

/// How much target data a query result includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IncludeTargetData {
    /// Data for the best match only.
    #[default]
    Top,
    /// No target data.
    None,
    /// Data for every match.
    All,
}

impl IncludeTargetData {
    /// Form field value.
    pub fn as_str(&self) -> &'static str {
        match self {
            IncludeTargetData::Top => "top",
            IncludeTargetData::None => "none",
            IncludeTargetData::All => "all",
        }
    }
}

impl fmt::Display for IncludeTargetData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncludeTargetData {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(IncludeTargetData::Top),
            "none" => Ok(IncludeTargetData::None),
            "all" => Ok(IncludeTargetData::All),
            other => Err(format!("unsupported include_target_data value: {}", other)),
        }
    }
}

/// Output format of a generated VuMark instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstanceFormat {
    /// SVG image.
    #[default]
    Svg,
    /// PNG image.
    Png,
    /// JPEG image.
    Jpg,
    /// PDF document.
    Pdf,
}

impl InstanceFormat {
    /// MIME type sent in the `Accept` header.
    pub fn mime_type(&self) -> &'static str {
        match self {
            InstanceFormat::Svg => "image/svg+xml",
            InstanceFormat::Png => "image/png",
            InstanceFormat::Jpg => "image/jpg",
            InstanceFormat::Pdf => "application/pdf",
        }
    }
}

impl FromStr for InstanceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image/svg+xml" | "svg" => Ok(InstanceFormat::Svg),
            "image/png" | "png" => Ok(InstanceFormat::Png),
            "image/jpg" | "image/jpeg" | "jpg" | "jpeg" => Ok(InstanceFormat::Jpg),
            "application/pdf" | "pdf" => Ok(InstanceFormat::Pdf),
            other => Err(format!("unsupported instance format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_status_deserialize() {
        let status: TargetStatus = serde_json::from_str("\"processing\"").unwrap();
        assert_eq!(status, TargetStatus::Processing);
        assert!(!status.is_settled());

        let status: TargetStatus = serde_json::from_str("\"failed\"").unwrap();
        assert!(status.is_settled());

        let status: TargetStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(status, TargetStatus::Unknown);
    }

    #[test]
    fn test_include_target_data() {
        assert_eq!(IncludeTargetData::default().as_str(), "top");
        assert_eq!("ALL".parse::<IncludeTargetData>(), Ok(IncludeTargetData::All));
        assert!("some".parse::<IncludeTargetData>().is_err());
    }

    #[test]
    fn test_instance_format() {
        assert_eq!(InstanceFormat::default().mime_type(), "image/svg+xml");
        assert_eq!("image/png".parse::<InstanceFormat>(), Ok(InstanceFormat::Png));
        assert_eq!("jpeg".parse::<InstanceFormat>(), Ok(InstanceFormat::Jpg));
        assert!("image/gif".parse::<InstanceFormat>().is_err());
    }
}
