//! Service result codes.

use std::fmt;

/// Result codes returned by the VWS service in the `result_code` field.
///
/// Codes the client does not know are kept verbatim in [`ResultCode::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResultCode {
    /// Generic success.
    Success,
    /// A target was created.
    TargetCreated,
    /// Signature or access key was rejected.
    AuthenticationFailure,
    /// The `Date` header is too far from the server clock.
    RequestTimeTooSkewed,
    /// A target with the same name already exists.
    TargetNameExist,
    /// The target ID does not exist.
    UnknownTarget,
    /// The image is corrupt or in an unsupported format.
    BadImage,
    /// The image exceeds the size limit.
    ImageTooLarge,
    /// The application metadata exceeds the size limit.
    MetadataTooLarge,
    /// The start date is after the end date.
    DateRangeError,
    /// Generic server failure.
    Fail,
    /// The target is still being processed.
    TargetStatusProcessing,
    /// The target is not in the `success` state.
    TargetStatusNotSuccess,
    /// The request quota was reached.
    RequestQuotaReached,
    /// The target quota was reached.
    TargetQuotaReached,
    /// The project is suspended.
    ProjectSuspended,
    /// The project is inactive.
    ProjectInactive,
    /// The project has no API access.
    ProjectHasNoApiAccess,
    /// `max_num_results` is out of range.
    InvalidMaxNumResults,
    /// `include_target_data` has an unsupported value.
    InvalidIncludeTargetData,
    /// Any other code.
    Other(String),
}

impl ResultCode {
    /// The wire representation of the code.
    pub fn as_str(&self) -> &str {
        match self {
            ResultCode::Success => "Success",
            ResultCode::TargetCreated => "TargetCreated",
            ResultCode::AuthenticationFailure => "AuthenticationFailure",
            ResultCode::RequestTimeTooSkewed => "RequestTimeTooSkewed",
            ResultCode::TargetNameExist => "TargetNameExist",
            ResultCode::UnknownTarget => "UnknownTarget",
            ResultCode::BadImage => "BadImage",
            ResultCode::ImageTooLarge => "ImageTooLarge",
            ResultCode::MetadataTooLarge => "MetadataTooLarge",
            ResultCode::DateRangeError => "DateRangeError",
            ResultCode::Fail => "Fail",
            ResultCode::TargetStatusProcessing => "TargetStatusProcessing",
            ResultCode::TargetStatusNotSuccess => "TargetStatusNotSuccess",
            ResultCode::RequestQuotaReached => "RequestQuotaReached",
            ResultCode::TargetQuotaReached => "TargetQuotaReached",
            ResultCode::ProjectSuspended => "ProjectSuspended",
            ResultCode::ProjectInactive => "ProjectInactive",
            ResultCode::ProjectHasNoApiAccess => "ProjectHasNoAPIAccess",
            ResultCode::InvalidMaxNumResults => "InvalidMaxNumResults",
            ResultCode::InvalidIncludeTargetData => "InvalidIncludeTargetData",
            ResultCode::Other(code) => code,
        }
    }

    /// Returns true if the same request may succeed later without changes.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ResultCode::TargetStatusProcessing | ResultCode::RequestTimeTooSkewed | ResultCode::Fail
        )
    }
}

impl From<&str> for ResultCode {
    fn from(code: &str) -> Self {
        match code {
            "Success" => ResultCode::Success,
            "TargetCreated" => ResultCode::TargetCreated,
            "AuthenticationFailure" => ResultCode::AuthenticationFailure,
            "RequestTimeTooSkewed" => ResultCode::RequestTimeTooSkewed,
            "TargetNameExist" => ResultCode::TargetNameExist,
            "UnknownTarget" => ResultCode::UnknownTarget,
            "BadImage" => ResultCode::BadImage,
            "ImageTooLarge" => ResultCode::ImageTooLarge,
            "MetadataTooLarge" => ResultCode::MetadataTooLarge,
            "DateRangeError" => ResultCode::DateRangeError,
            "Fail" => ResultCode::Fail,
            "TargetStatusProcessing" => ResultCode::TargetStatusProcessing,
            "TargetStatusNotSuccess" => ResultCode::TargetStatusNotSuccess,
            "RequestQuotaReached" => ResultCode::RequestQuotaReached,
            "TargetQuotaReached" => ResultCode::TargetQuotaReached,
            "ProjectSuspended" => ResultCode::ProjectSuspended,
            "ProjectInactive" => ResultCode::ProjectInactive,
            "ProjectHasNoAPIAccess" => ResultCode::ProjectHasNoApiAccess,
            "InvalidMaxNumResults" => ResultCode::InvalidMaxNumResults,
            "InvalidIncludeTargetData" => ResultCode::InvalidIncludeTargetData,
            other => ResultCode::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
