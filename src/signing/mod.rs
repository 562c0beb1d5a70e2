//! VWS request signing.
//!
//! Every request carries an `Authorization: VWS {access_key}:{signature}`
//! header. The signature is the base64 HMAC-SHA1, keyed with the secret key,
//! of the canonical string
//!
//! ```text
//! METHOD \n md5_hex(body) \n bare-content-type \n date \n path
//! ```
//!
//! The functions here are pure: the date is an input, so signing the same
//! request twice gives the same token.

mod signer;

pub use signer::{HmacSigner, SignedRequest, VwsSigner};

use crate::error::{ValidationError, VwsError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Authorization scheme name.
pub const VWS_AUTH_SCHEME: &str = "VWS";

/// MD5 of the empty byte string.
pub const EMPTY_BODY_MD5: &str = "d41d8cd98f00b204e9800998ecf8427e";

/// The request fields covered by a VWS signature.
#[derive(Debug, Clone, Copy)]
pub struct SignableRequest<'a> {
    /// HTTP method, any case.
    pub method: &'a str,
    /// URL path only, without scheme, host or query.
    pub path: &'a str,
    /// Content type as sent on the wire; parameters are dropped when signing.
    pub content_type: &'a str,
    /// Raw body bytes, possibly empty.
    pub body: &'a [u8],
    /// HTTP-date string sent in the `Date` header.
    pub date: &'a str,
}

impl<'a> SignableRequest<'a> {
    /// Reject combinations the protocol cannot express.
    pub fn validate(&self) -> Result<(), VwsError> {
        if self.body.is_empty() && !self.content_type.is_empty() {
            return Err(VwsError::Validation(ValidationError::ContentTypeWithoutBody {
                content_type: self.content_type.to_string(),
            }));
        }
        Ok(())
    }

    /// Build the newline-joined canonical string.
    pub fn string_to_sign(&self) -> String {
        [
            self.method.to_uppercase().as_str(),
            md5_hex(self.body).as_str(),
            bare_content_type(self.content_type),
            self.date,
            self.path,
        ]
        .join("\n")
    }
}

/// Calculate the lowercase hex MD5 of data.
pub fn md5_hex(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Calculate HMAC-SHA1 and return it base64 encoded.
pub fn hmac_sha1_base64(key: &[u8], data: &[u8]) -> String {
    let mut mac = HmacSha1::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    BASE64.encode(mac.finalize().into_bytes())
}

/// Strip `;parameter=value` suffixes from a content type.
///
/// `multipart/form-data; boundary=abc` becomes `multipart/form-data`.
pub fn bare_content_type(content_type: &str) -> &str {
    match content_type.find(';') {
        Some(idx) => &content_type[..idx],
        None => content_type,
    }
}

/// Format a timestamp as an RFC 1123 HTTP-date in GMT.
pub fn format_http_date(dt: &DateTime<Utc>) -> String {
    dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Compute the signature for a request.
pub fn sign(secret_key: &str, request: &SignableRequest<'_>) -> Result<String, VwsError> {
    request.validate()?;
    Ok(hmac_sha1_base64(
        secret_key.as_bytes(),
        request.string_to_sign().as_bytes(),
    ))
}

/// Build the `Authorization` header value.
pub fn authorization_header(access_key: &str, signature: &str) -> String {
    format!("{} {}:{}", VWS_AUTH_SCHEME, access_key, signature)
}
