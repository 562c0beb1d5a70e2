//! multipart/form-data encoding.
//!
//! The body is assembled in memory because its exact bytes feed the request
//! signature.

use bytes::Bytes;
use uuid::Uuid;

/// MIME type of a multipart form, without parameters.
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

#[derive(Debug, Clone)]
enum PartBody {
    Text(String),
    File {
        filename: String,
        content_type: String,
        data: Bytes,
    },
}

#[derive(Debug, Clone)]
struct Part {
    name: String,
    body: PartBody,
}

/// A multipart/form-data body under construction.
#[derive(Debug, Clone)]
pub struct MultipartForm {
    boundary: String,
    parts: Vec<Part>,
}

impl MultipartForm {
    /// Create an empty form with a random boundary.
    pub fn new() -> Self {
        Self::with_boundary(format!("vws-{}", Uuid::new_v4().simple()))
    }

    /// Create an empty form with a fixed boundary.
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    /// Add a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(Part {
            name: name.into(),
            body: PartBody::Text(value.into()),
        });
        self
    }

    /// Add a file part.
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        self.parts.push(Part {
            name: name.into(),
            body: PartBody::File {
                filename: filename.into(),
                content_type: content_type.into(),
                data: data.into(),
            },
        });
        self
    }

    /// The boundary separating parts.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// The full `Content-Type` header value, boundary included.
    pub fn content_type(&self) -> String {
        format!("{}; boundary={}", MULTIPART_FORM_DATA, self.boundary)
    }

    /// Encode the form.
    pub fn into_bytes(self) -> Bytes {
        let mut output: Vec<u8> = Vec::new();

        for part in &self.parts {
            output.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
            match &part.body {
                PartBody::Text(value) => {
                    output.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                            escape_quoted(&part.name)
                        )
                        .as_bytes(),
                    );
                    output.extend_from_slice(value.as_bytes());
                }
                PartBody::File {
                    filename,
                    content_type,
                    data,
                } => {
                    output.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                            escape_quoted(&part.name),
                            escape_quoted(filename)
                        )
                        .as_bytes(),
                    );
                    output.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
                    output.extend_from_slice(data);
                }
            }
            output.extend_from_slice(b"\r\n");
        }

        output.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        Bytes::from(output)
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
