//! Request descriptors for the gateway.

use std::fmt;
use std::path::Path;

use reqwest::Method;
use reqwest::multipart::{Form, Part};

use crate::Error;

/// Body of a gateway call.
pub enum Body {
    Empty,
    /// Serialized as JSON; the gateway sets a JSON content type.
    Json(serde_json::Value),
    /// Sent as `multipart/form-data`; the transport supplies the boundary
    /// content type.
    Multipart(Form),
}

impl Body {
    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Json(value) => f.debug_tuple("Json").field(value).finish(),
            Self::Multipart(form) => f
                .debug_struct("Multipart")
                .field("boundary", &form.boundary())
                .finish(),
        }
    }
}

/// Everything about a gateway call except its path.
///
/// Header overrides are applied last and win over the gateway defaults. An
/// override of `None` removes the header.
#[derive(Debug)]
pub struct RequestOptions {
    pub(crate) method: Method,
    pub(crate) body: Body,
    pub(crate) headers: Vec<(String, Option<String>)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: Body::Empty,
            headers: Vec::new(),
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post() -> Self {
        Self::default().method(Method::POST)
    }

    pub fn delete() -> Self {
        Self::default().method(Method::DELETE)
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn json(self, value: serde_json::Value) -> Self {
        self.body(Body::Json(value))
    }

    #[must_use]
    pub fn multipart(self, form: Form) -> Self {
        self.body(Body::Multipart(form))
    }

    /// Set a header, overriding any gateway default.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), Some(value.into())));
        self
    }

    /// Drop a header the gateway would otherwise send.
    #[must_use]
    pub fn without_header(mut self, name: impl Into<String>) -> Self {
        self.headers.push((name.into(), None));
        self
    }

    pub fn method_ref(&self) -> &Method {
        &self.method
    }
}

/// A file part for a multipart upload.
#[derive(Clone)]
pub struct Upload {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Upload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, guessing its content type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| Error::Upload {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_owned(), |n| n.to_string_lossy().into_owned());
        Ok(Self::new(file_name, guess_content_type(path), bytes))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn into_part(self) -> Result<Part, Error> {
        Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.content_type)
            .map_err(|e| Error::Encoding(format!("invalid content type: {e}")))
    }
}

fn guess_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}

/// Build a multipart form from text fields and file parts.
pub fn multipart_form(
    fields: Vec<(&'static str, String)>,
    files: Vec<(&'static str, Upload)>,
) -> Result<Form, Error> {
    let mut form = Form::new();
    for (name, value) in fields {
        form = form.text(name, value);
    }
    for (name, upload) in files {
        form = form.part(name, upload.into_part()?);
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_get_without_body() {
        let opts = RequestOptions::default();
        assert_eq!(*opts.method_ref(), Method::GET);
        assert!(matches!(opts.body, Body::Empty));
        assert!(opts.headers.is_empty());
    }

    #[test]
    fn header_overrides_keep_order() {
        let opts = RequestOptions::post()
            .header("X-Trace", "1")
            .without_header("Content-Type");
        assert_eq!(
            opts.headers,
            vec![
                ("X-Trace".to_owned(), Some("1".to_owned())),
                ("Content-Type".to_owned(), None),
            ]
        );
    }

    #[test]
    fn content_type_guessing() {
        assert_eq!(guess_content_type(Path::new("a.PNG")), "image/png");
        assert_eq!(guess_content_type(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(
            guess_content_type(Path::new("noext")),
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn upload_from_missing_path_fails() {
        let err = Upload::from_path("/definitely/not/here.png")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upload { .. }));
    }

    #[tokio::test]
    async fn upload_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poster.webp");
        std::fs::write(&path, b"RIFF").unwrap();
        let upload = Upload::from_path(&path).await.unwrap();
        assert_eq!(upload.file_name(), "poster.webp");
        assert_eq!(upload.content_type(), "image/webp");
        assert_eq!(upload.len(), 4);
    }

    #[test]
    fn multipart_body_is_flagged() {
        let form = multipart_form(
            vec![("name", "x".into())],
            vec![("image", Upload::new("a.png", "image/png", vec![1, 2]))],
        )
        .unwrap();
        assert!(Body::Multipart(form).is_multipart());
        assert!(!Body::Json(serde_json::json!({})).is_multipart());
    }
}
