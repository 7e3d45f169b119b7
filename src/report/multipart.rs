use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, trace};
use mime::Mime;
use rand::distributions::{Alphanumeric, DistString};

use super::errors::UploadError;

const BOUNDARY_PREFIX: &str = "----------------qamatrix";
const BOUNDARY_RANDOM_LEN: usize = 24;
const CRLF: &[u8] = b"\r\n";

/// A named value of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, path: PathBuf },
}

impl FormPart {
    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

/// Ordered list of parts, encoded in insertion order.
///
/// Part names are not deduplicated, adding the same name twice emits two parts.
#[derive(Debug, Default, Clone)]
pub struct Form {
    parts: Vec<FormPart>,
}

/// Encoded `multipart/form-data` payload along with the boundary delimiting its parts.
#[derive(Debug)]
pub struct MultipartBody {
    boundary: String,
    bytes: Vec<u8>,
}

impl MultipartBody {
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value of the `Content-Type` header matching this body.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// A part whose content has been loaded in memory, ready to be written.
enum LoadedPart<'a> {
    Text {
        name: &'a str,
        value: &'a str,
    },
    File {
        name: &'a str,
        file_name: String,
        content_type: Option<Mime>,
        bytes: Vec<u8>,
    },
}

impl LoadedPart<'_> {
    fn contains(&self, needle: &[u8]) -> bool {
        match self {
            LoadedPart::Text { name, value } => {
                contains_bytes(name.as_bytes(), needle) || contains_bytes(value.as_bytes(), needle)
            }
            LoadedPart::File {
                name,
                file_name,
                bytes,
                ..
            } => {
                contains_bytes(name.as_bytes(), needle)
                    || contains_bytes(file_name.as_bytes(), needle)
                    || contains_bytes(bytes, needle)
            }
        }
    }
}

/// Characters that would break out of the quoted `filename` parameter.
fn is_header_safe(file_name: &str) -> bool {
    !file_name.contains(['"', '\r', '\n'])
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|window| window == needle)
}

/// Best-effort content type of a file, guessed from its extension.
fn probe_content_type(path: &Path) -> Option<Mime> {
    mime_guess::from_path(path).first()
}

fn generate_boundary() -> String {
    format!(
        "{BOUNDARY_PREFIX}{}",
        Alphanumeric.sample_string(&mut rand::thread_rng(), BOUNDARY_RANDOM_LEN)
    )
}

/// Draw boundaries from `generate` until one does not occur in any part.
fn choose_boundary(parts: &[LoadedPart], mut generate: impl FnMut() -> String) -> String {
    loop {
        let candidate = generate();
        if !parts.iter().any(|part| part.contains(candidate.as_bytes())) {
            return candidate;
        }
        debug!("Boundary {candidate} found in the form content, drawing a new one");
    }
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text part.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Append a file part. The file is only read when the form is encoded.
    pub fn file(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            path: path.into(),
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// Encode the form with a freshly generated boundary that does not appear in any part.
    pub fn encode(&self) -> Result<MultipartBody, UploadError> {
        debug!(
            "Encoding form parts: {:?}",
            self.parts().iter().map(FormPart::name).collect::<Vec<_>>()
        );
        let parts = self.load_parts()?;
        let boundary = choose_boundary(&parts, generate_boundary);
        let bytes = write_parts(&parts, &boundary);
        Ok(MultipartBody { boundary, bytes })
    }

    /// Encode the form with the given boundary.
    ///
    /// No escaping is performed: the caller must make sure the boundary does not appear in any
    /// field value or file content, otherwise the body will be misread by the server.
    pub fn encode_with_boundary(&self, boundary: &str) -> Result<MultipartBody, UploadError> {
        let parts = self.load_parts()?;
        let bytes = write_parts(&parts, boundary);
        Ok(MultipartBody {
            boundary: boundary.to_owned(),
            bytes,
        })
    }

    fn load_parts(&self) -> Result<Vec<LoadedPart<'_>>, UploadError> {
        self.parts
            .iter()
            .map(|part| match part {
                FormPart::Text { name, value } => Ok(LoadedPart::Text { name, value }),
                FormPart::File { name, path } => {
                    let file_name = path
                        .file_name()
                        .map(|file_name| file_name.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    if !is_header_safe(&file_name) {
                        return Err(UploadError::FileAccess {
                            path: path.clone(),
                            source: io::Error::new(
                                io::ErrorKind::InvalidInput,
                                "file name contains a quote or a line break",
                            ),
                        });
                    }

                    let bytes = fs::read(path).map_err(|source| UploadError::FileAccess {
                        path: path.clone(),
                        source,
                    })?;
                    let content_type = probe_content_type(path);
                    trace!(
                        "Loaded {} bytes from {} (content type: {content_type:?})",
                        bytes.len(),
                        path.display()
                    );
                    Ok(LoadedPart::File {
                        name,
                        file_name,
                        content_type,
                        bytes,
                    })
                }
            })
            .collect()
    }
}

fn write_parts(parts: &[LoadedPart], boundary: &str) -> Vec<u8> {
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(
            format!("--{boundary}\r\nContent-Disposition: form-data; name=").as_bytes(),
        );

        match part {
            LoadedPart::Text { name, value } => {
                body.extend_from_slice(format!("\"{name}\"\r\n\r\n{value}").as_bytes());
            }
            LoadedPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(format!("\"{name}\"; filename=\"{file_name}\"").as_bytes());
                body.extend_from_slice(CRLF);
                if let Some(content_type) = content_type {
                    body.extend_from_slice(format!("Content-Type: {content_type}").as_bytes());
                    body.extend_from_slice(CRLF);
                }
                body.extend_from_slice(CRLF);
                body.extend_from_slice(bytes);
            }
        }

        body.extend_from_slice(CRLF);
    }

    body.extend_from_slice(format!("--{boundary}--").as_bytes());
    body
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use multer::Multipart;
    use tempfile::TempDir;

    use super::*;

    /// A part as read back from an encoded body.
    #[derive(Debug, PartialEq)]
    pub(crate) struct ParsedPart {
        pub name: String,
        pub file_name: Option<String>,
        pub content_type: Option<String>,
        pub content: Vec<u8>,
    }

    /// Read a `multipart/form-data` body back into its parts with `multer`.
    pub(crate) async fn read_multipart(body: &[u8], boundary: &str) -> Vec<ParsedPart> {
        let mut multipart = Multipart::with_reader(body, boundary);

        let mut parts = Vec::new();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_owned();
            let file_name = field.file_name().map(str::to_owned);
            let content_type = field.content_type().map(ToString::to_string);
            let content = field.bytes().await.unwrap().to_vec();
            parts.push(ParsedPart {
                name,
                file_name,
                content_type,
                content,
            });
        }
        parts
    }

    fn write_fixture(dir: &TempDir, file_name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(file_name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_encode_text_part() {
        let body = Form::new()
            .text("Token", "t")
            .encode_with_boundary("XyZ")
            .unwrap();

        assert_eq!(
            body.as_bytes(),
            b"--XyZ\r\nContent-Disposition: form-data; name=\"Token\"\r\n\r\nt\r\n--XyZ--"
        );
        assert_eq!(body.content_type(), "multipart/form-data; boundary=XyZ");
    }

    #[test]
    fn test_encode_empty_text_value() {
        let body = Form::new()
            .text("Environment", "")
            .encode_with_boundary("XyZ")
            .unwrap();

        assert_eq!(
            body.as_bytes(),
            b"--XyZ\r\nContent-Disposition: form-data; name=\"Environment\"\r\n\r\n\r\n--XyZ--"
        );
    }

    #[test]
    fn test_encode_empty_form() {
        let body = Form::new().encode_with_boundary("XyZ").unwrap();
        assert_eq!(body.as_bytes(), b"--XyZ--");
    }

    #[test]
    fn test_encode_file_part_with_content_type() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir, "report.json", b"{\"passed\":3}");

        let body = Form::new()
            .file("Data", &path)
            .encode_with_boundary("XyZ")
            .unwrap();

        assert_eq!(
            body.as_bytes(),
            b"--XyZ\r\nContent-Disposition: form-data; name=\"Data\"; filename=\"report.json\"\r\n\
              Content-Type: application/json\r\n\r\n{\"passed\":3}\r\n--XyZ--"
                .as_slice()
        );
    }

    #[test]
    fn test_encode_file_part_without_detected_type() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir, "report", b"raw");

        let body = Form::new()
            .file("Data", &path)
            .encode_with_boundary("XyZ")
            .unwrap();

        assert_eq!(
            body.as_bytes(),
            b"--XyZ\r\nContent-Disposition: form-data; name=\"Data\"; filename=\"report\"\r\n\r\nraw\r\n--XyZ--"
        );
    }

    #[test]
    fn test_encode_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.xml");

        let err = Form::new()
            .text("Token", "t")
            .file("Data", &path)
            .encode()
            .unwrap_err();

        match err {
            UploadError::FileAccess { path: err_path, source } => {
                assert_eq!(err_path, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_encode_parses_back_to_the_same_fields() {
        let dir = TempDir::new().unwrap();
        let binary_content: Vec<u8> = (0..=255u8).chain(b"\r\n\r\n".iter().copied()).collect();
        let path = write_fixture(&dir, "results.bin", &binary_content);

        let form = Form::new()
            .text("ReportName", "nightly")
            .text("Environment", "")
            .text("Notes", "multi\r\nline value")
            .file("Data", &path);
        let body = form.encode().unwrap();

        let parsed = read_multipart(body.as_bytes(), body.boundary()).await;
        let names: Vec<_> = parsed.iter().map(|part| part.name.as_str()).collect();
        assert_eq!(names, ["ReportName", "Environment", "Notes", "Data"]);

        let contents: HashMap<_, _> = parsed
            .iter()
            .map(|part| (part.name.as_str(), part.content.as_slice()))
            .collect();
        assert_eq!(contents["ReportName"], b"nightly");
        assert_eq!(contents["Environment"], b"");
        assert_eq!(contents["Notes"], b"multi\r\nline value");
        assert_eq!(contents["Data"], binary_content.as_slice());
        assert_eq!(parsed[3].file_name.as_deref(), Some("results.bin"));
        assert_eq!(
            parsed[3].content_type.as_deref(),
            Some("application/octet-stream")
        );
    }

    #[tokio::test]
    async fn test_encode_is_readable_with_and_without_content_type() {
        let dir = TempDir::new().unwrap();
        let report = write_fixture(&dir, "report.xml", b"<xml/>");
        let untyped = write_fixture(&dir, "report", b"raw");

        let body = Form::new()
            .text("Token", "t")
            .text("Environment", "")
            .file("Data", &report)
            .file("Raw", &untyped)
            .encode()
            .unwrap();

        let parsed = read_multipart(body.as_bytes(), body.boundary()).await;
        assert_eq!(
            parsed,
            [
                ParsedPart {
                    name: "Token".into(),
                    file_name: None,
                    content_type: None,
                    content: b"t".to_vec(),
                },
                ParsedPart {
                    name: "Environment".into(),
                    file_name: None,
                    content_type: None,
                    content: Vec::new(),
                },
                ParsedPart {
                    name: "Data".into(),
                    file_name: Some("report.xml".into()),
                    content_type: Some("text/xml".into()),
                    content: b"<xml/>".to_vec(),
                },
                ParsedPart {
                    name: "Raw".into(),
                    file_name: Some("report".into()),
                    content_type: None,
                    content: b"raw".to_vec(),
                },
            ]
        );
    }

    #[test]
    fn test_encode_rejects_file_name_breaking_the_header() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir, "nightly\"report.xml", b"<xml/>");

        let err = Form::new().file("Data", &path).encode().unwrap_err();

        match err {
            UploadError::FileAccess { path: err_path, source } => {
                assert_eq!(err_path, path);
                assert_eq!(source.kind(), std::io::ErrorKind::InvalidInput);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_encode_generates_fresh_boundaries() {
        let form = Form::new().text("Token", "t");
        let first = form.encode().unwrap();
        let second = form.encode().unwrap();

        assert!(first.boundary().starts_with(BOUNDARY_PREFIX));
        assert_eq!(
            first.boundary().len(),
            BOUNDARY_PREFIX.len() + BOUNDARY_RANDOM_LEN
        );
        assert_ne!(first.boundary(), second.boundary());
        assert_eq!(
            first.content_type(),
            format!("multipart/form-data; boundary={}", first.boundary())
        );
    }

    #[test]
    fn test_choose_boundary_skips_colliding_candidates() {
        let parts = [
            LoadedPart::Text {
                name: "Token",
                value: "value containing --first-- somewhere",
            },
            LoadedPart::File {
                name: "Data",
                file_name: "report.xml".into(),
                content_type: None,
                bytes: b"<xml>second</xml>".to_vec(),
            },
        ];
        let mut candidates = ["first", "second", "third"].into_iter();

        let boundary = choose_boundary(&parts, || candidates.next().unwrap().to_owned());

        assert_eq!(boundary, "third");
    }

    #[test]
    fn test_form_keeps_insertion_order() {
        let form = Form::new()
            .text("B", "1")
            .file("A", "report.xml")
            .text("B", "2");

        let names: Vec<_> = form.parts().iter().map(FormPart::name).collect();
        assert_eq!(names, ["B", "A", "B"]);
    }
}
