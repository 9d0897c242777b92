//! Document sources: local markdown files and documents fetched over HTTP

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading an input document
#[derive(Error, Debug)]
pub enum SourceError {
    /// The server answered, but not with a text document
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The HTTP request itself failed
    #[error("HTTP request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The input file could not be opened or read
    #[error("Failed to read {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A command-line input: a URL or a local file path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Anything starting with "http"
    Url(String),
    /// Everything else
    File(PathBuf),
}

/// A loaded markdown document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Base name used for the CSV output file
    pub name: String,
    /// Markdown text
    pub markdown: String,
}

impl Input {
    /// Classify a command-line argument
    pub fn parse(arg: &str) -> Self {
        if arg.starts_with("http") {
            Self::Url(arg.to_string())
        } else {
            Self::File(PathBuf::from(arg))
        }
    }

    /// Name the output file is derived from
    ///
    /// The last path segment of a URL, or the file name of a path.
    pub fn output_name(&self) -> String {
        match self {
            Self::Url(url) => url_file_name(url),
            Self::File(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }

    /// Read or fetch the document
    ///
    /// # Returns
    /// * `Ok(Document)` - Markdown text and output name
    /// * `Err(SourceError)` - Unreadable file, failed request, non-200 status
    ///   or non-text content type
    pub fn load(&self) -> Result<Document, SourceError> {
        let markdown = match self {
            Self::Url(url) => {
                let client = Client::builder()
                    .build()
                    .map_err(|source| SourceError::Request {
                        url: url.clone(),
                        source,
                    })?;
                fetch(&client, url)?
            }
            Self::File(path) => read_file(path)?,
        };

        Ok(Document {
            name: self.output_name(),
            markdown,
        })
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{}", url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// GET a document, accepting only `200 OK` with a `text/*` content type
fn fetch(client: &Client, url: &str) -> Result<String, SourceError> {
    let request_error = |source: reqwest::Error| SourceError::Request {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().map_err(request_error)?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(SourceError::Fetch {
            url: url.to_string(),
            reason: status.to_string(),
        });
    }

    // text/markdown, text/x-markdown and text/plain are all seen in the wild
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !content_type.starts_with("text/") {
        return Err(SourceError::Fetch {
            url: url.to_string(),
            reason: format!("content type must be text/*, got {:?}", content_type),
        });
    }

    log::info!("Fetched {} ({})", url, content_type);

    let body = response.bytes().map_err(request_error)?;
    Ok(String::from_utf8_lossy(&body).into_owned())
}

/// Read a local document
fn read_file(path: &Path) -> Result<String, SourceError> {
    let bytes = std::fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Read {} ({} bytes)", path.display(), bytes.len());
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Final non-empty path segment of a URL, falling back to its host
fn url_file_name(url: &str) -> String {
    let from_parsed = Url::parse(url).ok().and_then(|parsed| {
        parsed
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(str::to_string)
            .or_else(|| parsed.host_str().map(str::to_string))
    });

    from_parsed.unwrap_or_else(|| {
        url.trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(url)
            .to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DOC_PATH: &str = "/docs/rfc-draft.md";

    /// Start a mock server answering GET on `DOC_PATH` with the given response
    async fn serve(status: u16, content_type: &str, body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DOC_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_raw(body, content_type))
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    /// Run the blocking fetch off the async test runtime
    async fn fetch_from(server: &MockServer) -> Result<String, SourceError> {
        let url = format!("{}{}", server.uri(), DOC_PATH);
        tokio::task::spawn_blocking(move || fetch(&local_client(), &url))
            .await
            .unwrap()
    }

    fn local_client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    #[test]
    fn test_parse_input_kind() {
        assert_eq!(
            Input::parse("https://example.com/a.md"),
            Input::Url("https://example.com/a.md".to_string())
        );
        assert_eq!(
            Input::parse("docs/a.md"),
            Input::File(PathBuf::from("docs/a.md"))
        );
    }

    #[test]
    fn test_output_name_for_url() {
        let input = Input::parse("https://example.com/rfc/rfc5280.md?raw=1");
        assert_eq!(input.output_name(), "rfc5280.md");

        let input = Input::parse("https://example.com/rfc/");
        assert_eq!(input.output_name(), "rfc");

        let input = Input::parse("https://example.com");
        assert_eq!(input.output_name(), "example.com");
    }

    #[test]
    fn test_output_name_for_file_is_base_name() {
        let input = Input::parse("docs/specs/cp.md");
        assert_eq!(input.output_name(), "cp.md");
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.md");
        std::fs::write(&path, "# 1 Overview\n").unwrap();

        let document = Input::File(path).load().unwrap();

        assert_eq!(document.name, "policy.md");
        assert_eq!(document.markdown, "# 1 Overview\n");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = Input::File(dir.path().join("missing.md"));

        let err = input.load().unwrap_err();

        assert!(matches!(err, SourceError::Io { .. }));
        assert!(err.to_string().contains("missing.md"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_fetch_text_document() {
        // Arrange: Server returning markdown
        let server = serve(200, "text/markdown; charset=utf-8", "# 1 Overview\n").await;

        // Act: Fetch it
        let markdown = fetch_from(&server).await.unwrap();

        // Assert: Body returned unchanged
        assert_eq!(markdown, "# 1 Overview\n");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_fetch_rejects_non_200() {
        let server = serve(404, "text/plain", "nope").await;

        let err = fetch_from(&server).await.unwrap_err();

        match err {
            SourceError::Fetch { reason, .. } => assert!(reason.contains("404")),
            other => panic!("Expected Fetch error, got {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_fetch_rejects_non_text_content_type() {
        let server = serve(200, "application/json", "{}").await;

        let err = fetch_from(&server).await.unwrap_err();

        match err {
            SourceError::Fetch { reason, .. } => assert!(reason.contains("application/json")),
            other => panic!("Expected Fetch error, got {:?}", other),
        }
    }
}
