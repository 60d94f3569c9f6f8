use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        source: Box<ureq::Transport>,
    },
    #[error("Failed to read response body from {url}: {source}")]
    Body { url: String, source: std::io::Error },
}

/// Somewhere the raw catalog markdown can be retrieved from.
pub trait DocumentSource {
    fn fetch(&self) -> Result<String, FetchError>;

    /// Human-readable location, for logs and errors.
    fn location(&self) -> String;
}

/// A markdown file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentSource for FileSource {
    fn fetch(&self) -> Result<String, FetchError> {
        if !self.path.exists() {
            return Err(FetchError::NotFound(self.path.clone()));
        }
        fs::read_to_string(&self.path).map_err(|source| FetchError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// A document served over HTTP(S), fetched with a blocking GET.
#[derive(Clone)]
pub struct HttpSource {
    url: String,
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl std::fmt::Debug for HttpSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSource")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl DocumentSource for HttpSource {
    fn fetch(&self) -> Result<String, FetchError> {
        log::debug!("fetching {}", self.url);
        let response = match self.agent.get(&self.url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(status, _)) => {
                return Err(FetchError::Status {
                    url: self.url.clone(),
                    status,
                });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(FetchError::Transport {
                    url: self.url.clone(),
                    source: Box::new(transport),
                });
            }
        };
        response.into_string().map_err(|source| FetchError::Body {
            url: self.url.clone(),
            source,
        })
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

/// A source picked from a location string.
#[derive(Debug, Clone)]
pub enum Source {
    File(FileSource),
    Http(HttpSource),
}

impl Source {
    /// `http://` and `https://` locations are fetched over the network,
    /// anything else is read as a local path.
    pub fn from_location(location: &str) -> Self {
        if is_url(location) {
            Source::Http(HttpSource::new(location))
        } else {
            Source::File(FileSource::new(location))
        }
    }
}

impl DocumentSource for Source {
    fn fetch(&self) -> Result<String, FetchError> {
        match self {
            Source::File(source) => source.fetch(),
            Source::Http(source) => source.fetch(),
        }
    }

    fn location(&self) -> String {
        match self {
            Source::File(source) => source.location(),
            Source::Http(source) => source.location(),
        }
    }
}

/// True for `http://` and `https://` locations, in any letter case.
pub fn is_url(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
