//! Raw page fetchers
//!
//! The engine never talks to the network directly: it asks a [`Fetcher`]
//! (blocking) or an [`AsyncFetcher`] for the page behind a URL.

use async_trait::async_trait;
use pallada_core::errors::{ExError, ExErrorKind};
use pallada_core::{log_op_end, log_op_error, log_op_start};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::HttpConfig;
use crate::Result;

/// Blocking source of raw pages
pub trait Fetcher {
    /// Body of the page at `url`
    ///
    /// # Errors
    ///
    /// `Fetch` when the page cannot be retrieved.
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Async source of raw pages
#[async_trait]
pub trait AsyncFetcher: Send + Sync {
    /// Body of the page at `url`
    ///
    /// # Errors
    ///
    /// `Fetch` when the page cannot be retrieved.
    async fn fetch(&self, url: &str) -> Result<String>;
}

fn fetch_error(url: &str, message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Fetch)
        .with_op("fetch")
        .with_entity_id(url)
        .with_message(message)
}

fn client_error(err: reqwest::Error) -> ExError {
    ExError::new(ExErrorKind::Config)
        .with_op("build_http_client")
        .with_message(err.to_string())
}

/// Fetcher over `reqwest`'s blocking client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// # Errors
    ///
    /// `Config` if the TLS backend cannot be initialised.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .user_agent(&config.user_agent)
            .build()
            .map_err(client_error)?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let start = Instant::now();
        log_op_start!("fetch", url = url);

        let body = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(|e| fetch_error(url, e.to_string()));

        match body {
            Ok(text) => {
                log_op_end!("fetch", duration_ms = start.elapsed().as_millis() as u64, url = url);
                Ok(text)
            }
            Err(e) => {
                log_op_error!("fetch", e.clone(), duration_ms = start.elapsed().as_millis() as u64);
                Err(e)
            }
        }
    }
}

/// Fetcher over `reqwest`'s async client
#[derive(Debug, Clone)]
pub struct AsyncHttpFetcher {
    client: reqwest::Client,
}

impl AsyncHttpFetcher {
    /// # Errors
    ///
    /// `Config` if the TLS backend cannot be initialised.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .user_agent(&config.user_agent)
            .build()
            .map_err(client_error)?;
        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> std::result::Result<String, reqwest::Error> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

#[async_trait]
impl AsyncFetcher for AsyncHttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let start = Instant::now();
        log_op_start!("fetch", url = url);

        match self.get(url).await {
            Ok(text) => {
                log_op_end!("fetch", duration_ms = start.elapsed().as_millis() as u64, url = url);
                Ok(text)
            }
            Err(e) => {
                let err = fetch_error(url, e.to_string());
                log_op_error!("fetch", err.clone(), duration_ms = start.elapsed().as_millis() as u64);
                Err(err)
            }
        }
    }
}

/// Serves saved portal pages from a directory.
///
/// `<base>/timetable/group/3099` is read from `<dir>/group_3099.html`.
#[derive(Debug, Clone)]
pub struct ProxyDirFetcher {
    dir: PathBuf,
}

impl ProxyDirFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Saved-page path for a portal URL
    ///
    /// # Errors
    ///
    /// `Fetch` if the URL does not end in `/<kind>/<id>`.
    pub fn page_path(&self, url: &str) -> Result<PathBuf> {
        let mut segments = url.trim_end_matches('/').rsplit('/');
        match (segments.next(), segments.next()) {
            (Some(id), Some(kind)) if !id.is_empty() && !kind.is_empty() => {
                Ok(self.dir.join(format!("{}_{}.html", kind, id)))
            }
            _ => Err(fetch_error(url, "URL does not name a timetable page")),
        }
    }
}

impl Fetcher for ProxyDirFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let path = self.page_path(url)?;
        tracing::debug!(url, path = %path.display(), "serving saved page");
        std::fs::read_to_string(&path)
            .map_err(|e| fetch_error(url, format!("{}: {}", path.display(), e)))
    }
}

#[async_trait]
impl AsyncFetcher for ProxyDirFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let path = self.page_path(url)?;
        tracing::debug!(url, path = %path.display(), "serving saved page");
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| fetch_error(url, format!("{}: {}", path.display(), e)))
    }
}
