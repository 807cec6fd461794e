//! Builds the feed URL, performs the single GET and parses the body.

use std::{fmt::Debug, time::Duration};

use reqwest::blocking::Client;
use tracing::debug;

use crate::{
    document::WeatherDocument,
    error::{Result, WeatherError},
};

pub const DEFAULT_ENDPOINT: &str = "http://www.google.com/ig/api";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for the document loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Base URL of the feed, without query string.
    pub endpoint: String,
    /// `hl` value sent when the caller does not pick one.
    pub language: String,
    /// Upper bound on the whole request.
    pub timeout: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl LoaderConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// The HTTP capability the loader depends on: one GET, body as text.
pub trait HttpFetch: Debug {
    fn get(&self, url: &str) -> Result<String>;
}

/// [`HttpFetch`] backed by a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    http: Client,
}

impl ReqwestFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

impl HttpFetch for ReqwestFetcher {
    fn get(&self, url: &str) -> Result<String> {
        let res = self.http.get(url).send()?;

        let status = res.status();
        let body = res.text()?;

        if !status.is_success() {
            return Err(WeatherError::Fetch(format!(
                "request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        Ok(body)
    }
}

/// Fetches and parses one feed document per call.
#[derive(Debug)]
pub struct Loader<F: HttpFetch = ReqwestFetcher> {
    config: LoaderConfig,
    fetcher: F,
}

impl Loader<ReqwestFetcher> {
    /// Loader using reqwest with the configured timeout.
    pub fn new(config: LoaderConfig) -> Result<Self> {
        let fetcher = ReqwestFetcher::new(config.timeout)?;
        Ok(Self { config, fetcher })
    }
}

impl<F: HttpFetch> Loader<F> {
    pub fn with_fetcher(config: LoaderConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch the feed for `city` in `language` (the configured default when `None`).
    pub fn load(&self, city: &str, language: Option<&str>) -> Result<WeatherDocument> {
        let language = language.unwrap_or(self.config.language.as_str());
        let url = request_url(&self.config.endpoint, city, language)?;

        debug!(%url, "fetching weather feed");
        let body = self.fetcher.get(&url)?;
        debug!(bytes = body.len(), "received weather feed");

        WeatherDocument::parse(&body)
    }
}

/// `<endpoint>?weather=<city>&hl=<language>&oe=UTF-8` with the city percent-encoded.
pub fn request_url(endpoint: &str, city: &str, language: &str) -> Result<String> {
    validate_language(language)?;

    Ok(format!(
        "{}?weather={}&hl={}&oe=UTF-8",
        endpoint,
        urlencoding::encode(city),
        language,
    ))
}

fn validate_language(language: &str) -> Result<()> {
    let valid = !language.is_empty()
        && language
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(WeatherError::InvalidArgument(format!(
            "Language must be a code like 'en' or 'pt-BR', not '{language}'"
        )))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
