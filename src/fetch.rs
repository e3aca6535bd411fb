//! Source archive downloading
//!
//! This module provides a blocking HTTP client with:
//! - Configurable timeout and User-Agent
//! - Exponential backoff retry logic (max 3 retries)
//! - A progress spinner while the archive is streamed to disk

use crate::error::FetchError;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default timeout for HTTP requests (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("specgen/", env!("CARGO_PKG_VERSION"));

/// Maximum number of retry attempts
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// HTTP downloader with retry logic
pub struct Fetcher {
    client: reqwest::blocking::Client,
    max_retries: u32,
    show_progress: bool,
}

impl Fetcher {
    /// Create a new fetcher with default settings
    pub fn new(show_progress: bool) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| FetchError::Http {
                url: String::new(),
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
            show_progress,
        })
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Download a URL into the destination directory
    ///
    /// The file name is the final path segment of the URL. Returns the path
    /// of the written file.
    pub fn download(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, FetchError> {
        let filename = file_name_from_url(url)?;
        let dest = dest_dir.join(filename);

        let spinner = self.spinner(&format!("fetching {}", filename));
        let result = self.download_to(url, &dest);
        if let Some(spinner) = spinner {
            match &result {
                Ok(_) => spinner.finish_with_message(format!("fetched {}", filename)),
                Err(_) => spinner.finish_and_clear(),
            }
        }
        result?;
        Ok(dest)
    }

    fn download_to(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let mut response = self.get_with_retries(url)?;
        let mut file = File::create(dest).map_err(|e| FetchError::Io {
            path: dest.to_path_buf(),
            source: e,
        })?;
        response.copy_to(&mut file).map_err(|e| FetchError::Http {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Perform a GET request with retry logic
    fn get_with_retries(&self, url: &str) -> Result<reqwest::blocking::Response, FetchError> {
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            match self.client.get(url).send() {
                Ok(response) => {
                    let status = response.status();
                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS
                        || status.is_server_error()
                    {
                        last_error = Some(FetchError::Http {
                            url: url.to_string(),
                            message: format!("HTTP {}", status),
                        });
                    } else if !status.is_success() {
                        return Err(FetchError::Http {
                            url: url.to_string(),
                            message: format!("HTTP {}", status),
                        });
                    } else {
                        return Ok(response);
                    }
                }
                Err(e) => {
                    last_error = Some(FetchError::Http {
                        url: url.to_string(),
                        message: e.to_string(),
                    });
                }
            }

            if attempt < self.max_retries {
                std::thread::sleep(Duration::from_millis(delay));
                delay *= 2;
            }
        }

        Err(last_error.unwrap_or_else(|| FetchError::Http {
            url: url.to_string(),
            message: "unknown error".to_string(),
        }))
    }

    fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .expect("Invalid template"),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        Some(spinner)
    }
}

/// Derive the destination file name from a URL
pub fn file_name_from_url(url: &str) -> Result<&str, FetchError> {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url)
        .trim_end_matches('/');
    let path = path.split_once("://").map(|(_, rest)| rest).unwrap_or(path);
    let name = match path.rsplit_once('/') {
        Some((_, name)) => name,
        None => "",
    };
    if name.is_empty() {
        return Err(FetchError::InvalidUrl {
            url: url.to_string(),
        });
    }
    Ok(name)
}
