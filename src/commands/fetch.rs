use console::style;
use reqwest::blocking::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Error fetching OpenAPI specification: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("The response from the URL is not valid JSON.")]
    InvalidJson(#[source] serde_json::Error),
}

pub struct SpecFetcher {
    client: Client,
}

impl SpecFetcher {
    pub fn new() -> Self {
        SpecFetcher {
            client: Client::new(),
        }
    }

    /// Single GET with transport defaults. Non-2xx statuses count as transport failures.
    pub fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        let full_url = normalize_url(url);
        debug!(url = %full_url, "fetching OpenAPI specification");

        let response = self.client.get(&full_url).send()?.error_for_status()?;
        let body = response.text()?;

        serde_json::from_str(&body).map_err(FetchError::InvalidJson)
    }

    /// Like [`fetch`](Self::fetch), but reports the failure on the console and
    /// hands back `None` instead.
    pub fn fetch_or_report(&self, url: &str) -> Option<Value> {
        match self.fetch(url) {
            Ok(spec) => Some(spec),
            Err(e) => {
                warn!(url, error = %e, "could not retrieve OpenAPI specification");
                println!("❌ {}", style(&e).red());
                None
            }
        }
    }
}

impl Default for SpecFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Trims the input and adds `http://` if no scheme was given.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.contains("://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}
