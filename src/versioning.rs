use crate::config::Channel;
use crate::error::{FetchFailure, SetupError};
use reqwest::blocking::Client;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://es.buddy.works/bdy";

/// Source of the newest published version for a channel.
pub trait VersionSource {
    fn latest(&self, channel: Channel) -> Result<String, SetupError>;
}

pub struct HttpVersionSource {
    client: Client,
    base_url: String,
}

impl HttpVersionSource {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        HttpVersionSource {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self, channel: Channel) -> String {
        format!("{}/{channel}/latest", self.base_url)
    }
}

impl VersionSource for HttpVersionSource {
    fn latest(&self, channel: Channel) -> Result<String, SetupError> {
        let url = self.endpoint(channel);
        debug!("GET {url}");
        let failed = |cause: FetchFailure| SetupError::VersionFetchFailed {
            url: url.clone(),
            cause,
        };
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| failed(e.into()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(failed(FetchFailure::Status(status)));
        }
        // taken verbatim, no semver validation
        let body = resp.text().map_err(|e| failed(e.into()))?;
        Ok(body.trim().to_string())
    }
}
