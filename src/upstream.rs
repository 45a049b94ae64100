//! HTTP client for the upstream invoice service.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::Error;

/// A client for the upstream service that owns the invoice, estimate, client
/// and service records.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    /// Create a client for the service at `base_url`, e.g. "http://127.0.0.1:5000".
    ///
    /// Requests that take longer than `timeout` are treated as failed.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .inspect_err(|error| tracing::error!("could not build the HTTP client: {error}"))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// The base URL of the upstream service, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET` the JSON document at `path` with the query parameters `query`.
    ///
    /// # Errors
    /// Returns an error if the request fails, the service responds with an
    /// error status, or the body cannot be decoded as `T`.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path);
        tracing::debug!("GET {url} {query:?}");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<T>().await?)
    }

    /// `GET` the resource at `path`, ignoring the response body.
    ///
    /// # Errors
    /// Returns an error if the request fails or the service responds with an
    /// error status.
    pub(crate) async fn get(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path);
        tracing::debug!("GET {url}");

        self.client.get(&url).send().await?.error_for_status()?;

        Ok(())
    }
}
