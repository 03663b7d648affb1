use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::api::ControlApi;
use crate::error::AdminError;

/// reqwest-backed [`ControlApi`] for a cluster whose control plane speaks
/// HTTP: admin requests are POSTed as JSON to one endpoint, node health is
/// read with a GET per serving node.
#[derive(Debug, Clone)]
pub struct HttpControlApi {
    client: reqwest::Client,
    admin_url: Url,
    health_urls: Vec<Url>,
}

impl HttpControlApi {
    #[must_use]
    pub fn builder(admin_url: Url) -> HttpControlApiBuilder {
        HttpControlApiBuilder {
            admin_url,
            health_urls: Vec::new(),
            timeout: None,
            client: None,
        }
    }

    #[must_use]
    pub fn admin_url(&self) -> &Url {
        &self.admin_url
    }
}

#[derive(Debug)]
pub struct HttpControlApiBuilder {
    admin_url: Url,
    health_urls: Vec<Url>,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

impl HttpControlApiBuilder {
    /// Register one node's health endpoint. Call once per serving node.
    #[must_use]
    pub fn health_url(mut self, url: Url) -> Self {
        self.health_urls.push(url);
        self
    }

    /// Per-request timeout. Ignored when a custom client is supplied.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a caller-configured client instead of the shared one.
    #[must_use]
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> Result<HttpControlApi, reqwest::Error> {
        let client = match (self.client, self.timeout) {
            (Some(client), _) => client,
            (None, Some(timeout)) => crate::http_client_with_timeout(timeout)?,
            (None, None) => crate::http_client().clone(),
        };
        Ok(HttpControlApi {
            client,
            admin_url: self.admin_url,
            health_urls: self.health_urls,
        })
    }
}

impl ControlApi for HttpControlApi {
    async fn admin_post(&self, body: &[u8]) -> Result<Vec<u8>, AdminError> {
        let response = self
            .client
            .post(self.admin_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdminError::Http { status });
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn health(&self) -> Result<Vec<String>, AdminError> {
        let mut reports = Vec::with_capacity(self.health_urls.len());
        for url in &self.health_urls {
            let response = self.client.get(url.clone()).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(AdminError::Http { status });
            }
            reports.push(response.text().await?);
        }
        Ok(reports)
    }
}
