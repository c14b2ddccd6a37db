use std::collections::HashMap;

use anyhow::Context;

use crate::foundation::error::{MsemError, MsemResult};

/// Source of remote image bytes (card scans).
pub trait ImageFetcher {
    /// Fetch the resource at `url` and return its body.
    fn fetch(&mut self, url: &str) -> MsemResult<Vec<u8>>;
}

/// Blocking HTTP fetcher.
///
/// There is no retry or timeout policy beyond `reqwest`'s defaults; any transport error or
/// non-success status fails the fetch.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Build a client with the crate user agent.
    pub fn new() -> MsemResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("msem-thumb/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;
        Ok(Self { client })
    }
}

impl ImageFetcher for HttpFetcher {
    #[tracing::instrument(skip(self))]
    fn fetch(&mut self, url: &str) -> MsemResult<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("GET '{url}'"))?
            .error_for_status()
            .with_context(|| format!("GET '{url}'"))?;
        let bytes = resp
            .bytes()
            .with_context(|| format!("read response body from '{url}'"))?;
        tracing::debug!(len = bytes.len(), "fetched");
        Ok(bytes.to_vec())
    }
}

/// In-memory fetcher serving fixed bodies by URL, recording every request.
#[derive(Clone, Debug, Default)]
pub struct MemoryFetcher {
    bodies: HashMap<String, Vec<u8>>,
    requests: Vec<String>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub fn insert(&mut self, url: impl Into<String>, body: Vec<u8>) -> &mut Self {
        self.bodies.insert(url.into(), body);
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> &[String] {
        &self.requests
    }
}

impl ImageFetcher for MemoryFetcher {
    fn fetch(&mut self, url: &str) -> MsemResult<Vec<u8>> {
        self.requests.push(url.to_string());
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| MsemError::Other(anyhow::anyhow!("no body registered for '{url}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
