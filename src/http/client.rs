//! Authenticated HTTP client wrapping reqwest.
//!
//! All requests carry the configured basic-auth credentials. The wrapper
//! reports the raw status code and body; classifying a non-success status
//! is left to the protocol clients so their errors can name the operation
//! that failed.

use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use std::path::Path;

use crate::config::Credentials;

/// Status and body of a completed request.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client carrying basic-auth credentials for every request.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    credentials: Credentials,
}

impl HttpClient {
    /// Creates a new client wrapping the given reqwest Client.
    pub fn new(client: Client, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Performs an authenticated GET and returns the status and body text.
    #[tracing::instrument(skip(self))]
    pub async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse> {
        debug!("GET {} with query {:?}...", url, query);

        let response = self
            .client
            .get(url)
            .query(query)
            .basic_auth(&self.credentials.user, Some(&self.credentials.password))
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;

        Ok(HttpResponse { status, body })
    }

    /// Performs an authenticated POST with query parameters only.
    #[tracing::instrument(skip(self))]
    pub async fn post(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse> {
        debug!("POST {} with query {:?}...", url, query);

        let response = self
            .client
            .post(url)
            .query(query)
            .basic_auth(&self.credentials.user, Some(&self.credentials.password))
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;

        Ok(HttpResponse { status, body })
    }

    /// Performs an authenticated multipart POST with a local file as the
    /// named form field.
    #[tracing::instrument(skip(self))]
    pub async fn post_multipart_file(
        &self,
        url: &str,
        query: &[(&str, &str)],
        field: &'static str,
        path: &Path,
    ) -> Result<HttpResponse> {
        debug!("POST multipart {} with file {:?}...", url, path);

        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read local file {:?}", path))?;
        debug!("Read {} bytes from {:?}", bytes.len(), path);

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "package.zip".to_string());
        let form = Form::new().part(field, Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(url)
            .query(query)
            .basic_auth(&self.credentials.user, Some(&self.credentials.password))
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;

        Ok(HttpResponse { status, body })
    }
}
