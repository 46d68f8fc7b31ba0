//! Remote operation executor.
//!
//! Each operation issues one authenticated command against the service's
//! `.json` endpoint and checks only the HTTP status. Response bodies are
//! deliberately not validated; callers wanting real verification of the
//! service's JSON outcome must add it themselves.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use std::path::Path;

use crate::config::ServiceConfig;
use crate::error::CrxError;
use crate::http::HttpClient;

/// Write access to the remote package directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PackageCommands: Send + Sync {
    /// Removes an uploaded package from the service.
    async fn delete(&self, group: &str, download_name: &str) -> Result<()>;

    /// Uploads a local artifact as a new package.
    async fn upload(&self, artifact: &Path) -> Result<()>;

    /// Installs (unpacks) an uploaded package, optionally with subpackages.
    async fn install(&self, group: &str, download_name: &str, recursive: bool) -> Result<()>;

    /// Replicates an installed package to the publish instances.
    async fn activate(&self, group: &str, download_name: &str) -> Result<()>;

    /// Reverts an installed package's content.
    async fn uninstall(&self, group: &str, download_name: &str) -> Result<()>;
}

/// Executor backed by the CRX command endpoint.
pub struct CrxCommands {
    http: HttpClient,
    config: ServiceConfig,
}

impl CrxCommands {
    pub fn new(http: HttpClient, config: ServiceConfig) -> Self {
        Self { http, config }
    }

    /// Issues one `cmd={command}` POST for the group-qualified package path.
    async fn run(
        &self,
        command: &str,
        group: &str,
        download_name: &str,
        extra: &[(&str, &str)],
    ) -> Result<()> {
        let url = self.config.command_url(group, download_name);
        let mut query = vec![("cmd", command)];
        query.extend_from_slice(extra);
        debug!("Running '{}' on {}...", command, url);

        let response = self
            .http
            .post(&url, &query)
            .await
            .with_context(|| format!("Failed to send '{}' command", command))?;

        if !response.is_success() {
            return Err(CrxError::Command {
                command: command.to_string(),
                endpoint: url,
                status: response.status,
            }
            .into());
        }

        info!("'{}' on {}/{} succeeded", command, group, download_name);
        Ok(())
    }
}

#[async_trait]
impl PackageCommands for CrxCommands {
    #[tracing::instrument(skip(self))]
    async fn delete(&self, group: &str, download_name: &str) -> Result<()> {
        self.run("delete", group, download_name, &[]).await
    }

    #[tracing::instrument(skip(self))]
    async fn upload(&self, artifact: &Path) -> Result<()> {
        let url = self.config.upload_url();
        debug!("Uploading {:?} to {}...", artifact, url);

        let response = self
            .http
            .post_multipart_file(&url, &[("cmd", "upload")], "package", artifact)
            .await
            .context("Failed to send upload request")?;

        if !response.is_success() {
            return Err(CrxError::Command {
                command: "upload".to_string(),
                endpoint: url,
                status: response.status,
            }
            .into());
        }

        info!("Uploaded {:?}", artifact);
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn install(&self, group: &str, download_name: &str, recursive: bool) -> Result<()> {
        // The recursive flag rides along as a second structured query
        // parameter; the service sees cmd=install&recursive=true.
        let extra: &[(&str, &str)] = if recursive {
            &[("recursive", "true")]
        } else {
            &[]
        };
        self.run("install", group, download_name, extra).await
    }

    #[tracing::instrument(skip(self))]
    async fn activate(&self, group: &str, download_name: &str) -> Result<()> {
        self.run("replicate", group, download_name, &[]).await
    }

    #[tracing::instrument(skip(self))]
    async fn uninstall(&self, group: &str, download_name: &str) -> Result<()> {
        self.run("uninstall", group, download_name, &[]).await
    }
}
