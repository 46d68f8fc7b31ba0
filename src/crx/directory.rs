//! Remote package directory client.
//!
//! Queries the service's listing endpoint (`cmd=ls`) and decodes the XML
//! response into [`PackageRecord`]s. The listing schema is loosely typed:
//! optional sub-elements map to `None` rather than failing the parse, but a
//! matching entry missing its `name` or `downloadname` fails closed.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;

use super::types::PackageRecord;
use crate::config::ServiceConfig;
use crate::error::CrxError;
use crate::http::HttpClient;

/// Read access to the remote package directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PackageDirectory: Send + Sync {
    /// Lists the currently-deployed records whose name equals
    /// `package_name` exactly. An unknown name yields an empty vector,
    /// not an error.
    async fn list_packages(&self, package_name: &str) -> Result<Vec<PackageRecord>>;
}

/// Directory client backed by the CRX listing endpoint.
pub struct CrxDirectory {
    http: HttpClient,
    config: ServiceConfig,
}

impl CrxDirectory {
    pub fn new(http: HttpClient, config: ServiceConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl PackageDirectory for CrxDirectory {
    #[tracing::instrument(skip(self))]
    async fn list_packages(&self, package_name: &str) -> Result<Vec<PackageRecord>> {
        let url = self.config.list_url();
        debug!("Listing packages named '{}' at {}...", package_name, url);

        let response = self
            .http
            .get_text(&url, &[("cmd", "ls")])
            .await
            .context("Failed to query the package listing")?;

        if !response.is_success() {
            return Err(CrxError::Protocol {
                endpoint: url,
                expected: "2xx".to_string(),
                actual: response.status.to_string(),
            }
            .into());
        }

        let records = parse_listing(&response.body, package_name, &url)?;
        debug!(
            "Found {} record(s) for package '{}'",
            records.len(),
            package_name
        );
        Ok(records)
    }
}

/// Decodes the listing body, keeping only entries matching `package_name`.
fn parse_listing(
    body: &str,
    package_name: &str,
    endpoint: &str,
) -> Result<Vec<PackageRecord>, CrxError> {
    let doc = roxmltree::Document::parse(body)
        .map_err(|e| CrxError::Parse(format!("listing is not well-formed XML: {}", e)))?;

    let response = doc
        .descendants()
        .find(|n| n.has_tag_name("response"))
        .ok_or_else(|| CrxError::Parse("listing has no <response> element".to_string()))?;

    let status = response
        .children()
        .find(|n| n.has_tag_name("status"))
        .ok_or_else(|| CrxError::Parse("listing has no <status> element".to_string()))?;
    let code = status.attribute("code").unwrap_or("");
    if code != "200" {
        return Err(CrxError::Protocol {
            endpoint: endpoint.to_string(),
            expected: "200".to_string(),
            actual: code.to_string(),
        });
    }

    let mut records = Vec::new();
    for package in response.descendants().filter(|n| n.has_tag_name("package")) {
        let field = |tag: &str| -> Option<String> {
            package
                .children()
                .find(|c| c.has_tag_name(tag))
                .and_then(|c| c.text())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        // An entry without a name can never be the requested package.
        let Some(name) = field("name") else {
            continue;
        };
        if name != package_name {
            continue;
        }

        let download_name = field("downloadname").ok_or_else(|| {
            CrxError::Parse(format!(
                "listing entry for '{}' is missing <downloadname>",
                package_name
            ))
        })?;

        records.push(PackageRecord {
            group: field("group").unwrap_or_default(),
            name,
            version: field("version").unwrap_or_default(),
            download_name,
            size: field("size"),
            created: field("created"),
            created_by: field("createdby"),
            last_modified: field("lastmodified"),
            last_modified_by: field("lastmodifiedby"),
            last_unpacked: field("lastunpacked"),
            last_unpacked_by: field("lastunpackedby"),
        });
    }

    Ok(records)
}
