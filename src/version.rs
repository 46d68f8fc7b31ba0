//! Version resolution for package artifacts.
//!
//! A caller may request a symbolic version alias (e.g. "latest") that does
//! not match the concrete version baked into the artifact; reconciling the
//! two avoids redundant re-uploads. When both a properties entry and a
//! pattern are configured, the version inside the artifact is authoritative
//! and the explicit version field is ignored.

use anyhow::Result;
use log::debug;
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

use crate::crx::DesiredPackage;
use crate::error::CrxError;

/// Determines the authoritative version string for the desired package.
pub fn resolve_version(desired: &DesiredPackage) -> Result<String> {
    match (&desired.properties_file, &desired.version_pattern) {
        (Some(entry), Some(pattern)) => {
            let version = extract_version(&desired.artifact, entry, pattern)?;
            debug!(
                "Resolved version '{}' from {} inside {:?}",
                version, entry, desired.artifact
            );
            Ok(version)
        }
        _ => desired.version.clone().ok_or_else(|| {
            CrxError::VersionExtraction {
                artifact: desired.artifact.clone(),
                reason: "neither an explicit version nor a properties file and pattern configured"
                    .to_string(),
            }
            .into()
        }),
    }
}

/// Reads one named entry from the artifact archive and applies the pattern,
/// returning its first capture group. No full extraction takes place.
fn extract_version(artifact: &Path, entry_name: &str, pattern: &str) -> Result<String> {
    let fail = |reason: String| CrxError::VersionExtraction {
        artifact: artifact.to_path_buf(),
        reason,
    };

    let pattern =
        Regex::new(pattern).map_err(|e| fail(format!("invalid version pattern: {}", e)))?;

    let file =
        File::open(artifact).map_err(|e| fail(format!("cannot open artifact: {}", e)))?;
    let mut archive =
        ZipArchive::new(file).map_err(|e| fail(format!("not a readable zip archive: {}", e)))?;
    let mut entry = archive
        .by_name(entry_name)
        .map_err(|e| fail(format!("no '{}' entry in archive: {}", entry_name, e)))?;

    let mut contents = String::new();
    entry
        .read_to_string(&mut contents)
        .map_err(|e| fail(format!("cannot read '{}' entry: {}", entry_name, e)))?;

    let captures = pattern
        .captures(&contents)
        .ok_or_else(|| fail(format!("pattern '{}' matched nothing in '{}'", pattern, entry_name)))?;
    let version = captures
        .get(1)
        .ok_or_else(|| fail(format!("pattern '{}' has no capture group", pattern)))?;

    Ok(version.as_str().to_string())
}
