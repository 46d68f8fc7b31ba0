//! Data model shared by the protocol clients and the reconciler.

use std::path::PathBuf;

/// One package instance as reported by the service's listing endpoint.
///
/// Constructed fresh on every directory query and discarded when the
/// current action finishes; nothing here is cached or mutated. Timestamps
/// and the size field arrive as loosely-typed strings and are kept opaque;
/// the only consumer of `last_unpacked` checks presence, never ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageRecord {
    pub group: String,
    pub name: String,
    pub version: String,
    /// The artifact's remote filename. This is the only stable handle for
    /// delete/install/activate/uninstall: two records may share `name` but
    /// differ in `version` and `download_name`.
    pub download_name: String,
    pub size: Option<String>,
    pub created: Option<String>,
    pub created_by: Option<String>,
    pub last_modified: Option<String>,
    pub last_modified_by: Option<String>,
    pub last_unpacked: Option<String>,
    pub last_unpacked_by: Option<String>,
}

/// Caller intent: the package that should exist on the service.
#[derive(Debug, Clone, Default)]
pub struct DesiredPackage {
    /// Package name as registered with the service.
    pub name: String,
    /// Group (namespace) under `/etc/packages`.
    pub group: String,
    /// Path to the local package artifact (a zip archive).
    pub artifact: PathBuf,
    /// Explicit desired version. Ignored when a properties file and a
    /// version pattern are both configured; the version baked into the
    /// artifact wins over a symbolic alias like "latest".
    pub version: Option<String>,
    /// Entry inside the artifact archive holding version metadata.
    pub properties_file: Option<String>,
    /// Regex whose first capture group is the version, applied to the
    /// properties entry.
    pub version_pattern: Option<String>,
    /// Remote filename override; defaults to the artifact's file name.
    pub download_name: Option<String>,
    /// Pass `recursive=true` to the install command (install subpackages).
    pub recursive: bool,
}

impl DesiredPackage {
    /// The remote filename operations should address.
    pub fn download_name(&self) -> String {
        self.download_name.clone().unwrap_or_else(|| {
            self.artifact
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }
}
