//! Reconciliation engine.
//!
//! Each action compares the caller's desired (name, version) against the
//! records currently deployed on the service and drives the command
//! executor until remote state converges. The plan is computed fresh per
//! invocation and never persisted; between the listing read and the
//! subsequent writes no re-validation takes place.

use anyhow::Result;
use log::{debug, info};

use crate::crx::{DesiredPackage, PackageCommands, PackageDirectory};
use crate::version;

/// Drives delete/upload/install decisions for one package per invocation.
pub struct Reconciler<'a, D: PackageDirectory, C: PackageCommands> {
    directory: &'a D,
    commands: &'a C,
}

impl<'a, D: PackageDirectory, C: PackageCommands> Reconciler<'a, D, C> {
    pub fn new(directory: &'a D, commands: &'a C) -> Self {
        Self {
            directory,
            commands,
        }
    }

    /// Converges the uploaded state: purge every record of another version,
    /// then upload the local artifact unless the desired version is already
    /// present.
    ///
    /// Stale versions are deleted before the upload so the two operations
    /// never address the same download name. After a successful run at most
    /// one remote record carries the desired version.
    #[tracing::instrument(skip(self, desired), fields(package = %desired.name))]
    pub async fn upload(&self, desired: &DesiredPackage) -> Result<()> {
        let version = version::resolve_version(desired)?;
        let current = self.directory.list_packages(&desired.name).await?;

        let mut already_uploaded = false;
        for record in &current {
            if record.version == version {
                already_uploaded = true;
            } else {
                debug!(
                    "Deleting stale version {} ({})",
                    record.version, record.download_name
                );
                self.commands
                    .delete(&desired.group, &record.download_name)
                    .await?;
            }
        }

        if already_uploaded {
            info!("{} {} is already uploaded", desired.name, version);
        } else {
            self.commands.upload(&desired.artifact).await?;
        }
        Ok(())
    }

    /// Converges the installed state: purge stale versions as for upload,
    /// then install unless an already-unpacked record of the desired
    /// version survives.
    ///
    /// The unpacked check is the idempotence guard; a record that was
    /// uploaded but never unpacked still needs the install command.
    #[tracing::instrument(skip(self, desired), fields(package = %desired.name))]
    pub async fn install(&self, desired: &DesiredPackage) -> Result<()> {
        let version = version::resolve_version(desired)?;
        let current = self.directory.list_packages(&desired.name).await?;

        let mut already_unpacked = false;
        for record in &current {
            if record.version == version {
                if record.last_unpacked.is_some() {
                    already_unpacked = true;
                }
            } else {
                debug!(
                    "Deleting stale version {} ({})",
                    record.version, record.download_name
                );
                self.commands
                    .delete(&desired.group, &record.download_name)
                    .await?;
            }
        }

        if already_unpacked {
            info!("{} {} is already installed", desired.name, version);
        } else {
            self.commands
                .install(&desired.group, &desired.download_name(), desired.recursive)
                .await?;
        }
        Ok(())
    }

    /// Deletes the named download without consulting current state.
    pub async fn delete(&self, group: &str, download_name: &str) -> Result<()> {
        self.commands.delete(group, download_name).await
    }

    /// Replicates the named download; activating an already-activated
    /// package is assumed safe on the service side.
    pub async fn activate(&self, group: &str, download_name: &str) -> Result<()> {
        self.commands.activate(group, download_name).await
    }

    /// Uninstalls the named download; same idempotence assumption as
    /// [`Reconciler::activate`].
    pub async fn uninstall(&self, group: &str, download_name: &str) -> Result<()> {
        self.commands.uninstall(group, download_name).await
    }
}
