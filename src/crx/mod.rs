//! Protocol clients for the CRX package-manager service.

mod commands;
mod directory;
mod types;

pub use commands::{CrxCommands, PackageCommands};
pub use directory::{CrxDirectory, PackageDirectory};
pub use types::{DesiredPackage, PackageRecord};

#[cfg(test)]
pub use commands::MockPackageCommands;
#[cfg(test)]
pub use directory::MockPackageDirectory;
