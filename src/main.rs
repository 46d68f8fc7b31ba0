use anyhow::Result;
use clap::Parser;
use crxpkg::config::{Credentials, ServiceConfig};
use crxpkg::crx::{CrxCommands, CrxDirectory, DesiredPackage, PackageDirectory};
use crxpkg::http::HttpClient;
use crxpkg::reconcile::Reconciler;
use std::path::PathBuf;

/// crxpkg - CRX package manager client
///
/// Upload, install, activate and remove content packages on a CRX
/// package-manager service (e.g. an AEM author instance). Intended as glue
/// for configuration-management tooling: each invocation converges one
/// package and exits.
///
/// Credentials can be supplied via the CRX_USER and CRX_PASSWORD
/// environment variables.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Package-manager host
    #[arg(long, value_name = "HOST", default_value = "localhost", global = true)]
    host: String,

    /// Package-manager port
    #[arg(long, value_name = "PORT", default_value_t = 4502, global = true)]
    port: u16,

    /// Basic-auth user
    #[arg(long, env = "CRX_USER", default_value = "admin", global = true)]
    user: String,

    /// Basic-auth password
    #[arg(long, env = "CRX_PASSWORD", default_value = "admin", global = true)]
    password: String,

    /// Package group (namespace under /etc/packages)
    #[arg(long, value_name = "GROUP", default_value = "public", global = true)]
    group: String,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Upload a package artifact, purging stale versions first
    Upload(ArtifactArgs),

    /// Install a package, purging stale versions first
    Install(InstallArgs),

    /// Delete an uploaded package
    Delete(DownloadArgs),

    /// Replicate (activate) an installed package
    Activate(DownloadArgs),

    /// Uninstall a package's content
    Uninstall(DownloadArgs),

    /// List the deployed records for a package name
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
struct ArtifactArgs {
    /// Package name as registered with the service
    #[arg(value_name = "NAME")]
    name: String,

    /// Path to the local package artifact (zip)
    #[arg(value_name = "ARTIFACT")]
    artifact: PathBuf,

    /// Desired version (ignored when --properties-file and
    /// --version-pattern are both given)
    #[arg(long, value_name = "VERSION")]
    pkg_version: Option<String>,

    /// Entry inside the artifact holding version metadata
    #[arg(long, value_name = "ENTRY", requires = "version_pattern")]
    properties_file: Option<String>,

    /// Regex whose first capture group is the version
    #[arg(long, value_name = "REGEX", requires = "properties_file")]
    version_pattern: Option<String>,

    /// Remote filename (defaults to the artifact's file name)
    #[arg(long, value_name = "FILE")]
    download_name: Option<String>,
}

impl ArtifactArgs {
    fn into_desired(self, group: String, recursive: bool) -> DesiredPackage {
        DesiredPackage {
            name: self.name,
            group,
            artifact: self.artifact,
            version: self.pkg_version,
            properties_file: self.properties_file,
            version_pattern: self.version_pattern,
            download_name: self.download_name,
            recursive,
        }
    }
}

#[derive(clap::Args, Debug)]
struct InstallArgs {
    #[command(flatten)]
    artifact: ArtifactArgs,

    /// Also install subpackages
    #[arg(long)]
    recursive: bool,
}

#[derive(clap::Args, Debug)]
struct DownloadArgs {
    /// The package's remote filename
    #[arg(value_name = "DOWNLOAD_NAME")]
    download_name: String,
}

#[derive(clap::Args, Debug)]
struct ListArgs {
    /// Package name as registered with the service
    #[arg(value_name = "NAME")]
    name: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = ServiceConfig::new(
        cli.host,
        cli.port,
        Credentials {
            user: cli.user,
            password: cli.password,
        },
    );
    let http = HttpClient::new(reqwest::Client::new(), config.credentials.clone());
    let directory = CrxDirectory::new(http.clone(), config.clone());
    let commands = CrxCommands::new(http, config);
    let reconciler = Reconciler::new(&directory, &commands);

    match cli.command {
        Commands::Upload(args) => {
            reconciler
                .upload(&args.into_desired(cli.group, false))
                .await?
        }
        Commands::Install(args) => {
            let recursive = args.recursive;
            reconciler
                .install(&args.artifact.into_desired(cli.group, recursive))
                .await?
        }
        Commands::Delete(args) => reconciler.delete(&cli.group, &args.download_name).await?,
        Commands::Activate(args) => reconciler.activate(&cli.group, &args.download_name).await?,
        Commands::Uninstall(args) => reconciler.uninstall(&cli.group, &args.download_name).await?,
        Commands::List(args) => {
            for record in directory.list_packages(&args.name).await? {
                println!(
                    "{}\t{}\t{}",
                    record.version,
                    record.download_name,
                    record.last_unpacked.as_deref().unwrap_or("-")
                );
            }
        }
    }
    Ok(())
}
