//! Service configuration and endpoint construction.
//!
//! Every client takes an explicit [`ServiceConfig`] instead of reading
//! ambient state, so the same process can talk to several instances and
//! tests can point at a mock server.

/// Basic-auth credentials for the package-manager service.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

/// Connection parameters for one package-manager instance.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub credentials: Credentials,
}

impl ServiceConfig {
    pub fn new(host: impl Into<String>, port: u16, credentials: Credentials) -> Self {
        Self {
            host: host.into(),
            port,
            credentials,
        }
    }

    /// Endpoint serving the package listing (`cmd=ls`).
    pub fn list_url(&self) -> String {
        format!("http://{}:{}/crx/packmgr/service.jsp", self.host, self.port)
    }

    /// Endpoint accepting package uploads (`cmd=upload`).
    pub fn upload_url(&self) -> String {
        format!("http://{}:{}/crx/packmgr/service/.json", self.host, self.port)
    }

    /// Endpoint for commands addressed to an already-uploaded package.
    ///
    /// The download name is the package's remote identifier; two versions of
    /// the same package have distinct download names.
    pub fn command_url(&self, group: &str, download_name: &str) -> String {
        format!(
            "http://{}:{}/crx/packmgr/service/.json/etc/packages/{}/{}",
            self.host, self.port, group, download_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServiceConfig {
        ServiceConfig::new(
            "author.example.com",
            4502,
            Credentials {
                user: "admin".into(),
                password: "admin".into(),
            },
        )
    }

    #[test]
    fn test_list_url() {
        assert_eq!(
            config().list_url(),
            "http://author.example.com:4502/crx/packmgr/service.jsp"
        );
    }

    #[test]
    fn test_upload_url() {
        assert_eq!(
            config().upload_url(),
            "http://author.example.com:4502/crx/packmgr/service/.json"
        );
    }

    #[test]
    fn test_command_url() {
        assert_eq!(
            config().command_url("public", "site-1.0.zip"),
            "http://author.example.com:4502/crx/packmgr/service/.json/etc/packages/public/site-1.0.zip"
        );
    }
}
