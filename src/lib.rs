pub mod config;
pub mod crx;
pub mod error;
pub mod http;
pub mod reconcile;
pub mod version;
