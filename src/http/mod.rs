//! HTTP transport for the package-manager service.

mod client;

pub use client::{HttpClient, HttpResponse};
