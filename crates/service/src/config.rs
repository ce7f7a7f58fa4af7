use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use url::Url;

/// Account seeded at startup when `seed_default_account` is set. The
/// fixed values let client fixtures point at the emulator without any
/// provisioning step.
pub const DEFAULT_ACCOUNT_ID: &str = "bfbdec2a2da54ab1bc801b051ebed06a";
pub const DEFAULT_ACCOUNT_HASH: &str = "573a5ca1603c440";

#[derive(Debug, Clone)]
pub struct Config {
    /// address for the HTTP server to listen on
    pub listen_addr: SocketAddr,
    /// public base URL clients reach the emulator at; upload URLs issued
    /// by the token flow are joined against this
    pub public_url: Url,
    /// a path to a sqlite database, if not set then an
    ///  in-memory database will be used
    pub sqlite_path: Option<PathBuf>,
    /// root directory for stored images, if not set then
    ///  a temporary directory will be used
    pub storage_path: Option<PathBuf>,
    /// insert the default account at startup if it is missing
    pub seed_default_account: bool,

    // misc
    pub log_level: tracing::Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), 8000),
            public_url: Url::parse("http://localhost:8000").expect("static URL parses"),
            sqlite_path: None,
            storage_path: None,
            seed_default_account: false,
            log_level: tracing::Level::INFO,
        }
    }
}
