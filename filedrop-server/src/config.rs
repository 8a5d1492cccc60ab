//! Server configuration
//!
//! Every option can come from a flag or an environment variable:
//! - `PORT`: listen port (default 3000)
//! - `HOST`: bind address (default 0.0.0.0)
//! - `PUBLIC_DIR`: static asset root (default `public`)
//! - `UPLOAD_DIR`: stored uploads (default `uploads`)
//! - `MAX_UPLOAD_BYTES`: request body ceiling for uploads (default 50 MiB)
//! - `REQUEST_TIMEOUT_SECS`: per-request timeout (default 120)
//!
//! Relative directories resolve against the working directory.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Command-line arguments for the `filedrop` binary
#[derive(Parser, Debug, Clone)]
#[command(
    name = "filedrop",
    version,
    about = "Minimal file hosting: static assets, uploads, and a stored file listing"
)]
pub struct ServerArgs {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Bind address
    #[arg(short, long, env = "HOST", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Directory served for GET requests
    #[arg(long, env = "PUBLIC_DIR", default_value = "public")]
    pub public_dir: PathBuf,

    /// Directory uploaded files are written to (created at startup)
    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Largest accepted upload body in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Enable debug logging (RUST_LOG still wins when set)
    #[arg(long)]
    pub debug: bool,
}

/// Resolved server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub public_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            public_dir: PathBuf::from("public"),
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl From<&ServerArgs> for ServerConfig {
    fn from(args: &ServerArgs) -> Self {
        Self {
            bind_addr: SocketAddr::new(args.bind, args.port),
            public_dir: args.public_dir.clone(),
            upload_dir: args.upload_dir.clone(),
            max_upload_bytes: args.max_upload_bytes,
            request_timeout: Duration::from_secs(args.timeout),
        }
    }
}
