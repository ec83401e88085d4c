//! Server configuration.
//!
//! Command-line flags with environment fallbacks, converted into the
//! [`ServerConfig`] the router is built from.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use arnote_core::CanvasSize;
use clap::{Parser, ValueEnum};

/// Default port for the Arnote server.
pub const DEFAULT_PORT: u16 = 9474;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Command-line arguments for the `arnote` binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "arnote")]
#[command(about = "Avatar and QR styling service for AR reminders")]
#[command(version)]
pub struct ServerArgs {
    /// Address to bind
    #[arg(long, env = "ARNOTE_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "ARNOTE_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Origin encoded into QR payload URLs (e.g. <https://reminders.example>)
    #[arg(long, env = "ARNOTE_PUBLIC_ORIGIN")]
    pub public_origin: Option<String>,

    /// Directory for JSON record persistence; in-memory only when unset
    #[arg(long, env = "ARNOTE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Export canvas width in pixels
    #[arg(long, default_value = "600")]
    pub canvas_width: u32,

    /// Export canvas height in pixels
    #[arg(long, default_value = "400")]
    pub canvas_height: u32,

    /// Log output format
    #[arg(long, env = "RUST_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub addr: SocketAddr,
    /// Origin used in QR payloads, without a trailing slash.
    pub public_origin: String,
    /// Persistence directory.
    pub data_dir: Option<PathBuf>,
    /// Export canvas size.
    pub canvas: CanvasSize,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT);
        Self {
            addr,
            public_origin: format!("http://{addr}"),
            data_dir: None,
            canvas: CanvasSize::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl From<ServerArgs> for ServerConfig {
    fn from(args: ServerArgs) -> Self {
        let addr = SocketAddr::new(args.host, args.port);
        let public_origin = args
            .public_origin
            .map(|o| o.trim_end_matches('/').to_string())
            .filter(|o| !o.is_empty())
            .unwrap_or_else(|| format!("http://{addr}"));
        Self {
            addr,
            public_origin,
            data_dir: args.data_dir,
            canvas: CanvasSize::new(args.canvas_width.max(1), args.canvas_height.max(1)),
            log_format: args.log_format,
        }
    }
}
