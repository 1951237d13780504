//! CLI arguments and server configuration defaults.

use clap::Parser;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_PREFIX: &str = "/data";
pub const DEFAULT_PORT: u16 = 5173;

/// CLI arguments and environment configuration for the server.
#[derive(Parser, Debug)]
#[command(
    name = "muso-serve",
    version,
    about = "Development media server for the Muso web player"
)]
pub struct Args {
    #[arg(
        short = 'd',
        long,
        env = "MUSO_DATA_DIR",
        default_value = DEFAULT_DATA_DIR,
        help = "Directory of local media served under the media prefix"
    )]
    pub data_dir: String,
    #[arg(
        short = 'b',
        long,
        env = "MUSO_BIND",
        default_value = "127.0.0.1",
        help = "Bind address"
    )]
    pub host: String,
    #[arg(
        short = 'p',
        long,
        env = "MUSO_PORT",
        default_value_t = DEFAULT_PORT,
        help = "HTTP port"
    )]
    pub port: u16,
    #[arg(
        long,
        env = "MUSO_PREFIX",
        default_value = DEFAULT_PREFIX,
        help = "URL prefix the media routes are mounted under"
    )]
    pub prefix: String,
    #[arg(long, env = "MUSO_CORS_ORIGINS", help = "Comma separated CORS origins")]
    pub cors_origins: Option<String>,
    #[arg(
        long,
        env = "MUSO_READ_ONLY",
        default_value_t = false,
        help = "Disable the PUT upload route"
    )]
    pub read_only: bool,
}

/// Per-request serving options handed to the media handler.
#[derive(Clone, Copy, Debug, Default)]
pub struct ServeOptions {
    pub read_only: bool,
}
