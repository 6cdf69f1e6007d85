//! CLI argument parsing using clap.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "spacestore")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "SPACESTORE_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// JSON file mapping API keys to tenant directories
    #[arg(long, env = "SPACESTORE_KEYS", default_value = "api_keys.json")]
    pub keys: PathBuf,

    /// Root directory for tenant uploads
    #[arg(long, env = "SPACESTORE_UPLOADS_DIR", default_value = "uploads")]
    pub uploads_dir: PathBuf,

    /// Maximum request body size (e.g. 512K, 10M, 1GiB)
    #[arg(
        long,
        env = "SPACESTORE_MAX_UPLOAD_SIZE",
        default_value = "10MiB",
        value_parser = parse_byte_size
    )]
    pub max_upload_size: usize,
}

/// Parses a byte count with an optional binary unit suffix.
///
/// `K`, `M` and `G` are powers of 1024 and may be followed by `iB` or `B`.
pub fn parse_byte_size(s: &str) -> Result<usize, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let unit = s
        .strip_suffix("iB")
        .or_else(|| s.strip_suffix('B'))
        .unwrap_or(s);

    let (num_str, multiplier) = if let Some(stripped) = unit.strip_suffix('G') {
        (stripped, 1024_u64.pow(3))
    } else if let Some(stripped) = unit.strip_suffix('M') {
        (stripped, 1024_u64.pow(2))
    } else if let Some(stripped) = unit.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (unit, 1)
    };

    num_str
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .and_then(|bytes| usize::try_from(bytes).ok())
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
}
