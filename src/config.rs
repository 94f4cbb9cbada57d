use std::{env, net::SocketAddr, path::PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/state.json";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub data_path: PathBuf,
}

impl Config {
    /// Reads `PORT` and `APP_DATA_PATH`. An unparsable port falls back to the
    /// default with a warning.
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .map(|value| parse_port(&value))
            .unwrap_or(DEFAULT_PORT);
        let data_path = env::var("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH));

        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], port)),
            data_path,
        }
    }
}

/// Filter built from `RUST_LOG` when it is set and valid, `info` otherwise.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

fn parse_port(value: &str) -> u16 {
    match value.trim().parse::<u16>() {
        Ok(port) => port,
        Err(err) => {
            warn!("ignoring PORT={value:?} ({err}), using {DEFAULT_PORT}");
            DEFAULT_PORT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_parses_or_falls_back() {
        assert_eq!(parse_port("3000"), 3000);
        assert_eq!(parse_port(" 3001 "), 3001);
        assert_eq!(parse_port("eighty"), DEFAULT_PORT);
        assert_eq!(parse_port("70000"), DEFAULT_PORT);
    }

    #[test]
    fn rust_log_can_lower_the_level() {
        assert_eq!(log_filter(Some("warn")).to_string(), "warn");
        assert_eq!(log_filter(None).to_string(), "info");
        assert_eq!(log_filter(Some("  ")).to_string(), "info");
    }
}
