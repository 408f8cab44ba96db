#[cfg(unix)]
use std::path::PathBuf;
use std::{env, time::Duration};

#[derive(Debug, Clone)]
pub enum Endpoint {
    #[cfg(unix)]
    Unix(PathBuf),
    #[cfg(windows)]
    Pipe(String),
    Tcp(String), // host:port (dev fallback)
}

#[derive(Debug, Clone)]
pub struct IpcConfig {
    pub endpoint: Option<String>, // raw string like "unix:///...", "pipe://...", "tcp://host:port"
    pub token: Option<String>,
    pub connect_timeout: Duration,
    pub handshake_timeout: Duration,
    pub call_timeout: Duration,
    /// Player builds regularly take many minutes; separate budget from the
    /// short settings calls.
    pub build_timeout: Duration,
}

impl Default for IpcConfig {
    fn default() -> Self {
        Self {
            endpoint: env::var("UNITY_BRIDGE_ENDPOINT").ok(),
            token: env::var("UNITY_BRIDGE_TOKEN").ok(),
            connect_timeout: duration_ms("UNITY_BRIDGE_CONNECT_TIMEOUT_MS", 2000),
            handshake_timeout: duration_ms("UNITY_BRIDGE_HANDSHAKE_TIMEOUT_MS", 3000),
            call_timeout: duration_ms("UNITY_BRIDGE_CALL_TIMEOUT_MS", 30_000),
            build_timeout: duration_ms("UNITY_BRIDGE_BUILD_TIMEOUT_MS", 1_800_000),
        }
    }
}

fn duration_ms(key: &str, default: u64) -> Duration {
    Duration::from_millis(
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default),
    )
}

pub fn default_endpoint() -> Endpoint {
    if let Ok(raw) = env::var("UNITY_BRIDGE_ENDPOINT") {
        return parse_endpoint(&raw);
    }
    // TCP on all platforms to match the editor-side bridge default.
    Endpoint::Tcp("127.0.0.1:7777".to_string())
}

pub fn parse_endpoint(s: &str) -> Endpoint {
    #[cfg(unix)]
    {
        if let Some(rest) = s.strip_prefix("unix://") {
            return Endpoint::Unix(PathBuf::from(rest));
        }
    }
    #[cfg(windows)]
    {
        if let Some(rest) = s.strip_prefix("pipe://") {
            return Endpoint::Pipe(rest.to_string());
        }
    }
    if let Some(rest) = s.strip_prefix("tcp://") {
        return Endpoint::Tcp(rest.to_string());
    }
    // Fallback: bare strings are treated as TCP host:port
    Endpoint::Tcp(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_endpoint_handles_schemes_and_bare_addresses() {
        let tcp = parse_endpoint("tcp://127.0.0.1:8080");
        assert!(matches!(tcp, Endpoint::Tcp(addr) if addr == "127.0.0.1:8080"));

        let bare = parse_endpoint("localhost:3000");
        assert!(matches!(bare, Endpoint::Tcp(addr) if addr == "localhost:3000"));

        #[cfg(unix)]
        {
            let unix = parse_endpoint("unix:///tmp/test.sock");
            assert!(matches!(unix, Endpoint::Unix(path) if path == PathBuf::from("/tmp/test.sock")));
        }
    }

    #[test]
    fn default_timeouts_are_sane() {
        let config = IpcConfig::default();
        assert!(config.connect_timeout < config.build_timeout);
        assert!(config.call_timeout < config.build_timeout);
    }
}
