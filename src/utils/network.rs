use anyhow::{Context, Result};
use std::net::{SocketAddr, TcpListener};
use tracing::warn;

/// Ports tried, in order, when the configured one is taken.
const FALLBACK_PORTS: std::ops::RangeInclusive<u16> = 8000..=8999;

pub fn is_port_available(port: u16) -> bool {
    TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], port))).is_ok()
}

/// The preferred port if free, else the first free fallback port.
///
/// Falls back to `preferred` when nothing is free so the bind error surfaces
/// at server start.
pub fn resolve_port(preferred: u16) -> u16 {
    if is_port_available(preferred) {
        return preferred;
    }

    warn!("Port {} is not available, searching for alternative...", preferred);
    match FALLBACK_PORTS.clone().find(|&port| is_port_available(port)) {
        Some(port) => {
            warn!("Using alternative port: {}", port);
            port
        }
        None => {
            warn!("No available ports found, returning preferred port {}", preferred);
            preferred
        }
    }
}

/// Resolve a bind host, which may be an IP address or a name such as
/// `localhost`.
pub async fn resolve_bind_addr(host: &str, port: u16) -> Result<SocketAddr> {
    let mut addrs = tokio::net::lookup_host((host, port))
        .await
        .with_context(|| format!("Failed to resolve host '{}'", host))?;
    addrs
        .next()
        .with_context(|| format!("Host '{}' did not resolve to any address", host))
}

/// Address other devices on the LAN can reach the web interface at.
pub fn local_url(port: u16) -> String {
    let ip = local_ip_address::local_ip()
        .map(|ip| ip.to_string())
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("http://{}:{}", ip, port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_port_is_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        assert!(!is_port_available(port));
    }

    #[test]
    fn test_resolve_port_skips_busy_port() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let busy = listener.local_addr().unwrap().port();

        let port = resolve_port(busy);
        assert_ne!(port, busy);
        assert!(FALLBACK_PORTS.contains(&port));
    }

    #[tokio::test]
    async fn test_resolve_bind_addr_accepts_ip() {
        let addr = resolve_bind_addr("0.0.0.0", 8080).await.unwrap();
        assert_eq!(addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
    }

    #[tokio::test]
    async fn test_resolve_bind_addr_accepts_localhost() {
        let addr = resolve_bind_addr("localhost", 9090).await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 9090);
    }

    #[tokio::test]
    async fn test_resolve_bind_addr_rejects_garbage() {
        let err = resolve_bind_addr("not a host", 8080).await.unwrap_err();
        assert!(err.to_string().contains("not a host"));
    }

    #[test]
    fn test_local_url_format() {
        let url = local_url(9090);
        assert!(url.starts_with("http://"));
        assert!(url.ends_with(":9090"));
    }
}
