//! Login rate limiting using governor and `tower_governor`.
//!
//! Keyed by client IP, taken from the socket peer address. That requires
//! serving with `into_make_service_with_connect_info`. Proxy headers are
//! only consulted when `TRUST_PROXY_HEADERS` is set, and then only the hop
//! the proxy itself appended.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Key extractor for the client IP.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClientIpKeyExtractor {
    /// The server sits behind a reverse proxy that sets `X-Forwarded-For`.
    pub trust_proxy_headers: bool,
}

impl ClientIpKeyExtractor {
    fn from_proxy_headers<T>(req: &Request<T>) -> Option<IpAddr> {
        let headers = req.headers();

        // The proxy appends the address it saw; anything left of it is
        // client-supplied.
        headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.rsplit(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
            .or_else(|| {
                headers
                    .get("x-real-ip")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.trim().parse::<IpAddr>().ok())
            })
    }
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if let Some(ip) = self
            .trust_proxy_headers
            .then(|| Self::from_proxy_headers(req))
            .flatten()
        {
            return Ok(ip);
        }

        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Rate limiter for `POST /api/auth/login`: ~10 requests per minute per IP.
///
/// One token every 6 seconds, burst of 5.
///
/// # Panics
///
/// Does not panic: `per_second(6)` and `burst_size(5)` are valid positive
/// values for `GovernorConfigBuilder`.
#[must_use]
pub fn login_rate_limiter(trust_proxy_headers: bool) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor {
            trust_proxy_headers,
        })
        .per_second(6)
        .burst_size(5)
        .finish()
        .expect("rate limiter config with per_second(6) and burst_size(5) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, body::Body, http::StatusCode, routing::post};
    use tower::ServiceExt;
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    const PEER: &str = "192.0.2.10:52100";

    fn request() -> axum::http::request::Builder {
        Request::builder().uri("/api/auth/login")
    }

    fn from_peer<T>(mut req: Request<T>) -> Request<T> {
        req.extensions_mut()
            .insert(ConnectInfo(PEER.parse::<SocketAddr>().unwrap()));
        req
    }

    fn direct() -> ClientIpKeyExtractor {
        ClientIpKeyExtractor::default()
    }

    fn proxied() -> ClientIpKeyExtractor {
        ClientIpKeyExtractor {
            trust_proxy_headers: true,
        }
    }

    #[test]
    fn test_direct_ignores_forwarded_headers() {
        let req = from_peer(
            request()
                .header("x-forwarded-for", "203.0.113.7")
                .header("x-real-ip", "198.51.100.2")
                .body(())
                .unwrap(),
        );

        let ip = direct().extract(&req).unwrap();
        assert_eq!(ip, "192.0.2.10".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_proxied_uses_last_forwarded_hop() {
        let req = from_peer(
            request()
                .header("x-forwarded-for", "10.9.9.9, 203.0.113.7")
                .body(())
                .unwrap(),
        );

        let ip = proxied().extract(&req).unwrap();
        assert_eq!(ip, "203.0.113.7".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_proxied_real_ip_header() {
        let req = request().header("x-real-ip", "198.51.100.2").body(()).unwrap();

        let ip = proxied().extract(&req).unwrap();
        assert_eq!(ip, "198.51.100.2".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_proxied_falls_back_to_peer_address() {
        let req = from_peer(
            request()
                .header("x-forwarded-for", "not-an-ip")
                .body(())
                .unwrap(),
        );

        let ip = proxied().extract(&req).unwrap();
        assert_eq!(ip, "192.0.2.10".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_no_source_is_an_error() {
        let req = request().body(()).unwrap();
        assert!(direct().extract(&req).is_err());
    }

    #[tokio::test]
    async fn test_rotating_forwarded_for_does_not_reset_limit() {
        let app = Router::new()
            .route("/login", post(|| async { "ok" }))
            .route_layer(login_rate_limiter(false));

        let mut statuses = Vec::new();
        for i in 0..8 {
            let req = from_peer(
                Request::builder()
                    .method("POST")
                    .uri("/login")
                    .header("x-forwarded-for", format!("203.0.113.{i}"))
                    .body(Body::empty())
                    .unwrap(),
            );
            statuses.push(app.clone().oneshot(req).await.unwrap().status());
        }

        assert!(statuses.iter().take(5).all(|s| *s == StatusCode::OK));
        assert!(
            statuses
                .iter()
                .skip(5)
                .all(|s| *s == StatusCode::TOO_MANY_REQUESTS)
        );
    }
}
