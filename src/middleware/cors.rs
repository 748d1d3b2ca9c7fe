use crate::config::CorsConfig;
use http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

const METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

/// Build the CORS layer from configuration. Origins are comma-separated;
/// `*` enables wildcard mode and must never reach production.
pub fn create_cors_layer(config: &CorsConfig) -> CorsLayer {
    let raw: Vec<&str> = config
        .allowed_origin
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if raw.contains(&"*") {
        warn!("Wildcard CORS enabled - this should ONLY be used in development");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(METHODS)
            .allow_headers(Any)
            .max_age(std::time::Duration::from_secs(3600));
    }

    let mut origins: Vec<HeaderValue> = raw
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Skipping invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        warn!("No valid CORS origins configured, falling back to localhost:3000");
        origins.push(HeaderValue::from_static("http://localhost:3000"));
    }

    info!("CORS: allowing {} origin(s)", origins.len());

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(METHODS)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
