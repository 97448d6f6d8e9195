//! Prometheus counters for the Auth RPCs
//!
//! Counters live in the default registry and are served by the HTTP side
//! server at `/metrics`.
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, TextEncoder};

/// Force registration so every counter shows up before its first increment
pub fn initialize_auth_metrics() {
    let _ = &*REGISTER_REQUESTS_TOTAL;
    let _ = &*LOGIN_REQUESTS_TOTAL;
    let _ = &*LOGIN_FAILURES_TOTAL;
    let _ = &*TOKEN_CHECKS_TOTAL;
    let _ = &*TOKEN_ROTATIONS_TOTAL;
    let _ = &*TOKEN_DENIALS_TOTAL;
}

fn register_counter(name: &str, help: &str) -> IntCounter {
    IntCounter::new(name, help)
        .and_then(|c| {
            prometheus::default_registry().register(Box::new(c.clone()))?;
            Ok(c)
        })
        .unwrap_or_else(|e| {
            tracing::error!(metric = name, "failed to register counter: {}", e);
            IntCounter::new("sso_unregistered_counter", "unregistered fallback")
                .expect("fallback counter")
        })
}

static REGISTER_REQUESTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_counter(
        "sso_register_requests_total",
        "Total number of Register RPC requests",
    )
});

static LOGIN_REQUESTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_counter(
        "sso_login_requests_total",
        "Total number of Login RPC requests",
    )
});

/// Failed logins of any kind (bad credentials, unknown app, internal)
static LOGIN_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_counter(
        "sso_login_failures_total",
        "Total number of failed Login RPC requests",
    )
});

static TOKEN_CHECKS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_counter(
        "sso_token_checks_total",
        "Total number of CheckAndRefreshTokens RPC requests",
    )
});

static TOKEN_ROTATIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_counter(
        "sso_token_rotations_total",
        "Total number of token pairs rotated",
    )
});

static TOKEN_DENIALS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_counter(
        "sso_token_denials_total",
        "Total number of token pairs denied",
    )
});

pub fn inc_register_request() {
    REGISTER_REQUESTS_TOTAL.inc();
}

pub fn inc_login_request() {
    LOGIN_REQUESTS_TOTAL.inc();
}

pub fn inc_login_failure() {
    LOGIN_FAILURES_TOTAL.inc();
}

pub fn inc_token_check() {
    TOKEN_CHECKS_TOTAL.inc();
}

pub fn inc_token_rotation() {
    TOKEN_ROTATIONS_TOTAL.inc();
}

pub fn inc_token_denial() {
    TOKEN_DENIALS_TOTAL.inc();
}

/// Serialise the default registry in the Prometheus text format
pub fn render() -> Result<(String, Vec<u8>), prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok((encoder.format_type().to_string(), buffer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_exported() {
        initialize_auth_metrics();
        inc_login_request();

        let (content_type, body) = render().unwrap();
        let text = String::from_utf8(body).unwrap();

        assert!(content_type.starts_with("text/plain"));
        assert!(text.contains("sso_login_requests_total"));
        assert!(text.contains("sso_token_denials_total"));
    }
}
