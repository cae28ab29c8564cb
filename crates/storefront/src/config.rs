//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `JWT_SECRET` - Token signing secret (min 32 chars, high entropy)
//! - `ECPAY_RETURN_URL` - Public URL ECPay posts payment results to
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 8080)
//! - `CORS_ALLOWED_ORIGIN` - Front-end origin (default: `http://localhost:5173`)
//! - `TRUST_PROXY_HEADERS` - Key the login rate limit on `X-Forwarded-For`
//!   (default: false; only set behind a reverse proxy)
//! - `ECPAY_MERCHANT_ID` - Merchant ID (default: ECPay staging merchant)
//! - `ECPAY_HASH_KEY` / `ECPAY_HASH_IV` - `CheckMacValue` keys (default: staging keys)
//! - `ECPAY_GATEWAY_URL` - AIO checkout endpoint (default: staging)
//! - `ECPAY_CLIENT_BACK_URL` - Where the shopper lands after paying
//! - `ECPAY_TRADE_NO_PREFIX` - Merchant trade number prefix (default: EC)
//! - `ECPAY_REQUIRE_CHECK_MAC` - Reject unsigned payment callbacks (default:
//!   false against the staging gateway, true otherwise)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `LOG_FORMAT` - `json` for JSON log lines (read by the binary, not this struct)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const MAX_TRADE_NO_PREFIX_LENGTH: usize = 4;

// Public staging credentials published in ECPay's integration guide.
const ECPAY_STAGE_MERCHANT_ID: &str = "3002607";
const ECPAY_STAGE_HASH_KEY: &str = "pwFHCqoQZGmho4w6";
const ECPAY_STAGE_HASH_IV: &str = "EkRm7iFT261dpevs";
const ECPAY_STAGE_GATEWAY_URL: &str =
    "https://payment-stage.ecpay.com.tw/Cashier/AioCheckOut/V5";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// HS256 signing secret for login tokens
    pub jwt_secret: SecretString,
    /// Browser origin allowed to call the API
    pub cors_allowed_origin: String,
    /// Running behind a reverse proxy that sets `X-Forwarded-For`
    pub trust_proxy_headers: bool,
    /// ECPay payment gateway configuration
    pub ecpay: EcpayConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// ECPay AIO checkout configuration.
///
/// Implements `Debug` manually to redact the hash key and IV.
#[derive(Clone)]
pub struct EcpayConfig {
    pub merchant_id: String,
    pub hash_key: SecretString,
    pub hash_iv: SecretString,
    /// AIO checkout endpoint the generated form posts to
    pub gateway_url: String,
    /// Server-to-server result callback (`/pages/ecpay/return`)
    pub return_url: String,
    /// Browser redirect after payment
    pub client_back_url: Option<String>,
    /// Prefix for `MerchantTradeNo`
    pub trade_no_prefix: String,
    /// Ignore callbacks that carry no `CheckMacValue`
    pub require_check_mac: bool,
}

impl std::fmt::Debug for EcpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcpayConfig")
            .field("merchant_id", &self.merchant_id)
            .field("hash_key", &"[REDACTED]")
            .field("hash_iv", &"[REDACTED]")
            .field("gateway_url", &self.gateway_url)
            .field("return_url", &self.return_url)
            .field("client_back_url", &self.client_back_url)
            .field("trade_no_prefix", &self.trade_no_prefix)
            .field("require_check_mac", &self.require_check_mac)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOREFRONT_DATABASE_URL")?;
        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let jwt_secret = get_validated_secret("JWT_SECRET")?;
        let cors_allowed_origin =
            get_env_or_default("CORS_ALLOWED_ORIGIN", "http://localhost:5173");
        validate_origin(&cors_allowed_origin, "CORS_ALLOWED_ORIGIN")?;
        let trust_proxy_headers = get_bool_env("TRUST_PROXY_HEADERS", false)?;

        let ecpay = EcpayConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            cors_allowed_origin,
            trust_proxy_headers,
            ecpay,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
impl StorefrontConfig {
    /// Configuration pointing at the ECPay stage environment, for unit tests.
    pub(crate) fn for_tests() -> Self {
        Self {
            database_url: SecretString::from("postgres://localhost/ecshop_test"),
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8080,
            jwt_secret: SecretString::from("k7Qp2xVn9LmR4tYw8ZbC3dFh6JsG1aNe"),
            cors_allowed_origin: "http://localhost:5173".to_string(),
            trust_proxy_headers: false,
            ecpay: EcpayConfig {
                merchant_id: ECPAY_STAGE_MERCHANT_ID.to_string(),
                hash_key: SecretString::from(ECPAY_STAGE_HASH_KEY),
                hash_iv: SecretString::from(ECPAY_STAGE_HASH_IV),
                gateway_url: ECPAY_STAGE_GATEWAY_URL.to_string(),
                return_url: "https://shop.test/pages/ecpay/return".to_string(),
                client_back_url: None,
                trade_no_prefix: "EC".to_string(),
                require_check_mac: false,
            },
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl EcpayConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let gateway_url = get_env_or_default("ECPAY_GATEWAY_URL", ECPAY_STAGE_GATEWAY_URL);
        validate_url(&gateway_url, "ECPAY_GATEWAY_URL")?;
        let return_url = get_required_env("ECPAY_RETURN_URL")?;
        validate_url(&return_url, "ECPAY_RETURN_URL")?;
        let client_back_url = get_optional_env("ECPAY_CLIENT_BACK_URL");
        if let Some(url) = &client_back_url {
            validate_url(url, "ECPAY_CLIENT_BACK_URL")?;
        }
        let trade_no_prefix = get_env_or_default("ECPAY_TRADE_NO_PREFIX", "EC");
        validate_trade_no_prefix(&trade_no_prefix, "ECPAY_TRADE_NO_PREFIX")?;
        let require_check_mac = get_bool_env(
            "ECPAY_REQUIRE_CHECK_MAC",
            !is_stage_gateway(&gateway_url),
        )?;

        Ok(Self {
            merchant_id: get_env_or_default("ECPAY_MERCHANT_ID", ECPAY_STAGE_MERCHANT_ID),
            hash_key: SecretString::from(get_env_or_default(
                "ECPAY_HASH_KEY",
                ECPAY_STAGE_HASH_KEY,
            )),
            hash_iv: SecretString::from(get_env_or_default("ECPAY_HASH_IV", ECPAY_STAGE_HASH_IV)),
            gateway_url,
            return_url,
            client_back_url,
            trade_no_prefix,
            require_check_mac,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// ECPay's staging hosts are `*-stage.ecpay.com.tw`.
fn is_stage_gateway(gateway_url: &str) -> bool {
    url::Url::parse(gateway_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_ascii_lowercase))
        .is_some_and(|host| host.ends_with("-stage.ecpay.com.tw"))
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL` (shared with the CLI).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a boolean flag (`true`/`false`/`1`/`0`), falling back to `default` when unset.
fn get_bool_env(key: &str, default: bool) -> Result<bool, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |value| parse_bool(&value, key))
}

fn parse_bool(value: &str, var_name: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// Validate that a signing secret meets minimum length requirements.
fn validate_secret_length(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_JWT_SECRET_LENGTH,
                secret.len()
            ),
        ));
    }
    Ok(())
}

/// Validate that a value is an absolute http(s) URL.
fn validate_url(value: &str, var_name: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", parsed.scheme()),
        ));
    }
    Ok(())
}

/// Validate a CORS origin: scheme, host and optional port, nothing else.
fn validate_origin(value: &str, var_name: &str) -> Result<(), ConfigError> {
    validate_url(value, var_name)?;
    if value.trim_end_matches('/').matches('/').count() > 2 {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "origin must not contain a path".to_string(),
        ));
    }
    Ok(())
}

/// Trade numbers are limited to 20 alphanumeric characters by the gateway.
fn validate_trade_no_prefix(value: &str, var_name: &str) -> Result<(), ConfigError> {
    if value.len() > MAX_TRADE_NO_PREFIX_LENGTH || !value.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("must be at most {MAX_TRADE_NO_PREFIX_LENGTH} ASCII letters or digits"),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a signing secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_length(&value, key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_high() {
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-jwt-signing-key-goes-here", "JWT_SECRET");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("abababababababababababababababab", "JWT_SECRET");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "JWT_SECRET");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_secret_length() {
        assert!(validate_secret_length("short", "JWT_SECRET").is_err());
        assert!(validate_secret_length(&"a".repeat(32), "JWT_SECRET").is_ok());
    }

    #[test]
    fn test_validate_origin() {
        assert!(validate_origin("http://localhost:5173", "CORS_ALLOWED_ORIGIN").is_ok());
        assert!(validate_origin("https://shop.test/", "CORS_ALLOWED_ORIGIN").is_ok());
        assert!(validate_origin("https://shop.test/app", "CORS_ALLOWED_ORIGIN").is_err());
        assert!(validate_origin("localhost:5173", "CORS_ALLOWED_ORIGIN").is_err());
    }

    #[test]
    fn test_validate_trade_no_prefix() {
        assert!(validate_trade_no_prefix("EC", "P").is_ok());
        assert!(validate_trade_no_prefix("", "P").is_ok());
        assert!(validate_trade_no_prefix("SHOP1", "P").is_err());
        assert!(validate_trade_no_prefix("E-C", "P").is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TRUE", "F").unwrap());
        assert!(parse_bool(" 1 ", "F").unwrap());
        assert!(!parse_bool("no", "F").unwrap());
        assert!(parse_bool("maybe", "F").is_err());
    }

    #[test]
    fn test_stage_gateway_detection() {
        assert!(is_stage_gateway(ECPAY_STAGE_GATEWAY_URL));
        assert!(!is_stage_gateway(
            "https://payment.ecpay.com.tw/Cashier/AioCheckOut/V5"
        ));
        assert!(!is_stage_gateway("https://payment-stage.ecpay.com.tw.evil.test/"));
        assert!(!is_stage_gateway("not a url"));
    }

    #[test]
    fn test_socket_addr() {
        let mut config = StorefrontConfig::for_tests();
        config.port = 8080;

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_ecpay_config_debug_redacts_keys() {
        let debug_output = format!("{:?}", StorefrontConfig::for_tests().ecpay);

        assert!(debug_output.contains(ECPAY_STAGE_MERCHANT_ID));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains(ECPAY_STAGE_HASH_KEY));
        assert!(!debug_output.contains(ECPAY_STAGE_HASH_IV));
    }
}
