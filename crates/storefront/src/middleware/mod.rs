//! HTTP middleware for the storefront API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. Request ID (add unique ID to each request)
//! 3. `TraceLayer` (request tracing)
//! 4. CORS (single configured front-end origin)
//! 5. Login rate limiting (governor), on `POST /api/auth/login` only
//!
//! Authentication is not a layer: handlers take [`RequireAuth`] or
//! [`RequireAdmin`] as extractors.

pub mod auth;
pub mod rate_limit;
pub mod request_id;

pub use auth::{RequireAdmin, RequireAuth};
pub use rate_limit::login_rate_limiter;
pub use request_id::request_id_middleware;
