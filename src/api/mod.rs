//! CryptoGuard API Module
//! REST API for address risk scoring and heuristic analysis

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod types;

pub use handlers::AppState;
pub use middleware::spawn_rate_limiter_cleanup;
pub use routes::create_router;
pub use types::*;
