//! SubPulse Server: HTTP API over the sentiment and topic pipeline.

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::build_router;
pub use state::AppState;
