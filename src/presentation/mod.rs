pub mod config;
pub mod errors;
pub mod handlers;
pub mod router;
pub mod state;

pub use config::{Environment, Settings};
pub use errors::{ApiError, ErrorResponse};
pub use router::create_router;
pub use state::AppState;
