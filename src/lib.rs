// humanforge
// Text humanization engine: statistical text analytics, before/after
// comparison, a probabilistic rewrite pipeline with optional remote
// collaborators, and a concurrent batch orchestrator.

pub mod api;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

pub use api::Humanizer;
pub use error::{HumanizerError, RemoteError};
pub use models::Mode;
