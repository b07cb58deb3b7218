// src/lib.rs

pub mod api;
pub mod config;
pub mod emotion;
pub mod error;
pub mod llm;
pub mod poem;
pub mod state;

// Export commonly used items
pub use config::PoemConfig;
pub use error::{PoemError, PoemResult};
pub use state::AppState;
