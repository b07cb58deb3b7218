// src/poem/mod.rs
// Poem streaming: request handling, instruction building and orchestration

pub mod event;
pub mod orchestrator;
pub mod prompt;
pub mod request;

pub use event::{ChunkEvent, StreamStats};
pub use orchestrator::{OrchestratorSettings, PoemOrchestrator};
pub use prompt::build_instruction;
pub use request::{PoemRequest, VectorPolicy};
