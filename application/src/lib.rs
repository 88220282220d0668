//! Application layer for llm-council
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::CouncilPolicy;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    model_invoker::{ModelInvoker, invoke_with_deadline},
    progress::{EmitError, ProgressEmitter, ProgressStream, progress_channel},
    title_generator::{DEFAULT_TITLE, TitleGenerator},
};
pub use use_cases::generate_title::{ModelTitleGenerator, clean_title};
pub use use_cases::run_council::{
    ActiveRuns, CouncilReport, RunCouncilError, RunCouncilInput, RunCouncilUseCase, RunHandle,
};
