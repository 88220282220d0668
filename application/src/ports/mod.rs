//! Port definitions (interfaces for external systems)

pub mod conversation_logger;
pub mod model_invoker;
pub mod progress;
pub mod title_generator;
