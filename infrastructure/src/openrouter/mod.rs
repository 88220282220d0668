//! OpenRouter adapter for the [`ModelInvoker`](council_application::ModelInvoker) port.

pub mod error;
pub mod invoker;
pub mod types;

pub use error::InvokerError;
pub use invoker::{
    DEFAULT_API_KEY_ENV, DEFAULT_API_URL, FreeModel, OpenRouterInvoker, classify_response,
};
