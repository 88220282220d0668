//! Prompt construction for every council stage.

pub mod template;

pub use template::{Prompt, PromptTemplate};
