//! Prompt construction for one-line commit messages.

pub mod file;
pub mod template;

pub use file::{PROMPT_FILE_PREFIX, PromptFile};
pub use template::FIXED_TEMPLATE;
