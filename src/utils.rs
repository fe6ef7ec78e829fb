//! Utility functions and helpers.

pub mod prompt;

pub use prompt::{expand_tilde, prompt_for_directory};
