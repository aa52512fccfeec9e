//! # Prompt Template Modules
//!
//! This module organizes the prompt templates used by the `docforge` pipeline.
//! `tasks` holds the fixed instruction blocks, `core` the builders that embed
//! request data into them.

pub mod core;
pub mod tasks;

pub use self::core::{build_analyze_prompt, build_generate_prompt, join_documents};
