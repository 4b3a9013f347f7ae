//! Vision model backends and prompts

pub mod backend;
pub mod openai;
pub mod prompts;
