//! Configuration module for lyttekort.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{CardPrompts, Prompts};
pub use settings::{
    CardSettings, GeneralSettings, GpodderSettings, PromptSettings, Settings,
    TranscriptionSettings, WhisperModel,
};
