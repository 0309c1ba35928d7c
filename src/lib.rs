//! Lyttekort - Podcasts to Flashcards
//!
//! A CLI pipeline that turns podcast episodes you have finished listening to
//! into Anki flashcards.
//!
//! The name "Lyttekort" comes from the Norwegian words for "listening cards."
//!
//! # Overview
//!
//! Lyttekort runs in three sequential stages:
//! - `sync` - fetch finished episodes from a gpodder server and download audio
//! - `transcribe` - transcribe downloaded audio with a local whisper.cpp engine
//! - `cards` - summarize transcripts into key points and export an Anki CSV
//!
//! Each stage reads the files the previous stage wrote; there is no shared
//! runtime between invocations.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `gpodder` - gpodder episode-action API client
//! - `feed` - Podcast feed metadata lookup
//! - `catalog` - Local episode catalog and sync timestamp
//! - `audio` - Episode audio download
//! - `transcription` - Speech-to-text transcription
//! - `cards` - LLM summarization and CSV export
//!
//! # Example
//!
//! ```rust,no_run
//! use lyttekort::catalog::Catalog;
//! use lyttekort::config::Settings;
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let catalog = Catalog::load(&settings.episodes_json_path())?;
//!     println!("{} episodes in catalog", catalog.episodes().len());
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod cards;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod feed;
pub mod gpodder;
pub mod openai;
pub mod transcription;

pub use error::{LyttekortError, Result};
