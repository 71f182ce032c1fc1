//! # kotrans - Korean to English desktop translator
//!
//! `kotrans` opens a window with a Korean input pane and an English output
//! pane. Translation runs locally on an NLLB-200 model exported to ONNX,
//! fetched from the Hugging Face hub on first run.
//!
//! ## Features
//!
//! - **Local inference**: ONNX Runtime, CUDA when available, CPU otherwise
//! - **Beam search**: width 4 with early stopping, target language forced
//! - **Responsive UI**: translations run on a worker, results come back
//!   through a queue the UI drains each frame
//! - **Live token count**: the counter turns red past the 250-token limit
//!
//! ## Configuration
//!
//! Built-in defaults can be overridden in `~/.config/kotrans/config.toml`:
//!
//! ```toml
//! [translator]
//! model_id = "Xenova/nllb-200-distilled-600M"
//! source_lang = "kor_Hang"
//! target_lang = "eng_Latn"
//! max_length = 250
//! num_beams = 4
//! ```

/// Command-line interface definitions.
pub mod cli;

/// Configuration defaults and config file management.
pub mod config;

/// Structured logging setup.
pub mod logging;

/// XDG-style path utilities for configuration.
pub mod paths;

/// Desktop window, display state and translation dispatch.
pub mod shell;

/// Local translation model: tokenizer, ONNX sessions, beam search.
pub mod translation;

/// Console banner and spinner shown during startup.
pub mod ui;
