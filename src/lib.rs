//! # Websum
//!
//! A terminal front end for a website and text summarisation service.
//!
//! ## Features
//!
//! - **Summary Form**: a URL or a block of text, a length tier and a style, posted as one request
//! - **Safe Rendering**: markdown summaries are converted to HTML and sanitized before display
//! - **TUI and CLI**: interactive ratatui screen, or one-shot output as text or an HTML page

pub mod client;
pub mod config;
pub mod display;
pub mod form;
pub mod logging;
pub mod markdown;
pub mod shell;
pub mod summary;
pub mod ui;

pub use client::{ClientError, SummaryClient};
pub use config::Config;
pub use display::SummaryDisplay;
pub use form::{FormError, SummaryForm};
pub use shell::PageShell;
pub use summary::{SummaryLength, SummaryRequest, SummaryStyle};
