//! Core library for relnotes.
//!
//! Turns a hand-written release notes changelog into the `<releases>` block
//! of an AppStream metainfo (appdata) file.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading and management
//! - [`convert`] - Read-everything-then-render entry point
//! - [`error`] - Error types and result aliases
//! - [`parser`] - Line classification and release accumulation
//! - [`release`] - The parsed release record
//! - [`render`] - XML output
//!
//! # Quick Start
//!
//! ```
//! use relnotes_core::{RenderOptions, parser, render};
//!
//! let releases = parser::parse_str("1.0.0 - January 5th, 2021\n* Initial release\n");
//! let xml = render::render_to_string(&releases, &RenderOptions::default()).unwrap();
//!
//! assert!(xml.starts_with("<releases>\n  <release version=\"1.0.0\" date=\"2021-01-05\">"));
//! ```
#![deny(unsafe_code)]

pub mod config;

pub mod convert;

pub mod error;

pub mod parser;

pub mod release;

pub mod render;

pub use config::{Config, ConfigLoader, LogLevel};

pub use error::{ConfigError, ConfigResult, ConvertError, ConvertResult, RenderError};

pub use release::Release;

pub use render::{InvalidDatePolicy, RenderOptions};
