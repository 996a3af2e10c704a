//! Library crate for user-console.
//!
//! This crate exposes the building blocks of the TUI:
//! - Record types and the role/status/position encodings (`model`)
//! - REST client for the users API (`api`)
//! - Form validation (`validate`)
//! - Search and paging helpers (`search`) and the cached collection (`store`)
//! - Settings, CLI and logging setup (`config`)
//! - Application state, background tasks and update loop (`app`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `user-console` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod model;
pub mod search;
pub mod store;
pub mod ui;
pub mod validate;

/// Convenient error and result types shared across the crate.
pub use error::{ApiError, Result};
