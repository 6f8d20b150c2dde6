//! Sketch Tokens
//!
//! Extracts uploaded Sketch archives and mines their `document.json` for
//! color and typography design tokens, then keeps a token store in sync.
//!
//! The pipeline runs in two phases:
//! 1. [`services::UploadService`] stages `.sketch` files and extracts them
//!    ([`archive`]), writing a completion marker per archive.
//! 2. [`services::ScanService`] mines every completed extraction ([`mining`])
//!    and hands the candidates to the [`sync::TokenSynchronizer`].

pub mod archive;
pub mod cli;
pub mod config;
pub mod constants;
pub mod mining;
pub mod models;
pub mod services;
pub mod store;
pub mod sync;
