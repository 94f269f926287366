//! # Musicbox Common Library
//!
//! Shared code for the Musicbox catalog service including:
//! - Catalog records (users, artists, albums, subscriptions, audio assets)
//! - Database initialization and schema
//! - Configuration loading and root folder resolution
//! - Error types
//! - Time and identifier utilities

pub mod config;
pub mod db;
pub mod error;
pub mod time;
pub mod uuid_utils;

pub use error::{Error, Result};
