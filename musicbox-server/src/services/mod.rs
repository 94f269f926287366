//! Core services
//!
//! - [`EntitlementManager`]: subscriptions and premium status
//! - [`ContentStore`]: audio upload, metadata and byte retrieval
//! - [`ExpirySweeper`]: periodic premium-flag reconciliation

pub mod content_store;
pub mod entitlements;
pub mod expiry_sweeper;

pub use content_store::{AudioUpload, ContentStore};
pub use entitlements::EntitlementManager;
pub use expiry_sweeper::ExpirySweeper;
