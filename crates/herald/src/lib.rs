//! Herald: newsletter issues to X threads.
//!
//! Herald turns a newsletter content record into a sequence of posts that
//! each fit the platform limit, stores them as a thread draft, and publishes
//! the draft as a reply chain. Publication is resumable: every post id is
//! recorded as soon as the platform returns it, so a failed run picks up at
//! the first unposted unit.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use herald::{DraftManager, HeraldConfig, InMemoryStore, PublishOrchestrator, XClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = HeraldConfig::load()?;
//!     config.validate(true)?;
//!
//!     let store = Arc::new(InMemoryStore::new());
//!     let drafts = DraftManager::new(store.clone(), &config);
//!     let summary = drafts.create_or_refresh_draft("issue_1", None, None).await?;
//!
//!     let client = Arc::new(XClient::from_config(&config.x)?);
//!     let orchestrator = PublishOrchestrator::new(store, client, &config.publish);
//!     let outcome = orchestrator.publish(&summary.draft_id, false, None).await?;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `database` - PostgreSQL persistence (default)
//!
//! # Architecture
//!
//! - `herald_error` - Error types
//! - `herald_core` - Records, drafts, units and configuration
//! - `herald_interface` - Store and posting client traits
//! - `herald_rate_limit` - Rate-limit classification and backoff
//! - `herald_storage` - In-memory stores
//! - `herald_database` - PostgreSQL repository
//! - `herald_social` - Segmentation, drafts, publishing and the X client
//!
//! This crate (`herald`) re-exports everything for convenience.

pub use herald_core::*;
pub use herald_error::*;
pub use herald_interface::*;
pub use herald_rate_limit::*;
pub use herald_social::*;
pub use herald_storage::*;

#[cfg(feature = "database")]
pub use herald_database::{PostgresThreadRepository, establish_connection};

pub mod telemetry;
