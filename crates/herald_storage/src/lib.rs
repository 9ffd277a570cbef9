//! In-memory persistence for Herald.
//!
//! [`InMemoryStore`] implements every store trait over shared maps. It backs
//! the `preview` command and the pipeline tests; production deployments use
//! the PostgreSQL repository from `herald_database`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod memory;

pub use memory::InMemoryStore;
