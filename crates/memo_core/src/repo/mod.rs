//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the memo data access contract.
//! - Isolate SQLite statement execution from service orchestration.
//!
//! # Invariants
//! - Write paths validate memo text before SQL mutations.
//! - Lookup misses are `Ok(None)`; update/delete misses are `Ok(0)`.

pub mod memo_repo;
