//! Memo domain model.
//!
//! # Responsibility
//! - Define the canonical memo record and its read projections.
//!
//! # Invariants
//! - Every persisted memo is identified by a storage-assigned `MemoId`.
//! - Deletion is a hard delete; ids are never reused afterwards.

pub mod memo;
