//! Foundry Journal - causal record of every accepted universe mutation.
//!
//! The session records one [`UniverseChange`](journal::UniverseChange) per
//! accepted intent, so debugging tools can answer "who changed this
//! universe, why, and at which epoch" without diffing stored documents.
//!
//! # Modules
//!
//! - [`journal`]: Mutation journal with causality metadata (universe,
//!   old/new symbols, issuing view, causal reason, intent index, epoch).

#![deny(unsafe_code)]

pub mod journal;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::journal::{ChangeKind, MutationJournal, UniverseChange};
}
