//! Balance reconciliation for drops.
//!
//! This module implements the accounting policy that governs how a drop's
//! financial figures mutate the running balances held on member and owner
//! accounts:
//! - applying a finalized drop (cut accumulation + owe/owed mutual
//!   cancellation)
//! - reversing a deleted drop (floored decrements, no re-cancellation)
//! - settling balances when an owner pays out a batch of drops
//!
//! Everything here is pure; persistence and transaction handling live in
//! the db crate.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::ReconcileError;
pub use service::Reconciler;
pub use types::{DropFigures, MemberBalances, ReconciledBalances};
