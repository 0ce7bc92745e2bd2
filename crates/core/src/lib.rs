//! Core business logic for Dropsplit.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations
//! live here.
//!
//! # Modules
//!
//! - `reconcile` - Balance reconciliation for drop finalization, reversal,
//!   and payment settlement
//! - `auth` - Password hashing

pub mod auth;
pub mod reconcile;
