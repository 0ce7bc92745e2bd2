//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the earnings-split store
//! - Repository abstractions for data access, including the drop
//!   lifecycle manager (`DropRepository`)
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{BusinessRepository, DropRepository, MemberRepository, OwnerRepository};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
