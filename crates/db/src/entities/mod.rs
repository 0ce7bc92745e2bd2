//! `SeaORM` entity definitions.

pub mod businesses;
pub mod drops;
pub mod members;
pub mod owners;
pub mod paid_drops;
pub mod paid_notices;
pub mod services;
