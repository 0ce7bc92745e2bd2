//! `SeaORM` Entity for the members table.
//!
//! Carries the running balances the reconciler maintains: take-home
//! total, amount owed to the business, amount owed by the business.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub member_name: String,
    /// Nullable: a member may be unaffiliated until they join a business.
    pub business_id: Option<i32>,
    /// Owner's default cut in percent, 0-100.
    pub percentage: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub take_home_total: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_owe: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_owed: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::businesses::Entity",
        from = "Column::BusinessId",
        to = "super::businesses::Column::Id"
    )]
    Businesses,
    #[sea_orm(has_many = "super::drops::Entity")]
    Drops,
}

impl Related<super::businesses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Businesses.def()
    }
}

impl Related<super::drops::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Drops.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
