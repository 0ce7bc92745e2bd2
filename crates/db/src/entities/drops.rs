//! `SeaORM` Entity for the drops table.
//!
//! A drop is created zeroed and unpaid, later finalized with its
//! financial figures, and eventually linked to a paid-drop or
//! paid-notice receipt.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "drops")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub member_id: i32,
    /// Null until the drop is finalized.
    pub date: Option<Date>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub member_cut: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub business_cut: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub member_owes: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub business_owes: Decimal,
    pub paid: bool,
    pub paid_drop_id: Option<i32>,
    pub paid_notice_id: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::members::Entity",
        from = "Column::MemberId",
        to = "super::members::Column::Id"
    )]
    Members,
    #[sea_orm(
        belongs_to = "super::paid_drops::Entity",
        from = "Column::PaidDropId",
        to = "super::paid_drops::Column::Id"
    )]
    PaidDrops,
    #[sea_orm(
        belongs_to = "super::paid_notices::Entity",
        from = "Column::PaidNoticeId",
        to = "super::paid_notices::Column::Id"
    )]
    PaidNotices,
    #[sea_orm(has_many = "super::services::Entity")]
    Services,
}

impl Related<super::members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl Related<super::paid_drops::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaidDrops.def()
    }
}

impl Related<super::paid_notices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaidNotices.def()
    }
}

impl Related<super::services::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Services.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
