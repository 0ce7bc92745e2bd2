//! `SeaORM` Entity for the services table.
//!
//! Line items logged against a drop, split by payment method.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub drop_id: i32,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub cash: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub credit: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub deposit: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub gift_cert_amount: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::drops::Entity",
        from = "Column::DropId",
        to = "super::drops::Column::Id"
    )]
    Drops,
}

impl Related<super::drops::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Drops.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
