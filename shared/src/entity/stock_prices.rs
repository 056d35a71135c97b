//! `SeaORM` Entity, @generated manually

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "stock_prices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: u64,
    pub ticker: String,
    pub date: Date,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub open: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub high: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub low: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub close: Decimal,
    pub volume: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
