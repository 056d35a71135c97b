//! `SeaORM` Entity, @generated manually

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "crypto_prices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: u64,
    pub coin_id: String,
    pub date: Date,
    // Column name kept from the source schema; values are stored in
    // the configured reporting currency after conversion.
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub price_usd: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
