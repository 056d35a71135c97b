//! `SeaORM` Entity, @generated manually

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "cryptocurrencies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: u64,
    #[sea_orm(unique)]
    pub coin_id: String,
    pub name: String,
    pub symbol: String,
    pub market_cap_rank: Option<i32>,
    #[sea_orm(column_type = "Decimal(Some((30, 8)))")]
    pub current_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((30, 2)))")]
    pub market_cap: Decimal,
    #[sea_orm(column_type = "Decimal(Some((30, 2)))")]
    pub total_volume: Decimal,
    #[sea_orm(column_type = "Decimal(Some((30, 8)))", nullable)]
    pub circulating_supply: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((30, 8)))", nullable)]
    pub total_supply: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((30, 8)))")]
    pub ath: Decimal,
    pub last_updated: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
