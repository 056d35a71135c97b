pub use sea_orm_migration::prelude::*;

mod m20250801_000001_create_cryptocurrencies;
mod m20250801_000002_create_price_tables;
mod m20250815_000001_add_price_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000001_create_cryptocurrencies::Migration),
            Box::new(m20250801_000002_create_price_tables::Migration),
            Box::new(m20250815_000001_add_price_indexes::Migration),
        ]
    }
}
