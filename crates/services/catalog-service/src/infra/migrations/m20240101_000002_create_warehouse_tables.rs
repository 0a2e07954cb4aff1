//! Migration: Create warehouses and inventories tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Warehouses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Warehouses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Warehouses::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Warehouses::Address).string_len(500).not_null())
                    .col(
                        ColumnDef::new(Warehouses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Warehouses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Inventories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Inventories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Inventories::ProductId).big_integer().not_null())
                    .col(ColumnDef::new(Inventories::WarehouseId).big_integer().null())
                    .col(
                        ColumnDef::new(Inventories::Quantity)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Inventories::Quantity).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Inventories::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventories_product")
                            .from(Inventories::Table, Inventories::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventories_warehouse")
                            .from(Inventories::Table, Inventories::WarehouseId)
                            .to(Warehouses::Table, Warehouses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inventories_product_id")
                    .table(Inventories::Table)
                    .col(Inventories::ProductId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Inventories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Warehouses::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Warehouses {
    Table,
    Id,
    Name,
    Address,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Inventories {
    Table,
    Id,
    ProductId,
    WarehouseId,
    Quantity,
    UpdatedAt,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
}
