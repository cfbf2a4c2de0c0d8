use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240115_000001_create_shipments_table::Migration)]
    }
}

mod m20240115_000001_create_shipments_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240115_000001_create_shipments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Mirrors models::shipment::Model. `code` is indexed but not unique: the
            // service owns that check.
            manager
                .create_table(
                    Table::create()
                        .table(Shipments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Shipments::Id)
                                .big_integer()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Shipments::Code).big_integer().not_null())
                        .col(ColumnDef::new(Shipments::Description).string().not_null())
                        .col(
                            ColumnDef::new(Shipments::Freight)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Shipments::Consignee).string().not_null())
                        .col(ColumnDef::new(Shipments::Quantity).integer().not_null())
                        .col(ColumnDef::new(Shipments::ArrivalDate).date().not_null())
                        .col(ColumnDef::new(Shipments::DeliveredDate).date().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_shipments_code")
                        .table(Shipments::Table)
                        .col(Shipments::Code)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Shipments::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Shipments {
        Table,
        Id,
        Code,
        Description,
        Freight,
        Consignee,
        Quantity,
        ArrivalDate,
        DeliveredDate,
    }
}
