use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202608200002_create_customer_activity"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("customer_activity"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("recency_7")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("frequency_7")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("monetary_value_7")).double().not_null())
                    .col(ColumnDef::new(Alias::new("monetary_value_30")).double().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("customer_activity")).to_owned())
            .await
    }
}
