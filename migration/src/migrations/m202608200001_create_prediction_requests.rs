use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202608200001_create_prediction_requests"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("prediction_requests"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("customer_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("recency_7")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("frequency_7")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("monetary_7")).double().not_null())
                    .col(ColumnDef::new(Alias::new("prediction")).double().not_null())
                    .col(ColumnDef::new(Alias::new("created_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .to_owned(),
            )
            .await?;

        // customer_id is intentionally not unique; counts accumulate per customer.
        // SQLite does not accept inline INDEX clauses in CREATE TABLE, so the
        // index is created as a separate statement.
        manager
            .create_index(
                Index::create()
                    .name("idx_prediction_requests_customer_id")
                    .table(Alias::new("prediction_requests"))
                    .col(Alias::new("customer_id"))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("prediction_requests")).to_owned())
            .await
    }
}
