use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{PaginatorTrait, QueryFilter};
use serde::{Deserialize, Serialize};

/// One row per served prediction. Append-only: rows are never updated,
/// only bulk-deleted through [`Model::delete_all`].
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "prediction_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub customer_id: i64,

    pub recency_7: i32,
    pub frequency_7: i32,
    pub monetary_7: f64,

    pub prediction: f64,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Appends one log row for a served prediction, timestamped now.
    pub async fn create(
        db: &DbConn,
        customer_id: i64,
        recency_7: i32,
        frequency_7: i32,
        monetary_7: f64,
        prediction: f64,
    ) -> Result<Model, DbErr> {
        let row = ActiveModel {
            customer_id: Set(customer_id),
            recency_7: Set(recency_7),
            frequency_7: Set(frequency_7),
            monetary_7: Set(monetary_7),
            prediction: Set(prediction),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        row.insert(db).await
    }

    /// Number of logged requests for a customer. Zero for customers that
    /// have never been seen; this is not an error.
    pub async fn count_for_customer(db: &DbConn, customer_id: i64) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::CustomerId.eq(customer_id))
            .count(db)
            .await
    }

    /// Clears the entire request log unconditionally. Returns the number of
    /// deleted rows. Maintenance-only; racing predicts are not isolated.
    pub async fn delete_all(db: &DbConn) -> Result<u64, DbErr> {
        let res = Entity::delete_many().exec(db).await?;
        Ok(res.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::Model;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn create_assigns_increasing_ids() {
        let db = setup_test_db().await;

        let first = Model::create(&db, 1, 1, 1, 8.5, 12.34).await.unwrap();
        let second = Model::create(&db, 1, 2, 2, 9.5, 13.0).await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.customer_id, 1);
        assert_eq!(first.prediction, 12.34);
    }

    #[tokio::test]
    async fn count_accumulates_per_customer() {
        let db = setup_test_db().await;

        for i in 0..3 {
            Model::create(&db, 3333, i, i, f64::from(i), 1.0)
                .await
                .unwrap();
        }
        Model::create(&db, 8888, 1, 1, 10.0, 1.0).await.unwrap();

        assert_eq!(Model::count_for_customer(&db, 3333).await.unwrap(), 3);
        assert_eq!(Model::count_for_customer(&db, 8888).await.unwrap(), 1);
        assert_eq!(Model::count_for_customer(&db, 999_999).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_all_clears_the_log() {
        let db = setup_test_db().await;

        Model::create(&db, 1, 1, 1, 8.5, 1.0).await.unwrap();
        Model::create(&db, 2, 1, 1, 8.5, 1.0).await.unwrap();

        let deleted = Model::delete_all(&db).await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(Model::count_for_customer(&db, 1).await.unwrap(), 0);
        assert_eq!(Model::count_for_customer(&db, 2).await.unwrap(), 0);
    }
}
