use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Historical labeled activity used by the offline trainer: trailing 7-day
/// features and the realized 30-day monetary value. The serving path never
/// reads this table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "customer_activity")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub recency_7: i32,
    pub frequency_7: i32,
    pub monetary_value_7: f64,

    pub monetary_value_30: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn fetch_all(db: &DbConn) -> Result<Vec<Model>, DbErr> {
        Entity::find().all(db).await
    }
}

#[cfg(test)]
mod tests {
    use super::{ActiveModel, Model};
    use crate::test_utils::setup_test_db;
    use sea_orm::ActiveModelTrait;
    use sea_orm::ActiveValue::Set;

    #[tokio::test]
    async fn fetch_all_returns_inserted_rows() {
        let db = setup_test_db().await;

        for i in 0..4 {
            let row = ActiveModel {
                recency_7: Set(i),
                frequency_7: Set(i * 2),
                monetary_value_7: Set(f64::from(i) * 1.5),
                monetary_value_30: Set(f64::from(i) * 4.0),
                ..Default::default()
            };
            row.insert(&db).await.unwrap();
        }

        let rows = Model::fetch_all(&db).await.unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2].frequency_7, 4);
    }
}
