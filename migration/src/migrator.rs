use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202608200001_create_prediction_requests::Migration),
            Box::new(migrations::m202608200002_create_customer_activity::Migration),
        ]
    }
}
