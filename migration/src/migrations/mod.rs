pub mod m202608200001_create_prediction_requests;
pub mod m202608200002_create_customer_activity;
