pub mod customer_activity;
pub mod prediction_request;
