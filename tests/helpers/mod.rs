//! Shared helpers for the integration test suite

pub mod database_helper;
pub mod test_data;
