// Business logic shared by the request handlers

pub mod address_service;
pub mod asset_service;
pub mod status_service;
pub mod transaction_service;
pub mod validator_service;
