pub mod auth_service;
pub mod housekeeping;
