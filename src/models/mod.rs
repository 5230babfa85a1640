pub mod backup_name;
pub mod backup_report;
pub mod config;
pub mod config_validator;
pub mod error;
pub mod hash_algorithm;
