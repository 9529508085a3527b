pub mod account;
pub mod browse;
pub mod collections;
pub mod submit;
