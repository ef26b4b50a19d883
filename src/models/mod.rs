pub mod delivery_config;
pub mod quote;
pub mod shop;
