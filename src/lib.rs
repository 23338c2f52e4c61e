pub mod commands;
pub mod config;
pub mod datatypes;
pub mod error;
pub mod loader;
pub mod post_processor;
pub mod search;
