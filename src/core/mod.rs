//! Configuration, time source and request models

pub mod clock;
pub mod config;
pub mod models;
