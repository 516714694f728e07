//! Domain layer - value objects and pure logic

pub mod config;
pub mod error;
pub mod notification;
pub mod registration;
