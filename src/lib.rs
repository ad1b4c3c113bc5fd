//! TalentScout: conversational candidate screening.

pub mod cli;
pub mod config;
pub mod error;
pub mod screening;
pub mod store;
