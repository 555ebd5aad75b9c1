//! Persona core: answers in the voice of one person by reusing their past
//! replies when a new message is close enough, and by filling styled
//! templates otherwise.

pub mod artifacts;
pub mod brain;
pub mod config;
pub mod database;
pub mod error;
pub mod fs_manager;
pub mod models;
pub mod service;
pub mod session;
pub mod traits;

#[cfg(test)]
mod tests;
