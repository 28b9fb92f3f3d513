//! Qur'an reader application layer: configuration, bootstrap, the owning
//! reader context and the intent-driven controller.

pub mod app;
pub mod audio;
pub mod bootstrap;
pub mod config;
pub mod controller;
pub mod events;

#[cfg(test)]
mod tests;

pub use bootstrap::init_foundation;
