pub mod config;
pub mod manager;

#[cfg(test)]
mod tests;

pub use config::{BackendConfig, Settings};
pub use manager::SettingsManager;
