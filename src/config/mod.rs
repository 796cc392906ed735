//! Configuration module for curing
//!
//! This module provides the `CureConfig` struct, its builder and JSON loading.

pub mod builder;
pub mod getters;
pub mod loader;
pub mod methods;
pub mod types;

pub use builder::CureConfigBuilder;
pub use types::{CureConfig, ExtensionSets};
