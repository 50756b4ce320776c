//! Tool configuration loading and schema definitions
//!
//! Controls the configuration pass itself: credential key, build directory
//! redirect, and repository order. Distinct from `local.properties`, which
//! belongs to the Android project being configured.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
