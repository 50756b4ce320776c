//! Build configuration pass for the Foodshare Android project
//!
//! Re-implements the Gradle root script's one-time setup as an inspectable
//! library:
//!
//! - **Properties**: optional `local.properties` loading
//! - **Credential**: two-tier Mapbox downloads token lookup (properties
//!   first, environment second)
//! - **Repositories**: ordered package sources applied to every project
//! - **Layout**: build output redirection and per-subproject derivation
//! - **Clean**: idempotent removal of the redirected build tree
//!
//! # Example
//!
//! ```rust,no_run
//! use foodshare_buildconf::config::Config;
//! use foodshare_buildconf::project::BuildConfiguration;
//! use std::path::Path;
//!
//! let config = Config::defaults();
//! let pass = BuildConfiguration::configure(Path::new("android"), &config.schema)
//!     .expect("configuration pass failed");
//!
//! for subproject in &pass.subprojects {
//!     println!("{} -> {}", subproject.name, subproject.build_dir.display());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod clean;
pub mod config;
pub mod credential;
pub mod error;
pub mod layout;
pub mod project;
pub mod properties;
pub mod repositories;

pub use error::{Error, ErrorCode, Result, ResultExt};
