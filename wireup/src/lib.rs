//! Application bootstrapping based on [wireup_di] dependency injection.
//!
//! Applications using dependency injection need an entrypoint which loads configuration, sets up
//! supporting infrastructure (e.g. logging) and creates the container with all services
//! registered. This crate provides such entrypoint in the form of
//! [Application](application::Application):
//!
//! ```
//! use wireup::application::Application;
//! use wireup::config::{ContainerConfig, CONFIG_ALIAS};
//!
//! let container = Application::new(ContainerConfig::default()).bootstrap();
//! assert!(container.has(CONFIG_ALIAS));
//! ```
//!
//! ### Features
//!
//! * `threadsafe` - use threadsafe pointers and `Send + Sync` trait bounds

pub mod application;
pub mod config;
