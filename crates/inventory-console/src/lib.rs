//! Inventory console - operator views over an inventory service
//!
//! This crate holds the view state behind the console front ends: a lazily
//! synchronized resource tree, a filterable resource type catalog and a
//! launcher that turns metrics into graph URLs. Front ends drive it through
//! the [`InventoryApi`] seam and receive user-visible errors through a
//! [`Notifier`].

pub mod client;
pub mod config;
pub mod encoding;
pub mod error;
pub mod generation;
pub mod graph;
pub mod model;
pub mod notify;
pub mod testing;
pub mod tree;
pub mod types;

pub use client::{HttpInventoryClient, InventoryApi};
pub use config::Config;
pub use error::{ConsoleError, Result};
pub use graph::GraphLauncher;
pub use notify::{LogNotifier, Notifier};
pub use tree::ResourceTree;
pub use types::TypeCatalog;
