//! Plugin link management for Engine Plugin Manager
//!
//! Creates, verifies and removes the directory symlink that connects an
//! engine installation's plugin directory to its working copy, and
//! handles the identity collision with the engine-bundled Git plugin.

pub mod error;
pub mod link;
pub mod stock;

pub use error::{Error, Result};
pub use link::{create_link, link_exists, link_path, remove_link, resolved_target, verify_link};
pub use stock::{
    StockPluginState, collision, disable_stock_plugin, enable_stock_plugin, stock_plugin_state,
};
