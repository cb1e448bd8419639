pub mod config;
pub mod error;
pub mod key;
pub mod position;
pub mod view;

// Container engine boundary
pub mod client;
pub mod memory;
pub mod resource;

// Panels and focus
pub mod detail;
pub mod focus;
pub mod format;
pub mod layout;
pub mod list;
pub mod panel;

// Overlays and key routing
pub mod context;
pub mod dispatch;
pub mod form;
pub mod keymap;
pub mod modal;

pub use client::{ClientCommand, ContainerClient};
pub use context::UiContext;
pub use dispatch::{Dispatch, Dispatcher};
pub use error::{ClientError, UiError};
pub use key::{Key, KeyEvent, Modifier};
pub use panel::PanelId;
