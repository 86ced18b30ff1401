//! LSP Protocol Implementation
//!
//! The backend mirrors open documents, turns commands into edits and preview
//! notifications, and answers the engine's custom requests.

pub mod backend;
pub mod document;
pub mod handlers;
pub mod host;
pub mod protocol;
pub mod server;

pub use backend::Backend;
pub use server::serve;
