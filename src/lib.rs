//! Markdown Preview Language Server
//!
//! Editor-side glue for Markdown Preview Enhanced, served over LSP.
//!
//! This library provides:
//! - Code chunk output synchronization into the markdown source
//! - Preview registry and preview lifecycle
//! - Typed settings with file loading and watching
//! - Editor commands and image drop handling

pub mod chunk;
pub mod commands;
pub mod config;
pub mod drop;
pub mod host;
pub mod lsp;
pub mod preview;
pub mod session;
pub mod settings;

// Re-exports for clean public API
pub use chunk::{modify_source, plan_output_edit, SourceEdit};
pub use config::Config;
pub use host::{EditorHost, MemoryHost};
pub use preview::{PreviewRegistry, PreviewView};
pub use session::Session;
pub use settings::PreviewSettings;
