//! Code Chunks
//!
//! Marker scanning and output-block synchronization for executable code
//! chunks embedded in markdown documents.

pub mod marker;
pub mod output;

pub use marker::{locate_chunk, ChunkAnchor, MarkerKind};
pub use output::{modify_source, plan_output_edit, SourceEdit, OUTPUT_CLOSE, OUTPUT_OPEN};
