//! Tolerant handling of vision-model output: response extraction and
//! taxonomy normalization. Both are total functions; upstream model
//! flakiness never crashes the pipeline.

pub mod parser;
pub mod taxonomy;

pub use parser::{extract_reply, ModelReply};
pub use taxonomy::Category;
