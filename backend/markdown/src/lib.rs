//! Markdown rendering for the web UI.
//!
//! Model replies and questions are Markdown; they are rendered to HTML with
//! any raw HTML in the source shown as text.

pub mod code_block;
pub mod renderer;

pub use code_block::fenced;
pub use renderer::Renderer;
