//! lpcdoc: Markdown API documentation for LPC modules.
//!
//! The pipeline per module is:
//!
//! 1. [`ParseContext::parse`] turns module text into [`ast::FunctionDecl`]s;
//! 2. [`extract`] reconciles each declaration with its doc comment into a
//!    [`FunctionResult`];
//! 3. [`ModuleRenderer::render`] lays the records out as one Markdown file.

pub mod ast;
pub mod context;
pub mod contract;
pub mod error;
pub mod extract;
pub mod logger;
pub mod markdown;
pub mod model;
pub mod parser;
pub mod render;
pub mod toc;

pub use context::ParseContext;
pub use error::DocError;
pub use extract::extract;
pub use markdown::MarkdownWriter;
pub use model::FunctionResult;
pub use render::{ModuleRenderer, RenderOptions, RenderedModule};

use tracing::debug;

/// Parse `source` and extract one record per function, in source order.
pub fn extract_module(
    ctx: &ParseContext,
    path: &str,
    source: &str,
) -> error::Result<Vec<FunctionResult>> {
    let decls = ctx.parse(path, source)?;
    debug!("{}: {} functions", path, decls.len());
    Ok(decls.iter().map(extract).collect())
}
