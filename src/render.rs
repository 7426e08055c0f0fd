//! Module renderer: drives [`MarkdownWriter`] over a module's records.

use crate::error::{DocError, Result};
use crate::markdown::{MarkdownWriter, DEFAULT_COLUMNS};
use crate::model::{FunctionResult, Param, TypedNode};
use crate::toc;

/// Layout settings for rendered documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub columns: usize,
    pub newline: String,
    /// Info string for signature and `@example` code fences.
    pub code_lang: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            newline: "\n".to_string(),
            code_lang: "lpc".to_string(),
        }
    }
}

/// A rendered module ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedModule {
    pub dest_file: String,
    pub dest_content: String,
}

#[derive(Debug, Clone, Default)]
pub struct ModuleRenderer {
    options: RenderOptions,
}

impl ModuleRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render all functions of `module` into one Markdown document.
    pub fn render(&self, module: &str, functions: &[FunctionResult]) -> Result<RenderedModule> {
        if functions.is_empty() {
            return Err(DocError::NoContent);
        }

        let mut w = MarkdownWriter::new(&self.options.newline, self.options.columns);

        w.write_header(1, module);

        let toc: Vec<String> = functions
            .iter()
            .map(|func| toc::render_toc_link(func.name()))
            .collect();
        w.write_list_items(&toc);
        w.write_new_line();

        for (i, func) in functions.iter().enumerate() {
            if i > 0 {
                w.write_horizontal_rule();
                w.write_new_line();
            }
            self.render_function(&mut w, func);
        }

        Ok(RenderedModule {
            dest_file: format!("{}.md", module),
            dest_content: w.into_text(),
        })
    }

    fn render_function(&self, w: &mut MarkdownWriter, func: &FunctionResult) {
        let lang = self.options.code_lang.as_str();

        w.write_header(2, func.name());
        w.write_fenced_code(&func.signature.to_declaration(), lang);
        w.write_new_line();

        let description = flatten(&func.description);
        if !description.is_empty() {
            w.write_text(&description);
            w.write_new_line();
        }

        if !func.param.is_empty() {
            w.write_header(4, "Parameters");
            render_params(w, &func.param);
            w.write_new_line();
        }

        w.write_header(4, "Returns");
        let returns = return_text(&func.returns);
        if !returns.is_empty() {
            w.write_text(&returns);
            w.write_new_line();
        }

        for tag in &func.tags {
            w.write_header(4, &capitalize(&tag.name));
            if tag.name == "example" {
                w.write_fenced_code(&tag.content.join(&self.options.newline), lang);
            } else {
                w.write_text(&flatten(&tag.content));
            }
            w.write_new_line();
        }
    }
}

fn render_params(w: &mut MarkdownWriter, params: &[Param]) {
    let with_default = params.iter().any(|p| !p.default.is_empty());

    if with_default {
        w.write_table_header(&["Type", "Name", "Default", "Description"]);
    } else {
        w.write_table_header(&["Type", "Name", "Description"]);
    }

    for param in params {
        let ty = MarkdownWriter::code(&param.ty);
        let name = if param.optional {
            format!("{} _(optional)_", param.name)
        } else {
            param.name.clone()
        };
        let description = flatten(&param.content);

        if with_default {
            w.write_table_row(&[ty, name, param.default.clone(), description]);
        } else {
            w.write_table_row(&[ty, name, description]);
        }
    }
}

/// "`type` - content"; the type alone when there is no content to follow.
fn return_text(returns: &TypedNode) -> String {
    let content = flatten(&returns.content);
    match (returns.ty.is_empty(), content.is_empty()) {
        (true, _) => content,
        (false, true) => MarkdownWriter::code(&returns.ty),
        (false, false) => format!("{} - {}", MarkdownWriter::code(&returns.ty), content),
    }
}

/// Join lines with spaces and turn embedded line breaks into spaces.
fn flatten(lines: &[String]) -> String {
    lines
        .join(" ")
        .replace("\r\n", " ")
        .replace('\n', " ")
        .trim()
        .to_string()
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
