//! Append-only Markdown writer with word wrapping.
//!
//! Output is byte-for-byte reproducible: the same calls always produce the
//! same text. Nothing here validates structure; heading levels and table
//! shapes are the caller's responsibility.

/// Spaces per indent level in wrapped text.
const INDENT_WIDTH: usize = 4;

pub const DEFAULT_COLUMNS: usize = 80;

#[derive(Debug, Clone)]
pub struct MarkdownWriter {
    buf: String,
    newline: String,
    columns: usize,
}

impl Default for MarkdownWriter {
    fn default() -> Self {
        Self::new("\n", DEFAULT_COLUMNS)
    }
}

impl MarkdownWriter {
    pub fn new(newline: &str, columns: usize) -> Self {
        Self {
            buf: String::new(),
            newline: newline.to_string(),
            columns,
        }
    }

    /// The text written so far.
    pub fn text(&self) -> &str {
        &self.buf
    }

    pub fn into_text(self) -> String {
        self.buf
    }

    /// Append raw text.
    pub fn write(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    pub fn write_new_line(&mut self) {
        self.buf.push_str(&self.newline);
    }

    fn write_line(&mut self, s: &str) {
        self.buf.push_str(s);
        self.write_new_line();
    }

    pub fn write_text(&mut self, s: &str) {
        self.write_text_indented(s, 0);
    }

    /// Write `s` as one paragraph wrapped at `columns - indent * 4`.
    ///
    /// Existing line breaks are collapsed into single spaces first. A word
    /// longer than the wrap width is kept whole on its own line.
    pub fn write_text_indented(&mut self, s: &str, indent: usize) {
        let text = normalize(s);
        let pad = " ".repeat(indent * INDENT_WIDTH);
        let width = self
            .columns
            .saturating_sub(indent * INDENT_WIDTH)
            .max(1);

        for line in wrap(&text, width) {
            self.buf.push_str(&pad);
            self.write_line(line);
        }
    }

    pub fn write_header(&mut self, level: usize, text: &str) {
        self.write_line(&format!("{} {}", "#".repeat(level), text));
        self.write_new_line();
    }

    /// Fenced code block; `code` is written verbatim.
    pub fn write_fenced_code(&mut self, code: &str, lang: &str) {
        self.write_line(&format!("```{}", lang));
        self.buf.push_str(code);
        if !code.ends_with('\n') {
            self.write_new_line();
        }
        self.write_line("```");
    }

    pub fn write_code(&mut self, s: &str) {
        self.buf.push_str(&Self::code(s));
    }

    pub fn write_bold(&mut self, s: &str) {
        self.buf.push_str(&Self::bold(s));
    }

    pub fn write_italic(&mut self, s: &str) {
        self.buf.push_str(&Self::italic(s));
    }

    pub fn write_link(&mut self, text: &str, target: &str) {
        self.buf.push_str(&Self::link(text, target));
    }

    pub fn write_table_header(&mut self, headers: &[&str]) {
        self.write_line(&table_row(headers.iter().copied()));
        self.write_line(&table_row(headers.iter().map(|_| "---")));
    }

    /// Table row; `|` inside a cell is escaped. Cells must not contain line breaks.
    pub fn write_table_row<S: AsRef<str>>(&mut self, cells: &[S]) {
        let escaped: Vec<String> = cells
            .iter()
            .map(|cell| cell.as_ref().replace('|', "\\|"))
            .collect();
        self.write_line(&table_row(escaped.iter().map(String::as_str)));
    }

    pub fn write_list_items<S: AsRef<str>>(&mut self, items: &[S]) {
        for item in items {
            self.write_line(&format!("- {}", item.as_ref()));
        }
    }

    pub fn write_horizontal_rule(&mut self) {
        self.write_line("---");
    }

    // -- Inline fragments -----------------------------------------------------

    pub fn code(s: &str) -> String {
        format!("`{}`", s)
    }

    pub fn bold(s: &str) -> String {
        format!("**{}**", s)
    }

    pub fn italic(s: &str) -> String {
        format!("*{}*", s)
    }

    pub fn link(text: &str, target: &str) -> String {
        format!("[{}]({})", text, target)
    }
}

fn table_row<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    let mut row = String::from("|");
    for cell in cells {
        row.push(' ');
        row.push_str(cell);
        row.push_str(" |");
    }
    row
}

/// Trim every line, drop blank ones, join with single spaces.
fn normalize(s: &str) -> String {
    s.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Greedy word wrap. Widths are counted in chars.
fn wrap(text: &str, width: usize) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        // Byte offset of the first char past the limit.
        let Some((limit, _)) = rest.char_indices().nth(width) else {
            lines.push(rest);
            break;
        };

        let split = if rest[limit..].starts_with(' ') {
            Some(limit)
        } else {
            rest[..limit]
                .rfind(' ')
                .or_else(|| rest[limit..].find(' ').map(|at| limit + at))
        };

        match split {
            Some(at) => {
                lines.push(rest[..at].trim_end());
                rest = rest[at + 1..].trim_start();
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }

    lines
}
