//! LPC declaration scanner.
//!
//! This is not an LPC compiler: it walks the module text just far enough to
//! find top-level function definitions, their headers, and the `/** */`
//! comment directly above each one. Function bodies are skipped by brace
//! matching, with comments, string literals and char literals honored.

pub mod jsdoc;

use crate::ast::{FunctionDecl, ParamDecl};
use crate::context::Driver;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

/// Find every documented or undocumented function definition in `source`.
pub fn scan(source: &str, driver: Driver) -> Result<Vec<FunctionDecl>, ParseError> {
    Scanner::new(source).run(driver)
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
        }
    }

    fn run(mut self, driver: Driver) -> Result<Vec<FunctionDecl>, ParseError> {
        let mut functions = Vec::new();
        let mut header = String::new();
        let mut doc: Option<&'a str> = None;
        let mut parens = 0usize;

        while let Some(c) = self.peek() {
            if self.rest().starts_with("/**") && !self.rest().starts_with("/**/") {
                let body = self.block_comment()?;
                if parens == 0 {
                    doc = Some(&body[1..]);
                    header.clear();
                }
                continue;
            }
            if self.rest().starts_with("/*") {
                self.block_comment()?;
                header.push(' ');
                continue;
            }
            if self.rest().starts_with("//") {
                self.line_comment();
                continue;
            }
            if self.at_directive() {
                self.directive();
                header.clear();
                doc = None;
                continue;
            }

            match c {
                '"' => header.push_str(self.string_literal()?),
                '\'' if self.char_literal_len().is_some() => {
                    header.push_str(self.char_literal());
                }
                '(' => {
                    parens += 1;
                    header.push(c);
                    self.bump();
                }
                ')' => {
                    parens = parens.saturating_sub(1);
                    header.push(c);
                    self.bump();
                }
                ';' if parens == 0 => {
                    header.clear();
                    doc = None;
                    self.bump();
                }
                '{' if parens == 0 => {
                    let open_line = self.line;
                    self.bump();
                    if let Some(mut decl) = parse_header(&header, driver) {
                        decl.tags = doc.map(jsdoc::parse).unwrap_or_default();
                        functions.push(decl);
                    }
                    self.skip_body(open_line)?;
                    header.clear();
                    doc = None;
                }
                '}' if parens == 0 => return Err(self.error("unbalanced '}'")),
                _ => {
                    header.push(c);
                    self.bump();
                }
            }
        }

        if parens > 0 {
            return Err(self.error("unbalanced '(' at end of file"));
        }

        Ok(functions)
    }

    // -- Cursor ---------------------------------------------------------------

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    /// Advance `len` bytes, counting newlines.
    fn advance(&mut self, len: usize) -> &'a str {
        let taken = &self.src[self.pos..self.pos + len];
        self.line += taken.matches('\n').count();
        self.pos += len;
        taken
    }

    fn error(&self, message: &str) -> ParseError {
        ParseError {
            line: self.line,
            message: message.to_string(),
        }
    }

    // -- Skippers -------------------------------------------------------------

    /// Consume a `/* */` comment and return the text between the delimiters.
    fn block_comment(&mut self) -> Result<&'a str, ParseError> {
        let start_line = self.line;
        match self.rest()[2..].find("*/") {
            Some(end) => {
                let taken = self.advance(end + 4);
                Ok(&taken[2..taken.len() - 2])
            }
            None => Err(ParseError {
                line: start_line,
                message: "unterminated comment".to_string(),
            }),
        }
    }

    fn line_comment(&mut self) {
        let len = self.rest().find('\n').unwrap_or(self.rest().len());
        self.advance(len);
    }

    /// A `#` directive starts a line (leading whitespace allowed) and is
    /// followed by a word, which rules out `#'closure` literals.
    fn at_directive(&self) -> bool {
        if !self.rest().starts_with('#') {
            return false;
        }
        let line_start = self.src[..self.pos].rfind('\n').map_or(0, |i| i + 1);
        if !self.src[line_start..self.pos].trim().is_empty() {
            return false;
        }
        let mut chars = self.rest().chars();
        chars.next() == Some('#')
            && chars
                .find(|c| *c != ' ' && *c != '\t')
                .is_some_and(|c| c.is_ascii_alphabetic())
    }

    /// Skip a preprocessor line, following `\` continuations.
    fn directive(&mut self) {
        loop {
            let len = self.rest().find('\n').unwrap_or(self.rest().len());
            let continued = self.rest()[..len].trim_end().ends_with('\\');
            self.advance(len);
            if !continued || self.bump().is_none() {
                break;
            }
        }
    }

    fn string_literal(&mut self) -> Result<&'a str, ParseError> {
        let start = self.pos;
        let start_line = self.line;
        self.bump();
        loop {
            match self.bump() {
                Some('\\') => {
                    self.bump();
                }
                Some('"') => return Ok(&self.src[start..self.pos]),
                Some(_) => {}
                None => {
                    return Err(ParseError {
                        line: start_line,
                        message: "unterminated string".to_string(),
                    })
                }
            }
        }
    }

    /// Byte length of a `'x'` or `'\x'` literal at the cursor.
    fn char_literal_len(&self) -> Option<usize> {
        let mut chars = self.rest().char_indices().skip(1);
        let (_, first) = chars.next()?;
        if first == '\\' {
            chars.next()?;
        }
        match chars.next()? {
            (at, '\'') => Some(at + 1),
            _ => None,
        }
    }

    fn char_literal(&mut self) -> &'a str {
        let len = self.char_literal_len().unwrap_or(1);
        self.advance(len)
    }

    /// Skip a function body; the opening `{` is already consumed.
    fn skip_body(&mut self, open_line: usize) -> Result<(), ParseError> {
        let mut depth = 1usize;
        while let Some(c) = self.peek() {
            if self.rest().starts_with("/*") {
                self.block_comment()?;
                continue;
            }
            if self.rest().starts_with("//") {
                self.line_comment();
                continue;
            }
            if self.at_directive() {
                self.directive();
                continue;
            }
            match c {
                '"' => {
                    self.string_literal()?;
                }
                '\'' if self.char_literal_len().is_some() => {
                    self.char_literal();
                }
                '{' => {
                    depth += 1;
                    self.bump();
                }
                '}' => {
                    depth -= 1;
                    self.bump();
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {
                    self.bump();
                }
            }
        }
        Err(ParseError {
            line: open_line,
            message: "unterminated function body".to_string(),
        })
    }
}

// -- Headers ------------------------------------------------------------------

/// Parse `modifiers type name(params)`; anything else is not a function.
fn parse_header(header: &str, driver: Driver) -> Option<FunctionDecl> {
    let header = header.trim();
    let inner = header.strip_suffix(')')?;
    let open = matching_open(inner)?;
    let head = tokenize(&inner[..open])?;
    let params = &inner[open + 1..];

    let (name, prefix) = head.split_last()?;
    if !is_identifier(name) || NOT_FUNCTIONS.contains(name) {
        return None;
    }

    let mut modifiers = Vec::new();
    let mut type_tokens = Vec::new();
    for token in prefix {
        if driver.modifiers().contains(token) {
            modifiers.push(token.to_string());
        } else {
            type_tokens.push(*token);
        }
    }

    Some(FunctionDecl {
        name: name.to_string(),
        modifiers,
        parameters: parse_params(params),
        return_type: join_type(&type_tokens),
        tags: Vec::new(),
    })
}

/// Keywords that may precede `(...) {` at top level without naming a function.
const NOT_FUNCTIONS: &[&str] = &["if", "while", "for", "foreach", "switch", "catch", "return"];

/// Byte index of the `(` matching the implied `)` at the end of `text`.
fn matching_open(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' if depth == 0 => return Some(i),
            '(' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Split declaration text into identifiers and type punctuation
/// (`*`, `&`, `...`). Any other character means this is not a declaration.
fn tokenize(text: &str) -> Option<Vec<&str>> {
    let mut tokens = Vec::new();
    let mut rest = text.trim_start();
    while !rest.is_empty() {
        let len = if let Some(stripped) = rest.strip_prefix("...") {
            rest.len() - stripped.len()
        } else if rest.starts_with('*') || rest.starts_with('&') {
            1
        } else {
            let len = rest
                .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            if len == 0 {
                return None;
            }
            len
        };
        tokens.push(&rest[..len]);
        rest = rest[len..].trim_start();
    }
    Some(tokens)
}

fn is_identifier(token: &str) -> bool {
    token
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
}

/// `["string", "*"]` → `"string *"`; `["mapping", "*", "*"]` → `"mapping **"`.
fn join_type(tokens: &[&str]) -> Option<String> {
    let mut ty = String::new();
    let mut prev_star = false;
    for token in tokens {
        let star = *token == "*";
        if !ty.is_empty() && !(star && prev_star) {
            ty.push(' ');
        }
        ty.push_str(token);
        prev_star = star;
    }
    if ty.is_empty() {
        None
    } else {
        Some(ty)
    }
}

fn parse_params(text: &str) -> Vec<ParamDecl> {
    let text = text.trim();
    if text.is_empty() || text == "void" {
        return Vec::new();
    }
    split_top_level(text, ',')
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(parse_param)
        .collect()
}

fn parse_param(text: &str) -> ParamDecl {
    let (decl, default) = split_default(text);

    let mut param = ParamDecl {
        name: decl.trim().to_string(),
        ty: None,
        default,
        text: text.to_string(),
    };

    if let Some(mut tokens) = tokenize(decl) {
        if tokens.last() == Some(&"...") {
            tokens.pop();
        }
        if let Some(at) = tokens.iter().rposition(|t| is_identifier(t)) {
            param.name = tokens[at].to_string();
            tokens.remove(at);
            param.ty = join_type(&tokens);
        }
    }

    param
}

/// Split off a FluffOS `name: (: expr :)` or a `name = expr` default.
fn split_default(text: &str) -> (&str, Option<String>) {
    let bytes = text.as_bytes();
    let at = top_level_positions(text).into_iter().find(|&i| match bytes[i] {
        b':' => bytes.get(i + 1) != Some(&b':') && (i == 0 || bytes[i - 1] != b':'),
        b'=' => bytes.get(i + 1) != Some(&b'='),
        _ => false,
    });

    match at {
        Some(i) => {
            let expr = text[i + 1..].trim();
            let expr = expr
                .strip_prefix("(:")
                .and_then(|e| e.strip_suffix(":)"))
                .map_or(expr, str::trim);
            (&text[..i], Some(expr.to_string()))
        }
        None => (text, None),
    }
}

fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for i in top_level_positions(text) {
        if text[i..].starts_with(sep) {
            parts.push(&text[start..i]);
            start = i + sep.len_utf8();
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Byte offsets of characters outside brackets and string literals.
fn top_level_positions(text: &str) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 => positions.push(i),
            _ => {}
        }
    }
    positions
}
