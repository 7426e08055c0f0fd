//! Parsing context: project configuration shared by every module in a run.
//!
//! The host builds one [`ParseContext`] up front and passes it to each
//! extraction call. It is never reloaded, so edits to `lpc-config.json`
//! made while a run is in progress are not picked up.

use crate::ast::FunctionDecl;
use crate::error::DocError;
use crate::parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "lpc-config.json";

/// Target driver; decides which keywords count as modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum Driver {
    #[default]
    #[serde(rename = "fluffos", alias = "FluffOS")]
    FluffOS,
    #[serde(rename = "ldmud", alias = "LDMud")]
    LDMud,
}

const FLUFFOS_MODIFIERS: &[&str] = &[
    "public", "protected", "private", "static", "nomask", "varargs", "nosave",
];

const LDMUD_MODIFIERS: &[&str] = &[
    "public", "protected", "private", "static", "nomask", "varargs", "nosave", "deprecated",
    "visible",
];

impl Driver {
    pub fn modifiers(self) -> &'static [&'static str] {
        match self {
            Driver::FluffOS => FLUFFOS_MODIFIERS,
            Driver::LDMud => LDMUD_MODIFIERS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriverConfig {
    #[serde(rename = "type", default)]
    pub kind: Driver,
}

/// Contents of `lpc-config.json`. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LpcConfig {
    #[serde(default)]
    pub driver: DriverConfig,
    /// Modules to document when no inputs are given.
    #[serde(default)]
    pub files: Vec<String>,
    /// Glob patterns removed from the input set.
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid exclude pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

#[derive(Debug, Default)]
pub struct ParseContext {
    config_path: Option<PathBuf>,
    config: LpcConfig,
    exclude: Vec<glob::Pattern>,
}

impl ParseContext {
    pub fn new(config: LpcConfig) -> Result<Self, ConfigError> {
        let exclude = config
            .exclude
            .iter()
            .map(|pattern| {
                glob::Pattern::new(pattern).map_err(|source| ConfigError::Pattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self {
            config_path: None,
            config,
            exclude,
        })
    }

    /// Search `start` and its ancestors for `lpc-config.json`. Without one,
    /// the default FluffOS context is used.
    pub fn discover(start: &Path) -> Result<Self, ConfigError> {
        match find_config_file(start) {
            Some(path) => Self::load(&path),
            None => {
                debug!("no {} found from {}", CONFIG_FILE_NAME, start.display());
                Ok(Self::default())
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: LpcConfig =
            serde_json::from_str(&strip_comments(&text)).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(
            "loaded {} (driver {:?}, {} files)",
            path.display(),
            config.driver.kind,
            config.files.len()
        );

        let mut ctx = Self::new(config)?;
        ctx.config_path = Some(path.to_path_buf());
        Ok(ctx)
    }

    pub fn driver(&self) -> Driver {
        self.config.driver.kind
    }

    pub fn config(&self) -> &LpcConfig {
        &self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Directory holding the config file; relative config paths resolve here.
    pub fn project_dir(&self) -> Option<&Path> {
        self.config_path.as_deref().and_then(Path::parent)
    }

    /// The config's `files`, resolved against the project directory.
    pub fn root_files(&self) -> Vec<String> {
        self.config
            .files
            .iter()
            .map(|file| match self.project_dir() {
                Some(dir) => dir.join(file).to_string_lossy().into_owned(),
                None => file.clone(),
            })
            .collect()
    }

    /// Whether `path` matches an `exclude` pattern, either as given or
    /// relative to the project directory.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let relative = self
            .project_dir()
            .and_then(|dir| path.strip_prefix(dir).ok())
            .unwrap_or(path);
        self.exclude
            .iter()
            .any(|pattern| pattern.matches_path(path) || pattern.matches_path(relative))
    }

    /// Parse one module's text into function declarations.
    pub fn parse(&self, path: &str, source: &str) -> Result<Vec<FunctionDecl>, DocError> {
        parser::scan(source, self.driver()).map_err(|err| DocError::ExtractionUnavailable {
            path: path.to_string(),
            message: err.to_string(),
        })
    }
}

/// Walk from `start` (a file or directory) up to the filesystem root.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let start = if start.is_file() {
        start.parent()?
    } else {
        start
    };
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Remove `//` and `/* */` comments outside of JSON strings.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        let next = chars.peek().copied();
        match (c, next) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    if next == '\n' {
                        out.push('\n');
                    }
                    prev = next;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn strip_line_and_block_comments() {
        let text = "{\n  // driver\n  \"driver\": { /* inline */ \"type\": \"ldmud\" },\n  \"files\": [\"a//b.c\"]\n}";
        let config: LpcConfig = serde_json::from_str(&strip_comments(text)).unwrap();
        assert_eq!(config.driver.kind, Driver::LDMud);
        assert_eq!(config.files, vec!["a//b.c"]);
    }

    #[test]
    fn default_is_fluffos() {
        let ctx = ParseContext::default();
        assert_eq!(ctx.driver(), Driver::FluffOS);
        assert!(ctx.config_path().is_none());
        assert!(ctx.root_files().is_empty());
    }

    #[test]
    fn discover_walks_ancestors() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "{ \"driver\": { \"type\": \"ldmud\" }, \"files\": [\"std/object.c\"] }",
        )
        .unwrap();
        let nested = dir.path().join("std").join("lib");
        fs::create_dir_all(&nested).unwrap();

        let ctx = ParseContext::discover(&nested).unwrap();
        assert_eq!(ctx.driver(), Driver::LDMud);
        assert_eq!(ctx.project_dir(), Some(dir.path()));
        assert_eq!(
            ctx.root_files(),
            vec![dir.path().join("std/object.c").to_string_lossy().into_owned()]
        );
    }

    #[test]
    fn invalid_config_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ \"driver\": 3 }").unwrap();
        let err = ParseContext::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn exclude_patterns() {
        let ctx = ParseContext::new(LpcConfig {
            exclude: vec!["test/**".to_string(), "*.h".to_string()],
            ..Default::default()
        })
        .unwrap();
        assert!(ctx.is_excluded(Path::new("test/room.c")));
        assert!(ctx.is_excluded(Path::new("globals.h")));
        assert!(!ctx.is_excluded(Path::new("std/room.c")));
    }

    #[test]
    fn parse_failure_is_extraction_unavailable() {
        let ctx = ParseContext::default();
        let err = ctx.parse("broken.c", "int f() {").unwrap_err();
        assert_eq!(
            err,
            DocError::ExtractionUnavailable {
                path: "broken.c".to_string(),
                message: "line 1: unterminated function body".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "Failed to parse broken.c: line 1: unterminated function body"
        );
    }
}
