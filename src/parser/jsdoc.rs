//! `/** ... */` doc comment parser.
//!
//! Splits the comment into a leading description and `@tag` blocks, then
//! classifies each block into a [`DocTag`]. A tag block runs until the next
//! line that starts with `@`.

use crate::ast::{CustomTag, DocTag, ParamTag, ReturnTag};
use regex::Regex;
use std::sync::LazyLock;

static RE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@([A-Za-z][\w-]*)\s*(.*)$").unwrap());

// `{type} name rest` or `{type} [name=default] rest`
static RE_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(?:\{(?P<ty>[^}]*)\}\s*)?(?P<name>\[[^\]]*\]|[^\s\-\[][^\s]*)(?P<rest>.*)$")
        .unwrap()
});

// Known tags written mid-line, e.g. `/** Adds. @param a - first */`.
static RE_INLINE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s(@(?:param|arg|argument|returns?|description|desc)\b)").unwrap()
});

static RE_RETURN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(?:\{(?P<ty>[^}]*)\}\s*)?(?P<rest>.*)$").unwrap());

struct Block {
    tag: Option<String>,
    lines: Vec<String>,
}

/// Parse the text between `/**` and `*/`.
pub fn parse(comment: &str) -> Vec<DocTag> {
    let mut blocks = vec![Block {
        tag: None,
        lines: Vec::new(),
    }];

    for line in comment.lines().flat_map(|raw| split_inline_tags(strip_gutter(raw))) {
        if let Some(caps) = RE_TAG.captures(line.trim_start()) {
            blocks.push(Block {
                tag: Some(caps[1].to_string()),
                lines: vec![caps[2].trim_end().to_string()],
            });
        } else if let Some(block) = blocks.last_mut() {
            block.lines.push(line.to_string());
        }
    }

    blocks.into_iter().filter_map(classify).collect()
}

fn classify(block: Block) -> Option<DocTag> {
    let lines = trim_blank_edges(&block.lines);
    let Some(tag) = block.tag else {
        return description(lines);
    };

    match tag.as_str() {
        "description" | "desc" => description(lines),
        "param" | "arg" | "argument" => param(lines),
        "return" | "returns" => Some(returns(lines)),
        _ => Some(DocTag::Custom(CustomTag {
            name: tag.clone(),
            content: lines.to_vec(),
        })),
    }
}

fn description(lines: &[String]) -> Option<DocTag> {
    if lines.is_empty() {
        None
    } else {
        Some(DocTag::Description(lines.join("\n")))
    }
}

/// A tag without a parameter name has nothing to key on and is dropped.
fn param(lines: &[String]) -> Option<DocTag> {
    let text = lines.join("\n");
    let caps = RE_PARAM.captures(text.trim())?;

    let mut tag = ParamTag {
        ty: non_empty(caps.name("ty").map(|m| m.as_str())),
        comment: caps["rest"].trim().to_string(),
        ..Default::default()
    };

    let name = &caps["name"];
    match name.strip_prefix('[').and_then(|n| n.strip_suffix(']')) {
        Some(inner) => {
            let (name, default) = match inner.split_once('=') {
                Some((name, default)) => (name, Some(default)),
                None => (inner, None),
            };
            tag.name = name.trim().to_string();
            tag.optional = true;
            tag.default = non_empty(default);
        }
        None => tag.name = name.to_string(),
    }

    Some(DocTag::Param(tag))
}

fn returns(lines: &[String]) -> DocTag {
    let text = lines.join("\n");
    let text = text.trim();
    match RE_RETURN.captures(text) {
        Some(caps) => DocTag::Return(ReturnTag {
            ty: non_empty(caps.name("ty").map(|m| m.as_str())),
            comment: caps["rest"].trim().to_string(),
        }),
        None => DocTag::Return(ReturnTag {
            ty: None,
            comment: text.to_string(),
        }),
    }
}

fn split_inline_tags(line: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for caps in RE_INLINE_TAG.captures_iter(line) {
        if let Some(tag) = caps.get(1) {
            parts.push(line[start..tag.start()].trim_end());
            start = tag.start();
        }
    }
    parts.push(&line[start..]);
    parts
}

/// Drop leading whitespace, one `*`, and one space after it.
fn strip_gutter(line: &str) -> &str {
    let line = line.trim_start();
    let line = line.strip_prefix('*').unwrap_or(line);
    let line = line.strip_prefix(' ').unwrap_or(line);
    line.trim_end()
}

fn trim_blank_edges(lines: &[String]) -> &[String] {
    let start = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(start, |i| i + 1);
    &lines[start..end]
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param_tag(tag: &DocTag) -> &ParamTag {
        match tag {
            DocTag::Param(p) => p,
            other => panic!("expected param tag, got {:?}", other),
        }
    }

    #[test]
    fn description_and_tags() {
        let tags = parse(
            "\n * Adds two numbers.\n *\n * @param a - first\n * @param b - second\n * @return - sum\n ",
        );
        assert_eq!(tags.len(), 4);
        assert_eq!(tags[0], DocTag::Description("Adds two numbers.".to_string()));
        assert_eq!(param_tag(&tags[1]).name, "a");
        assert_eq!(param_tag(&tags[1]).comment, "- first");
        assert_eq!(
            tags[3],
            DocTag::Return(ReturnTag {
                ty: None,
                comment: "- sum".to_string()
            })
        );
    }

    #[test]
    fn multi_line_description() {
        let tags = parse("\n * First line.\n * Second line.\n ");
        assert_eq!(
            tags,
            vec![DocTag::Description("First line.\nSecond line.".to_string())]
        );
    }

    #[test]
    fn typed_param() {
        let tags = parse(" @param {string *} names - the names ");
        let p = param_tag(&tags[0]);
        assert_eq!(p.ty.as_deref(), Some("string *"));
        assert_eq!(p.name, "names");
        assert_eq!(p.comment, "- the names");
        assert!(!p.optional);
    }

    #[test]
    fn optional_param_with_default() {
        let tags = parse("\n * @param {int} [count=10] how many\n ");
        let p = param_tag(&tags[0]);
        assert_eq!(p.name, "count");
        assert!(p.optional);
        assert_eq!(p.default.as_deref(), Some("10"));
        assert_eq!(p.comment, "how many");
    }

    #[test]
    fn optional_param_without_default() {
        let tags = parse("@param [flag]");
        let p = param_tag(&tags[0]);
        assert_eq!(p.name, "flag");
        assert!(p.optional);
        assert_eq!(p.default, None);
    }

    #[test]
    fn param_comment_continues() {
        let tags = parse("\n * @param x - the first\n *   half of it\n ");
        assert_eq!(param_tag(&tags[0]).comment, "- the first\n  half of it");
    }

    #[test]
    fn typed_return() {
        let tags = parse("\n * @returns {mapping} the result\n ");
        assert_eq!(
            tags[0],
            DocTag::Return(ReturnTag {
                ty: Some("mapping".to_string()),
                comment: "the result".to_string()
            })
        );
    }

    #[test]
    fn example_keeps_indentation() {
        let tags = parse("\n * @example\n * if (x) {\n *     y();\n * }\n ");
        assert_eq!(
            tags[0],
            DocTag::Custom(CustomTag {
                name: "example".to_string(),
                content: vec![
                    "if (x) {".to_string(),
                    "    y();".to_string(),
                    "}".to_string()
                ],
            })
        );
    }

    #[test]
    fn custom_tag_inline() {
        let tags = parse("\n * @see other_function\n ");
        assert_eq!(
            tags[0],
            DocTag::Custom(CustomTag {
                name: "see".to_string(),
                content: vec!["other_function".to_string()],
            })
        );
    }

    #[test]
    fn explicit_description_tag() {
        let tags = parse("\n * Intro.\n * @description More.\n ");
        assert_eq!(
            tags,
            vec![
                DocTag::Description("Intro.".to_string()),
                DocTag::Description("More.".to_string()),
            ]
        );
    }

    #[test]
    fn param_without_name_is_dropped() {
        let tags = parse("\n * Hi.\n * @param\n * @see other\n ");
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0], DocTag::Description("Hi.".to_string()));
        assert!(matches!(&tags[1], DocTag::Custom(custom) if custom.name == "see"));
    }

    #[test]
    fn inline_tags_are_split() {
        let tags =
            parse(" Adds two numbers. @param a - first @param b - second @return - sum ");
        assert_eq!(tags.len(), 4);
        assert_eq!(tags[0], DocTag::Description("Adds two numbers.".to_string()));
        assert_eq!(param_tag(&tags[1]).comment, "- first");
        assert_eq!(param_tag(&tags[2]).name, "b");
        assert_eq!(param_tag(&tags[2]).comment, "- second");
        assert!(matches!(tags[3], DocTag::Return(_)));
    }

    #[test]
    fn unknown_inline_tag_stays_in_text() {
        let tags = parse(" Mail admin @home for help. ");
        assert_eq!(
            tags,
            vec![DocTag::Description("Mail admin @home for help.".to_string())]
        );
    }

    #[test]
    fn empty_comment() {
        assert!(parse("\n *\n ").is_empty());
    }
}
