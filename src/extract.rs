//! Reconcile a function's declaration with its doc tags.
//!
//! Doc tags are read first, into a name-keyed map that keeps insertion order.
//! The declared parameter list then backfills whatever the comment left out,
//! so every declared parameter ends up documented exactly once.

use crate::ast::{DocTag, FunctionDecl, ParamDecl, ParamTag, ReturnTag};
use crate::model::{FunctionResult, NamedNode, Param, Signature, TypedNode};
use indexmap::IndexMap;

/// Access modifiers, in precedence order.
const ACCESS_MODIFIERS: &[&str] = &["public", "protected", "private"];

/// Build the canonical record for one function declaration.
pub fn extract(decl: &FunctionDecl) -> FunctionResult {
    let signature = build_signature(decl);

    let mut description: Vec<String> = Vec::new();
    let mut params: IndexMap<String, Param> = IndexMap::new();
    let mut returns: Option<TypedNode> = None;
    let mut tags: Vec<NamedNode> = Vec::new();

    for tag in &decl.tags {
        match tag {
            DocTag::Description(text) => description.push(text.clone()),
            DocTag::Param(p) => {
                // IndexMap::insert keeps the existing slot on replacement.
                params.insert(p.name.clone(), param_from_tag(p));
            }
            DocTag::Return(r) => {
                if returns.is_none() {
                    returns = Some(return_from_tag(r));
                }
            }
            DocTag::Custom(c) => tags.push(NamedNode {
                name: c.name.clone(),
                content: c.content.clone(),
            }),
        }
    }

    for declared in &decl.parameters {
        backfill_param(&mut params, declared);
    }

    let mut returns = returns.unwrap_or_default();
    if returns.ty.is_empty() {
        returns.ty = decl.return_type.clone().unwrap_or_default();
    }

    FunctionResult {
        description,
        signature,
        param: params.into_values().collect(),
        returns,
        tags,
    }
}

fn build_signature(decl: &FunctionDecl) -> Signature {
    let access = ACCESS_MODIFIERS
        .iter()
        .find(|access| decl.modifiers.iter().any(|m| m == *access))
        .map(|access| access.to_string())
        .unwrap_or_default();

    let modifiers = decl
        .modifiers
        .iter()
        .filter(|m| !ACCESS_MODIFIERS.contains(&m.as_str()))
        .cloned()
        .collect();

    Signature {
        name: decl.name.clone(),
        access,
        modifiers,
        parameters: decl.parameters.iter().map(|p| p.text.clone()).collect(),
        ty: decl.return_type.clone().unwrap_or_default(),
    }
}

fn param_from_tag(tag: &ParamTag) -> Param {
    Param {
        ty: tag.ty.clone().unwrap_or_default(),
        name: tag.name.clone(),
        optional: tag.optional,
        default: tag.default.clone().unwrap_or_default(),
        content: comment_content(&tag.comment),
    }
}

fn return_from_tag(tag: &ReturnTag) -> TypedNode {
    TypedNode {
        ty: tag.ty.clone().unwrap_or_default(),
        content: comment_content(&tag.comment),
    }
}

/// Fill a parameter from its declaration. Values already taken from the
/// doc comment are never overwritten.
fn backfill_param(params: &mut IndexMap<String, Param>, declared: &ParamDecl) {
    let param = params
        .entry(declared.name.clone())
        .or_insert_with(|| Param {
            name: declared.name.clone(),
            ..Default::default()
        });

    if param.ty.is_empty() {
        if let Some(ty) = &declared.ty {
            param.ty = ty.clone();
        }
    }
    if param.default.is_empty() {
        if let Some(default) = &declared.default {
            param.default = default.clone();
        }
    }
}

/// `"  - the input value "` → `["the input value"]`; blank → `[]`.
fn comment_content(comment: &str) -> Vec<String> {
    let text = strip_leading_dashes(comment);
    if text.is_empty() {
        Vec::new()
    } else {
        vec![text.to_string()]
    }
}

fn strip_leading_dashes(text: &str) -> &str {
    text.trim().trim_start_matches('-').trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CustomTag;

    fn declared(name: &str, ty: &str) -> ParamDecl {
        ParamDecl {
            name: name.to_string(),
            ty: Some(ty.to_string()),
            default: None,
            text: format!("{} {}", ty, name),
        }
    }

    fn param_tag(name: &str, comment: &str) -> DocTag {
        DocTag::Param(ParamTag {
            name: name.to_string(),
            comment: comment.to_string(),
            ..Default::default()
        })
    }

    fn add_decl() -> FunctionDecl {
        FunctionDecl {
            name: "add".to_string(),
            modifiers: vec![],
            parameters: vec![declared("a", "int"), declared("b", "int")],
            return_type: Some("int".to_string()),
            tags: vec![
                DocTag::Description("Adds two numbers.".to_string()),
                param_tag("a", "- first"),
                param_tag("b", "- second"),
                DocTag::Return(ReturnTag {
                    ty: None,
                    comment: "- sum".to_string(),
                }),
            ],
        }
    }

    #[test]
    fn add_two_numbers() {
        let result = extract(&add_decl());
        assert_eq!(result.description, vec!["Adds two numbers."]);
        assert_eq!(
            result.param,
            vec![
                Param {
                    ty: "int".to_string(),
                    name: "a".to_string(),
                    optional: false,
                    default: String::new(),
                    content: vec!["first".to_string()],
                },
                Param {
                    ty: "int".to_string(),
                    name: "b".to_string(),
                    optional: false,
                    default: String::new(),
                    content: vec!["second".to_string()],
                },
            ]
        );
        assert_eq!(result.returns.ty, "int");
        assert_eq!(result.returns.content, vec!["sum"]);
        assert!(result.tags.is_empty());
        assert_eq!(result.signature.parameters, vec!["int a", "int b"]);
    }

    #[test]
    fn undocumented_param_is_backfilled() {
        let mut decl = add_decl();
        decl.parameters.push(declared("c", "string"));
        let result = extract(&decl);
        let c = result.param.iter().find(|p| p.name == "c").unwrap();
        assert_eq!(c.ty, "string");
        assert!(c.content.is_empty());
        assert!(!c.optional);
    }

    #[test]
    fn no_tags_still_well_formed() {
        let mut decl = add_decl();
        decl.tags.clear();
        let result = extract(&decl);
        assert!(result.description.is_empty());
        assert!(result.returns.content.is_empty());
        assert_eq!(result.returns.ty, "int");
        let names: Vec<_> = result.param.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn one_entry_per_name() {
        let mut decl = add_decl();
        decl.tags.push(param_tag("a", "again"));
        let result = extract(&decl);
        assert_eq!(result.param.len(), 2);
        assert_eq!(result.param[0].name, "a");
        assert_eq!(result.param[0].content, vec!["again"]);
    }

    #[test]
    fn tags_first_then_declaration_order() {
        let mut decl = add_decl();
        decl.tags = vec![param_tag("b", "second")];
        let result = extract(&decl);
        let names: Vec<_> = result.param.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn return_tag_type_wins() {
        let mut decl = add_decl();
        decl.tags = vec![DocTag::Return(ReturnTag {
            ty: Some("float".to_string()),
            comment: String::new(),
        })];
        assert_eq!(extract(&decl).returns.ty, "float");
    }

    #[test]
    fn missing_return_type_is_empty() {
        let mut decl = add_decl();
        decl.return_type = None;
        decl.tags.clear();
        assert_eq!(extract(&decl).returns.ty, "");
    }

    #[test]
    fn first_return_tag_kept() {
        let mut decl = add_decl();
        decl.tags.push(DocTag::Return(ReturnTag {
            ty: Some("string".to_string()),
            comment: "ignored".to_string(),
        }));
        let result = extract(&decl);
        assert_eq!(result.returns.ty, "int");
        assert_eq!(result.returns.content, vec!["sum"]);
    }

    #[test]
    fn param_then_return_processed_independently() {
        let mut decl = add_decl();
        decl.tags = vec![
            param_tag("a", "first"),
            DocTag::Return(ReturnTag {
                ty: None,
                comment: "total".to_string(),
            }),
        ];
        let result = extract(&decl);
        assert_eq!(result.param[0].content, vec!["first"]);
        assert_eq!(result.returns.content, vec!["total"]);
    }

    #[test]
    fn descriptions_are_concatenated() {
        let mut decl = add_decl();
        decl.tags = vec![
            DocTag::Description("First.".to_string()),
            DocTag::Description("Second.".to_string()),
        ];
        assert_eq!(extract(&decl).description, vec!["First.", "Second."]);
    }

    #[test]
    fn doc_values_take_precedence_over_declaration() {
        let mut decl = add_decl();
        decl.parameters[0].default = Some("1".to_string());
        decl.parameters[1].default = Some("2".to_string());
        decl.tags = vec![DocTag::Param(ParamTag {
            name: "a".to_string(),
            ty: Some("mixed".to_string()),
            comment: String::new(),
            optional: true,
            default: Some("5".to_string()),
        })];
        let result = extract(&decl);
        assert_eq!(result.param[0].ty, "mixed");
        assert_eq!(result.param[0].default, "5");
        assert!(result.param[0].optional);
        assert_eq!(result.param[1].default, "2");
    }

    #[test]
    fn access_precedence_and_modifier_filtering() {
        let decl = FunctionDecl {
            name: "f".to_string(),
            modifiers: vec![
                "private".to_string(),
                "nomask".to_string(),
                "public".to_string(),
                "varargs".to_string(),
            ],
            ..Default::default()
        };
        let result = extract(&decl);
        assert_eq!(result.signature.access, "public");
        assert_eq!(result.signature.modifiers, vec!["nomask", "varargs"]);
    }

    #[test]
    fn custom_tags_keep_raw_content_and_duplicates() {
        let mut decl = add_decl();
        decl.tags = vec![
            DocTag::Custom(CustomTag {
                name: "see".to_string(),
                content: vec!["- other".to_string()],
            }),
            param_tag("a", "first"),
            DocTag::Custom(CustomTag {
                name: "see".to_string(),
                content: vec!["more".to_string()],
            }),
        ];
        let result = extract(&decl);
        assert_eq!(result.tags.len(), 2);
        assert_eq!(result.tags[0].content, vec!["- other"]);
        assert_eq!(result.tags[1].content, vec!["more"]);
    }

    #[test]
    fn dash_run_is_stripped() {
        assert_eq!(strip_leading_dashes("  -- the input value "), "the input value");
        assert_eq!(strip_leading_dashes("no dash - here"), "no dash - here");
        assert!(comment_content("  -  ").is_empty());
    }
}
