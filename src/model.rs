//! Extracted documentation records: one [`FunctionResult`] per function.
//!
//! Field names serialize exactly as the parser/printer contracts spell them
//! (`type`, `return`, `default`), see [`crate::contract`].

use serde::{Deserialize, Serialize};

/// The declared, non-documentation shape of a function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    /// `public`, `protected`, `private`, or empty.
    pub access: String,
    /// Non-access modifiers in declaration order.
    pub modifiers: Vec<String>,
    /// Verbatim source text of each declared parameter.
    pub parameters: Vec<String>,
    /// Verbatim return type text.
    #[serde(rename = "type")]
    pub ty: String,
}

impl Signature {
    /// Reconstruct a one-line declaration, e.g. `public static int add(int a, int b)`.
    pub fn to_declaration(&self) -> String {
        let modifiers = self.modifiers.join(" ");
        let call = format!("{}({})", self.name, self.parameters.join(", "));
        [
            self.access.as_str(),
            modifiers.as_str(),
            self.ty.as_str(),
            call.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// A doc element carrying a type and free-text lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedNode {
    #[serde(rename = "type")]
    pub ty: String,
    pub content: Vec<String>,
}

/// A documented (or backfilled) parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
    pub optional: bool,
    pub default: String,
    pub content: Vec<String>,
}

/// A custom tag, e.g. `@example` or `@see`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedNode {
    pub name: String,
    pub content: Vec<String>,
}

/// Canonical documentation record for one function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionResult {
    pub description: Vec<String>,
    pub signature: Signature,
    pub param: Vec<Param>,
    #[serde(rename = "return")]
    pub returns: TypedNode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<NamedNode>,
}

impl FunctionResult {
    pub fn name(&self) -> &str {
        &self.signature.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_skips_empty_parts() {
        let sig = Signature {
            name: "create".to_string(),
            ty: "void".to_string(),
            ..Default::default()
        };
        assert_eq!(sig.to_declaration(), "void create()");
    }

    #[test]
    fn declaration_full() {
        let sig = Signature {
            name: "add".to_string(),
            access: "public".to_string(),
            modifiers: vec!["nomask".to_string(), "varargs".to_string()],
            parameters: vec!["int a".to_string(), "int b".to_string()],
            ty: "int".to_string(),
        };
        assert_eq!(
            sig.to_declaration(),
            "public nomask varargs int add(int a, int b)"
        );
    }

    #[test]
    fn serializes_contract_field_names() {
        let result = FunctionResult {
            returns: TypedNode {
                ty: "int".to_string(),
                content: vec![],
            },
            ..Default::default()
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["return"]["type"], "int");
        assert!(json.get("tags").is_none());
        assert!(json["signature"].get("type").is_some());
    }
}
