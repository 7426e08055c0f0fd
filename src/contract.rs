//! Producer/consumer contracts and the JSON hand-off of extracted records.
//!
//! A host that wires the extractor to a printer can check the hand-off
//! against these schemas; nothing in this crate validates them.

use crate::model::FunctionResult;
use serde::Serialize;

/// Shape the extractor provides.
pub const PARSER_CONTRACT: &str = r#"
provides:
  type: object
  properties:
    functions:
      type: array
      items:
        type: object
        properties:
          name:
            type: string
          description:
            type: array
            items:
              type: string
          param:
            type: array
            items:
              type: object
              properties:
                type:
                  type: string
                name:
                  type: string
                optional:
                  type: boolean
                default:
                  type: string
                content:
                  type: array
                  items:
                    type: string
          return:
            type: object
            properties:
              type:
                type: string
              content:
                type: array
                items:
                  type: string
          tags:
            type: array
            items:
              type: object
              properties:
                name:
                  type: string
                content:
                  type: array
                  items:
                    type: string
"#;

/// Shape the Markdown printer accepts.
pub const PRINTER_CONTRACT: &str = r#"
accepts:
  type: object
  required:
    - functions
  properties:
    functions:
      type: array
      items:
        type: object
        required:
          - name
        properties:
          name:
            type: string
          description:
            type: array
            items:
              type: string
          param:
            type: array
            items:
              type: object
              required:
                - name
                - type
              properties:
                type:
                  type: string
                name:
                  type: string
                optional:
                  type: boolean
                default:
                  type: string
                content:
                  type: array
                  items:
                    type: string
          return:
            type: object
            required:
              - type
            properties:
              type:
                type: string
              content:
                type: array
                items:
                  type: string
          tags:
            type: array
            items:
              type: object
              required:
                - name
              properties:
                name:
                  type: string
                content:
                  type: array
                  items:
                    type: string
"#;

/// `{ "functions": [...] }` with each function's name next to its record.
#[derive(Debug, Serialize)]
pub struct ModuleContract<'a> {
    pub functions: Vec<ContractFunction<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ContractFunction<'a> {
    pub name: &'a str,
    #[serde(flatten)]
    pub result: &'a FunctionResult,
}

impl<'a> ModuleContract<'a> {
    pub fn new(functions: &'a [FunctionResult]) -> Self {
        Self {
            functions: functions
                .iter()
                .map(|result| ContractFunction {
                    name: result.name(),
                    result,
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
