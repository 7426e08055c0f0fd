//! Function node contract consumed by the extractor.
//!
//! A front end (the scanner in [`crate::parser`] or a host's own LPC parser)
//! produces one [`FunctionDecl`] per function definition. Doc tags are
//! classified once, when the comment is parsed, into [`DocTag`].

/// A parsed function declaration with its attached doc comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    /// Declared modifiers in source order, access modifiers included.
    pub modifiers: Vec<String>,
    pub parameters: Vec<ParamDecl>,
    /// Declared return type text, e.g. `int` or `string *`.
    pub return_type: Option<String>,
    /// Doc tags in comment order.
    pub tags: Vec<DocTag>,
}

/// One declared parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamDecl {
    pub name: String,
    pub ty: Option<String>,
    /// Default-value expression text.
    pub default: Option<String>,
    /// Verbatim source text of the whole parameter.
    pub text: String,
}

/// A documentation tag, classified by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocTag {
    /// Free description text; may span several lines joined with `\n`.
    Description(String),
    Param(ParamTag),
    Return(ReturnTag),
    /// Any tag without a dedicated shape (`@example`, `@see`, ...).
    Custom(CustomTag),
}

/// `@param {type} name comment` or `@param {type} [name=default] comment`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamTag {
    pub name: String,
    pub ty: Option<String>,
    pub comment: String,
    /// Set when the name was written in brackets.
    pub optional: bool,
    pub default: Option<String>,
}

/// `@return {type} comment`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnTag {
    pub ty: Option<String>,
    pub comment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomTag {
    pub name: String,
    pub content: Vec<String>,
}
