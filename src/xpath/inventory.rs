//! Names the XPath 1.0 grammar and XSLT 1.0 reserve
//!
//! Only these names can be rejected by the filter; anything else (custom
//! or prefixed extension functions) is left to the evaluating engine.

use std::fmt;

/// XPath axis types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XPathAxis {
    /// child:: axis (default)
    Child,
    /// descendant:: axis
    Descendant,
    /// descendant-or-self:: axis
    DescendantOrSelf,
    /// self:: axis
    Self_,
    /// parent:: axis
    Parent,
    /// ancestor:: axis
    Ancestor,
    /// ancestor-or-self:: axis
    AncestorOrSelf,
    /// following-sibling:: axis
    FollowingSibling,
    /// preceding-sibling:: axis
    PrecedingSibling,
    /// following:: axis
    Following,
    /// preceding:: axis
    Preceding,
    /// attribute:: axis
    Attribute,
    /// namespace:: axis
    Namespace,
}

impl XPathAxis {
    /// Every axis
    pub const ALL: [XPathAxis; 13] = [
        Self::Child,
        Self::Descendant,
        Self::DescendantOrSelf,
        Self::Self_,
        Self::Parent,
        Self::Ancestor,
        Self::AncestorOrSelf,
        Self::FollowingSibling,
        Self::PrecedingSibling,
        Self::Following,
        Self::Preceding,
        Self::Attribute,
        Self::Namespace,
    ];

    /// Parse axis from string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "child" => Some(Self::Child),
            "descendant" => Some(Self::Descendant),
            "descendant-or-self" => Some(Self::DescendantOrSelf),
            "self" => Some(Self::Self_),
            "parent" => Some(Self::Parent),
            "ancestor" => Some(Self::Ancestor),
            "ancestor-or-self" => Some(Self::AncestorOrSelf),
            "following-sibling" => Some(Self::FollowingSibling),
            "preceding-sibling" => Some(Self::PrecedingSibling),
            "following" => Some(Self::Following),
            "preceding" => Some(Self::Preceding),
            "attribute" => Some(Self::Attribute),
            "namespace" => Some(Self::Namespace),
            _ => None,
        }
    }

    /// The axis name as written before `::`
    pub fn name(&self) -> &'static str {
        match self {
            Self::Child => "child",
            Self::Descendant => "descendant",
            Self::DescendantOrSelf => "descendant-or-self",
            Self::Self_ => "self",
            Self::Parent => "parent",
            Self::Ancestor => "ancestor",
            Self::AncestorOrSelf => "ancestor-or-self",
            Self::FollowingSibling => "following-sibling",
            Self::PrecedingSibling => "preceding-sibling",
            Self::Following => "following",
            Self::Preceding => "preceding",
            Self::Attribute => "attribute",
            Self::Namespace => "namespace",
        }
    }
}

impl fmt::Display for XPathAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// XPath 1.0 core function library
pub const CORE_FUNCTIONS: [&str; 27] = [
    // Node-set
    "last",
    "position",
    "count",
    "id",
    "local-name",
    "namespace-uri",
    "name",
    // String
    "string",
    "concat",
    "starts-with",
    "contains",
    "substring-before",
    "substring-after",
    "substring",
    "string-length",
    "normalize-space",
    "translate",
    // Boolean
    "boolean",
    "not",
    "true",
    "false",
    "lang",
    // Number
    "number",
    "sum",
    "floor",
    "ceiling",
    "round",
];

/// Functions XSLT 1.0 adds to the core library
pub const XSLT_FUNCTIONS: [&str; 9] = [
    "document",
    "key",
    "format-number",
    "current",
    "unparsed-entity-uri",
    "generate-id",
    "system-property",
    "element-available",
    "function-available",
];

/// Node type tests; written like calls but not functions
pub const NODE_TYPE_TESTS: [&str; 4] = ["node", "text", "comment", "processing-instruction"];

/// Check if a name is an XPath axis
pub fn is_axis(name: &str) -> bool {
    XPathAxis::parse(name).is_some()
}

/// Check if a name is a core XPath or XSLT function
pub fn is_function(name: &str) -> bool {
    CORE_FUNCTIONS.contains(&name) || XSLT_FUNCTIONS.contains(&name)
}
