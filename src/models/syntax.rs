//! Owned syntax tree for analysed Python sources
//!
//! The parser lowers tree-sitter's concrete tree into this small tagged
//! hierarchy. Only the shapes the visitors care about get their own variant;
//! everything else is kept as `Other` so traversal still reaches nested code.

/// A node of the lowered syntax tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxNode {
    /// Whole file
    Module { body: Vec<SyntaxNode> },

    /// `class Name(bases): body`
    ClassDef {
        name: String,
        decorators: Vec<SyntaxNode>,
        bases: Vec<SyntaxNode>,
        body: Vec<SyntaxNode>,
    },

    /// `def name(...): body`, including methods
    FunctionDef {
        name: String,
        decorators: Vec<SyntaxNode>,
        body: Vec<SyntaxNode>,
    },

    /// `func(args, keywords)`; `args` holds positional arguments only
    Call {
        func: Box<SyntaxNode>,
        args: Vec<SyntaxNode>,
        keywords: Vec<SyntaxNode>,
    },

    /// `value.attr`
    Attribute { value: Box<SyntaxNode>, attr: String },

    /// Bare identifier
    Name(String),

    /// Plain string constant (no f-string, no bytes)
    Str(String),

    /// Dictionary display; `None` keys are `**splat` entries
    Dict { entries: Vec<(Option<SyntaxNode>, SyntaxNode)> },

    /// `t1 = t2 = value`
    Assign {
        targets: Vec<SyntaxNode>,
        value: Box<SyntaxNode>,
    },

    /// Any other construct; children are kept in source order
    Other { kind: String, children: Vec<SyntaxNode> },
}

impl SyntaxNode {
    /// Name of the identifier, if this is one
    pub fn as_name(&self) -> Option<&str> {
        match self {
            SyntaxNode::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Value of the string constant, if this is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SyntaxNode::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Whether this node introduces a function or class scope
    pub fn is_scope(&self) -> bool {
        matches!(self, SyntaxNode::ClassDef { .. } | SyntaxNode::FunctionDef { .. })
    }

    /// Direct children in source order
    pub fn children(&self) -> Vec<&SyntaxNode> {
        match self {
            SyntaxNode::Module { body } => body.iter().collect(),
            SyntaxNode::ClassDef { decorators, bases, body, .. } => {
                decorators.iter().chain(bases).chain(body).collect()
            }
            SyntaxNode::FunctionDef { decorators, body, .. } => {
                decorators.iter().chain(body).collect()
            }
            SyntaxNode::Call { func, args, keywords } => std::iter::once(func.as_ref())
                .chain(args)
                .chain(keywords)
                .collect(),
            SyntaxNode::Attribute { value, .. } => vec![value.as_ref()],
            SyntaxNode::Dict { entries } => entries
                .iter()
                .flat_map(|(key, value)| key.iter().chain(std::iter::once(value)))
                .collect(),
            SyntaxNode::Assign { targets, value } => {
                targets.iter().chain(std::iter::once(value.as_ref())).collect()
            }
            SyntaxNode::Other { children, .. } => children.iter().collect(),
            SyntaxNode::Name(_) | SyntaxNode::Str(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_order() {
        let call = SyntaxNode::Call {
            func: Box::new(SyntaxNode::Name("f".to_string())),
            args: vec![SyntaxNode::Str("a".to_string())],
            keywords: vec![SyntaxNode::Name("k".to_string())],
        };

        let kids = call.children();
        assert_eq!(kids.len(), 3);
        assert_eq!(kids[0].as_name(), Some("f"));
        assert_eq!(kids[1].as_str(), Some("a"));
    }

    #[test]
    fn test_dict_children_skip_missing_keys() {
        let dict = SyntaxNode::Dict {
            entries: vec![
                (Some(SyntaxNode::Str("A".to_string())), SyntaxNode::Name("B".to_string())),
                (None, SyntaxNode::Name("OTHER".to_string())),
            ],
        };

        assert_eq!(dict.children().len(), 3);
    }
}
