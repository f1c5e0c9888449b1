//! Python parser wrapper using tree-sitter
//!
//! Sources are parsed with tree-sitter and lowered right away into the owned
//! [`SyntaxNode`] tree, so no tree-sitter lifetimes leak out of this module.

use crate::error::{Result, ScoutError};
use crate::models::syntax::SyntaxNode;
use parking_lot::Mutex;
use std::path::Path;
use tree_sitter::{Node, Parser};

/// Deepest syntax tree accepted; lowering and every visitor recurse per level
pub const MAX_NESTING_DEPTH: usize = 200;

/// Thread-safe pool of tree-sitter parsers for reuse across files
pub struct ParserPool {
    parsers: Mutex<Vec<Parser>>,
}

impl ParserPool {
    /// Create a pool holding `size` ready parsers
    pub fn new(size: usize) -> Result<Self> {
        let mut parsers = Vec::with_capacity(size);
        for _ in 0..size {
            parsers.push(new_parser()?);
        }
        Ok(Self {
            parsers: Mutex::new(parsers),
        })
    }

    /// Take a parser from the pool, creating one if the pool is drained
    pub fn take(&self) -> Result<Parser> {
        match self.parsers.lock().pop() {
            Some(parser) => Ok(parser),
            None => new_parser(),
        }
    }

    /// Return a parser to the pool
    pub fn return_parser(&self, parser: Parser) {
        self.parsers.lock().push(parser);
    }
}

fn new_parser() -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ScoutError::ParserSetup {
            message: format!("python: {}", e),
        })?;
    Ok(parser)
}

/// Python source parser producing owned syntax trees
pub struct PythonParser {
    pool: ParserPool,
}

impl PythonParser {
    /// Create a parser with one pooled tree-sitter parser per hardware thread
    pub fn new() -> Result<Self> {
        Ok(Self {
            pool: ParserPool::new(num_cpus::get())?,
        })
    }

    /// Parse `source` (read from `path`) into a syntax tree
    ///
    /// Any syntax error in the file fails the whole parse.
    pub fn parse(&self, path: &Path, source: &str) -> Result<SyntaxNode> {
        let mut parser = self.pool.take()?;
        let tree = parser.parse(source, None);
        self.pool.return_parser(parser);

        let tree = tree.ok_or_else(|| ScoutError::syntax_error(path, "parser produced no tree"))?;
        let root = tree.root_node();

        if exceeds_depth(root, MAX_NESTING_DEPTH) {
            return Err(ScoutError::syntax_error(
                path,
                format!("nesting deeper than {} levels", MAX_NESTING_DEPTH),
            ));
        }

        if root.has_error() {
            let row = first_error_row(root).unwrap_or(root.start_position().row);
            return Err(ScoutError::syntax_error(
                path,
                format!("invalid syntax near line {}", row + 1),
            ));
        }

        Ok(lower(root, source.as_bytes()))
    }
}

/// Whether any node lies more than `limit` levels below `root`
///
/// Walks with a cursor so arbitrarily deep trees never touch the call stack.
fn exceeds_depth(root: Node, limit: usize) -> bool {
    let mut cursor = root.walk();
    let mut depth = 0usize;
    loop {
        if cursor.goto_first_child() {
            depth += 1;
            if depth > limit {
                return true;
            }
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return false;
            }
            depth -= 1;
        }
    }
}

fn first_error_row(node: Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error_row)
}

fn node_text<'a>(node: Node, src: &'a [u8]) -> &'a str {
    node.utf8_text(src).unwrap_or("")
}

fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

fn lower_all(nodes: Vec<Node>, src: &[u8]) -> Vec<SyntaxNode> {
    nodes.into_iter().map(|n| lower(n, src)).collect()
}

fn other(node: Node, src: &[u8]) -> SyntaxNode {
    SyntaxNode::Other {
        kind: node.kind().to_string(),
        children: lower_all(named_children(node), src),
    }
}

fn block(node: Node, field: &str, src: &[u8]) -> Vec<SyntaxNode> {
    node.child_by_field_name(field)
        .map(|body| lower_all(named_children(body), src))
        .unwrap_or_default()
}

/// Lower a tree-sitter node into the owned syntax tree
fn lower(node: Node, src: &[u8]) -> SyntaxNode {
    match node.kind() {
        "module" => SyntaxNode::Module {
            body: lower_all(named_children(node), src),
        },
        "class_definition" => lower_class(node, src, Vec::new()),
        "function_definition" => lower_function(node, src, Vec::new()),
        "decorated_definition" => {
            let decorators = named_children(node)
                .into_iter()
                .filter(|child| child.kind() == "decorator")
                .filter_map(|decorator| named_children(decorator).into_iter().next())
                .map(|expr| lower(expr, src))
                .collect();
            match node.child_by_field_name("definition") {
                Some(def) if def.kind() == "class_definition" => lower_class(def, src, decorators),
                Some(def) if def.kind() == "function_definition" => lower_function(def, src, decorators),
                _ => other(node, src),
            }
        }
        "call" => lower_call(node, src),
        "attribute" => match (node.child_by_field_name("object"), node.child_by_field_name("attribute")) {
            (Some(object), Some(attr)) => SyntaxNode::Attribute {
                value: Box::new(lower(object, src)),
                attr: node_text(attr, src).to_string(),
            },
            _ => other(node, src),
        },
        "identifier" => SyntaxNode::Name(node_text(node, src).to_string()),
        "string" => match string_constant(node, src) {
            Some(value) => SyntaxNode::Str(value),
            None => other(node, src),
        },
        "concatenated_string" => {
            let parts: Option<Vec<String>> = named_children(node)
                .into_iter()
                .map(|part| string_constant(part, src))
                .collect();
            match parts {
                Some(parts) => SyntaxNode::Str(parts.concat()),
                None => other(node, src),
            }
        }
        "dictionary" => SyntaxNode::Dict {
            entries: named_children(node)
                .into_iter()
                .filter_map(|entry| match entry.kind() {
                    "pair" => {
                        let key = entry.child_by_field_name("key")?;
                        let value = entry.child_by_field_name("value")?;
                        Some((Some(lower(key, src)), lower(value, src)))
                    }
                    "dictionary_splat" => named_children(entry)
                        .into_iter()
                        .next()
                        .map(|inner| (None, lower(inner, src))),
                    _ => None,
                })
                .collect(),
        },
        "expression_statement" | "parenthesized_expression" => {
            let mut children = named_children(node);
            if children.len() == 1 {
                lower(children.remove(0), src)
            } else {
                other(node, src)
            }
        }
        "assignment" => lower_assignment(node, src),
        _ => other(node, src),
    }
}

fn lower_class(node: Node, src: &[u8], decorators: Vec<SyntaxNode>) -> SyntaxNode {
    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(n, src).to_string())
        .unwrap_or_default();
    let bases = node
        .child_by_field_name("superclasses")
        .map(|args| lower_all(named_children(args), src))
        .unwrap_or_default();

    SyntaxNode::ClassDef {
        name,
        decorators,
        bases,
        body: block(node, "body", src),
    }
}

fn lower_function(node: Node, src: &[u8], decorators: Vec<SyntaxNode>) -> SyntaxNode {
    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(n, src).to_string())
        .unwrap_or_default();

    // Defaults in the parameter list may hold calls too
    let mut body: Vec<SyntaxNode> = node
        .child_by_field_name("parameters")
        .map(|params| vec![other(params, src)])
        .unwrap_or_default();
    body.extend(block(node, "body", src));

    SyntaxNode::FunctionDef { name, decorators, body }
}

fn lower_call(node: Node, src: &[u8]) -> SyntaxNode {
    let Some(function) = node.child_by_field_name("function") else {
        return other(node, src);
    };

    let mut args = Vec::new();
    let mut keywords = Vec::new();
    if let Some(arguments) = node.child_by_field_name("arguments") {
        if arguments.kind() == "argument_list" {
            for arg in named_children(arguments) {
                match arg.kind() {
                    "keyword_argument" | "list_splat" | "dictionary_splat" => keywords.push(lower(arg, src)),
                    _ => args.push(lower(arg, src)),
                }
            }
        } else {
            // bare generator argument: f(x for x in y)
            args.push(lower(arguments, src));
        }
    }

    SyntaxNode::Call {
        func: Box::new(lower(function, src)),
        args,
        keywords,
    }
}

fn lower_assignment(node: Node, src: &[u8]) -> SyntaxNode {
    // Annotated and bare-annotation forms are not plain assignments
    if node.child_by_field_name("type").is_some() || node.child_by_field_name("right").is_none() {
        return SyntaxNode::Other {
            kind: "annotated_assignment".to_string(),
            children: lower_all(named_children(node), src),
        };
    }

    let mut targets = Vec::new();
    let mut current = node;
    loop {
        if let Some(left) = current.child_by_field_name("left") {
            targets.push(lower(left, src));
        }
        match current.child_by_field_name("right") {
            Some(right) if right.kind() == "assignment" && right.child_by_field_name("type").is_none() => {
                current = right;
            }
            Some(right) => {
                return SyntaxNode::Assign {
                    targets,
                    value: Box::new(lower(right, src)),
                };
            }
            None => return other(node, src),
        }
    }
}

/// Value of a plain string literal; `None` for f-strings and bytes
fn string_constant(node: Node, src: &[u8]) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    if named_children(node).iter().any(|child| child.kind() == "interpolation") {
        return None;
    }

    let text = node_text(node, src);
    let quote_at = text.find(|c: char| c == '"' || c == '\'')?;
    let prefix = text[..quote_at].to_ascii_lowercase();
    if prefix.contains('f') || prefix.contains('b') {
        return None;
    }

    let literal = &text[quote_at..];
    let delimiter = if literal.starts_with("\"\"\"") || literal.starts_with("'''") { 3 } else { 1 };
    if literal.len() < delimiter * 2 {
        return None;
    }
    let body = &literal[delimiter..literal.len() - delimiter];

    if prefix.contains('r') {
        Some(body.to_string())
    } else {
        Some(unescape(body))
    }
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('\n') => {}
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
