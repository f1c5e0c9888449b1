//! Folder requirement extraction from node class definitions
//!
//! Node classes declare the model folders they load from by calling
//! `folder_paths.get_filename_list("<folder>")`, usually inside their
//! `INPUT_TYPES` classmethod. The visitor records each such literal against
//! the innermost enclosing class.

use crate::error::{Result, ScoutError};
use crate::models::inference::ClassFolderMap;
use crate::models::syntax::SyntaxNode;
use crate::parsers::python::PythonParser;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Module providing folder lookups
pub const FOLDER_NAMESPACE: &str = "folder_paths";

/// Accessor whose first argument names a folder; also the pre-parse marker
pub const FOLDER_ACCESSOR: &str = "get_filename_list";

/// Collects folder requirements per class from one syntax tree
#[derive(Debug, Default)]
pub struct FolderVisitor {
    found: ClassFolderMap,
}

impl FolderVisitor {
    /// Class name to folder set for every class with at least one match
    pub fn collect(module: &SyntaxNode) -> ClassFolderMap {
        let mut visitor = Self::default();
        visitor.visit(module, None);
        visitor.found
    }

    fn visit(&mut self, node: &SyntaxNode, current_class: Option<&str>) {
        match node {
            SyntaxNode::ClassDef { name, decorators, bases, body } => {
                for outer in decorators.iter().chain(bases) {
                    self.visit(outer, current_class);
                }
                for stmt in body {
                    self.visit(stmt, Some(name.as_str()));
                }
            }
            SyntaxNode::Call { .. } => {
                if let (Some(class_name), Some(folder)) = (current_class, folder_literal(node)) {
                    debug!("class {} requires folder {}", class_name, folder);
                    self.found
                        .entry(class_name.to_string())
                        .or_default()
                        .insert(folder.to_string());
                }
                for child in node.children() {
                    self.visit(child, current_class);
                }
            }
            _ => {
                for child in node.children() {
                    self.visit(child, current_class);
                }
            }
        }
    }
}

/// Folder literal of a `folder_paths.get_filename_list("...")` call
///
/// An empty literal names no folder.
pub fn folder_literal(call: &SyntaxNode) -> Option<&str> {
    let SyntaxNode::Call { func, args, .. } = call else {
        return None;
    };
    let SyntaxNode::Attribute { value, attr } = func.as_ref() else {
        return None;
    };
    if attr != FOLDER_ACCESSOR || value.as_name() != Some(FOLDER_NAMESPACE) {
        return None;
    }
    args.first().and_then(SyntaxNode::as_str).filter(|folder| !folder.is_empty())
}

/// Reads, filters and analyses single source files
pub struct SourceAnalyzer<'a> {
    parser: &'a PythonParser,
}

impl<'a> SourceAnalyzer<'a> {
    pub fn new(parser: &'a PythonParser) -> Self {
        Self { parser }
    }

    /// Folder requirements declared in one file
    ///
    /// Files that never mention the accessor are not parsed at all.
    pub fn analyze_file(&self, path: &Path) -> Result<ClassFolderMap> {
        let source = fs::read_to_string(path).map_err(|e| ScoutError::read_error(path, e))?;
        self.analyze_source(path, &source)
    }

    /// Folder requirements declared in already loaded source text
    pub fn analyze_source(&self, path: &Path, source: &str) -> Result<ClassFolderMap> {
        if !source.contains(FOLDER_ACCESSOR) {
            return Ok(ClassFolderMap::new());
        }
        let module = self.parser.parse(path, source)?;
        Ok(FolderVisitor::collect(&module))
    }
}
