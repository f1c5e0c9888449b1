//! Display name to class name aliases from `NODE_CLASS_MAPPINGS`

use crate::core::source_tree::SourceTree;
use crate::error::{handle_error, Result, ScoutError};
use crate::models::inference::AliasTable;
use crate::models::syntax::SyntaxNode;
use crate::parsers::python::PythonParser;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Registration table name, also used as pre-parse marker
pub const MAPPINGS_MARKER: &str = "NODE_CLASS_MAPPINGS";

/// Builds the alias table for a source tree
pub struct ClassMappingLoader<'a> {
    parser: &'a PythonParser,
}

impl<'a> ClassMappingLoader<'a> {
    pub fn new(parser: &'a PythonParser) -> Self {
        Self { parser }
    }

    /// Collect aliases from every Python file under `root`
    ///
    /// Files are read in sorted order; a display name registered twice keeps
    /// the last registration. Unreadable or malformed files are skipped.
    pub fn load(&self, tree: &SourceTree) -> Result<AliasTable> {
        let mut table = AliasTable::new();
        let files = tree.python_files(false)?;

        for path in &files {
            match self.load_file(path) {
                Ok(entries) => {
                    for (display_name, class_name) in entries {
                        table.insert(display_name, class_name);
                    }
                }
                Err(err) => {
                    if let Some(fatal) = handle_error(err) {
                        return Err(fatal);
                    }
                }
            }
        }

        info!("Loaded {} node class aliases from {} files", table.len(), files.len());
        Ok(table)
    }

    /// Alias entries registered in one file, in source order
    pub fn load_file(&self, path: &Path) -> Result<Vec<(String, String)>> {
        let source = fs::read_to_string(path).map_err(|e| ScoutError::read_error(path, e))?;
        if !source.contains(MAPPINGS_MARKER) {
            return Ok(Vec::new());
        }

        let module = self.parser.parse(path, &source)?;
        let entries = mapping_entries(&module);
        debug!("{}: {} class mappings", path.display(), entries.len());
        Ok(entries)
    }
}

/// `"Key": Identifier` pairs of module-level `NODE_CLASS_MAPPINGS = {...}`
pub fn mapping_entries(module: &SyntaxNode) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    collect_entries(module, &mut entries);
    entries
}

fn collect_entries(node: &SyntaxNode, entries: &mut Vec<(String, String)>) {
    match node {
        SyntaxNode::Assign { targets, value } => {
            let is_mapping = targets.len() == 1 && targets[0].as_name() == Some(MAPPINGS_MARKER);
            if let (true, SyntaxNode::Dict { entries: pairs }) = (is_mapping, value.as_ref()) {
                entries.extend(pairs.iter().filter_map(|(key, value)| {
                    let key = key.as_ref()?.as_str()?;
                    let class_name = value.as_name()?;
                    Some((key.to_string(), class_name.to_string()))
                }));
            }
        }
        // Function and class bodies are not module level
        node if node.is_scope() => {}
        node => {
            for child in node.children() {
                collect_entries(child, entries);
            }
        }
    }
}
