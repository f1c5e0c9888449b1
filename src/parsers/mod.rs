//! Parsing functionality for node pack sources
//!
//! This module provides the Python parser, the folder requirement visitor
//! and the `NODE_CLASS_MAPPINGS` alias loader.

pub mod class_mappings;
pub mod python;
pub mod source_visitor;

pub use class_mappings::ClassMappingLoader;
pub use python::PythonParser;
pub use source_visitor::{FolderVisitor, SourceAnalyzer};
