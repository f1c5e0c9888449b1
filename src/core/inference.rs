//! Model path inference
//!
//! Combines the alias table, the scanned class folders and the filename
//! heuristic into a storage path for every model of a manifest.

use crate::core::heuristic::guess_folder;
use crate::core::scanner::{
    ConcurrentTreeScanner, ProgressUpdate, DEFAULT_MAX_WORKERS, DEFAULT_WORKER_MULTIPLIER,
};
use crate::core::source_tree::SourceTree;
use crate::error::{Result, ScoutError};
use crate::models::inference::{
    AliasTable, ClassFolderMap, FolderSource, InferenceReport, ModelRecord, NodeInfo, ScanReport,
};
use crate::models::manifest::InferenceRequest;
use crate::parsers::class_mappings::ClassMappingLoader;
use crate::parsers::python::PythonParser;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Infers storage paths for the models of a manifest
pub struct ModelPathInference {
    parser: PythonParser,
    tree: SourceTree,
    max_workers: usize,
    worker_multiplier: usize,
}

impl ModelPathInference {
    /// Inference over the node packs installed under `tree`
    pub fn new(tree: SourceTree) -> Result<Self> {
        Ok(Self {
            parser: PythonParser::new()?,
            tree,
            max_workers: DEFAULT_MAX_WORKERS,
            worker_multiplier: DEFAULT_WORKER_MULTIPLIER,
        })
    }

    /// Override the scanner pool sizing
    pub fn with_workers(mut self, max_workers: usize, worker_multiplier: usize) -> Self {
        self.max_workers = max_workers;
        self.worker_multiplier = worker_multiplier;
        self
    }

    pub fn source_tree(&self) -> &SourceTree {
        &self.tree
    }

    /// Resolve every model of `request`
    pub fn infer(&self, request: &InferenceRequest) -> Result<InferenceReport> {
        self.infer_with_progress(request, |_| {})
    }

    /// Resolve every model, reporting scan progress per file
    pub fn infer_with_progress<P>(&self, request: &InferenceRequest, progress_callback: P) -> Result<InferenceReport>
    where
        P: Fn(ProgressUpdate) + Send + Sync,
    {
        let mut records = collect_records(request)?;

        let (aliases, scan) = if self.tree.root().is_dir() {
            let aliases = ClassMappingLoader::new(&self.parser).load(&self.tree)?;
            let required = required_classes(&records, &aliases);
            debug!("Required classes: {:?}", required);

            let scanner = ConcurrentTreeScanner::new(&self.parser, self.max_workers, self.worker_multiplier)?;
            let scan = scanner.scan_with_progress(&self.tree, &required, progress_callback)?;
            (aliases, scan)
        } else {
            warn!(
                "Custom nodes directory {} not found; using filename heuristics only",
                self.tree.root().display()
            );
            (AliasTable::new(), ScanReport::default())
        };

        for record in &mut records {
            resolve_record(record, &aliases, &scan.class_folders);
        }

        let report = InferenceReport { models: records };
        info!(
            "Resolved {}/{} models ({} from class definitions, {} from filenames)",
            report.resolved_count(),
            report.models.len(),
            report.count_by_source(FolderSource::FoundInClassDefinition),
            report.count_by_source(FolderSource::GuessedFromFilename)
        );
        Ok(report)
    }
}

/// One record per distinct filename, in order of first appearance
///
/// A model requested by no node type is rejected.
pub fn collect_records(request: &InferenceRequest) -> Result<Vec<ModelRecord>> {
    let mut records: Vec<ModelRecord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for model in &request.models {
        if model.needed_by.is_empty() {
            return Err(ScoutError::invalid_manifest(format!(
                "model '{}' is not needed by any node",
                model.filename
            )));
        }

        match index.get(&model.filename) {
            Some(&i) => {
                let record = &mut records[i];
                for node_type in &model.needed_by {
                    if !record.required_by.contains(node_type) {
                        record.required_by.push(node_type.clone());
                    }
                }
            }
            None => {
                let mut required_by: Vec<String> = Vec::with_capacity(model.needed_by.len());
                for node_type in &model.needed_by {
                    if !required_by.contains(node_type) {
                        required_by.push(node_type.clone());
                    }
                }
                index.insert(model.filename.clone(), records.len());
                records.push(ModelRecord::new(model.filename.clone(), required_by));
            }
        }
    }

    Ok(records)
}

/// Class implementing a node type, falling back to the type itself
pub fn class_for<'a>(node_type: &'a str, aliases: &'a AliasTable) -> &'a str {
    aliases.get(node_type).map(String::as_str).unwrap_or(node_type)
}

/// Classes needed by any record
pub fn required_classes(records: &[ModelRecord], aliases: &AliasTable) -> HashSet<String> {
    records
        .iter()
        .flat_map(|record| record.required_by.iter())
        .map(|node_type| class_for(node_type, aliases).to_string())
        .collect()
}

/// Assign a folder to `record`: class definitions first, then the filename
pub fn resolve_record(record: &mut ModelRecord, aliases: &AliasTable, class_folders: &ClassFolderMap) {
    let from_class = record.required_by.iter().find_map(|node_type| {
        let class_name = class_for(node_type, aliases);
        let folders = class_folders.get(class_name)?;
        let folder = folders.iter().next()?;
        Some((folder.clone(), NodeInfo::from_class(folders, class_name, node_type)))
    });

    if let Some((folder, info)) = from_class {
        debug!("{} -> {} (class definition)", record.filename, folder);
        record.resolve(&folder, info);
    } else if let Some(folder) = guess_folder(&record.filename) {
        debug!("{} -> {} (filename)", record.filename, folder);
        record.resolve(folder, NodeInfo::from_filename(folder));
    } else {
        debug!("{}: no folder found", record.filename);
    }
}
