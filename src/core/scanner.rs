//! Concurrent source tree scanning
//!
//! Every Python file of the tree is analysed on a dedicated rayon pool.
//! Results are gathered in file order and merged on the calling thread,
//! later files overwriting earlier ones class by class.

use crate::core::source_tree::SourceTree;
use crate::error::{handle_error, Result, ScoutError};
use crate::models::inference::{ClassCollision, ClassFolderMap, ScanReport};
use crate::parsers::python::PythonParser;
use crate::parsers::source_visitor::SourceAnalyzer;
use parking_lot::Mutex;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info};

/// Default ceiling on scanner threads
pub const DEFAULT_MAX_WORKERS: usize = 32;

/// Default threads per hardware thread
pub const DEFAULT_WORKER_MULTIPLIER: usize = 4;

/// Progress update information for scanning
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub current: usize,
    pub total: usize,
    pub message: String,
}

impl ProgressUpdate {
    /// Create a new progress update
    pub fn new(current: usize, total: usize, message: impl Into<String>) -> Self {
        Self {
            current,
            total,
            message: message.into(),
        }
    }

    /// Calculate progress percentage
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.current as f64 / self.total as f64) * 100.0
        }
    }
}

/// Pool size: a multiple of hardware threads, capped at `max_workers`
pub fn worker_count(max_workers: usize, worker_multiplier: usize) -> usize {
    (num_cpus::get() * worker_multiplier).min(max_workers).max(1)
}

/// Scans a source tree for per-class folder requirements
pub struct ConcurrentTreeScanner<'a> {
    parser: &'a PythonParser,
    pool: ThreadPool,
}

impl<'a> ConcurrentTreeScanner<'a> {
    /// Create a scanner with a pool of `worker_count(max_workers, worker_multiplier)` threads
    pub fn new(parser: &'a PythonParser, max_workers: usize, worker_multiplier: usize) -> Result<Self> {
        let threads = worker_count(max_workers, worker_multiplier);
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("nodescout-scan-{}", i))
            .build()
            .map_err(|e| ScoutError::WorkerPool {
                message: e.to_string(),
            })?;

        debug!("Scanner pool with {} threads", threads);
        Ok(Self { parser, pool })
    }

    /// Scan `tree`, stopping the merge once every class in `required` is covered
    pub fn scan(&self, tree: &SourceTree, required: &HashSet<String>) -> Result<ScanReport> {
        self.scan_with_progress(tree, required, |_| {})
    }

    /// Scan with a callback invoked once per analysed file
    ///
    /// All files are analysed before any merging happens. The early stop
    /// only decides which results are merged; no analysis is cancelled.
    pub fn scan_with_progress<P>(
        &self,
        tree: &SourceTree,
        required: &HashSet<String>,
        progress_callback: P,
    ) -> Result<ScanReport>
    where
        P: Fn(ProgressUpdate) + Send + Sync,
    {
        let files = tree.python_files(true)?;
        let total = files.len();
        let counter = Mutex::new(0usize);
        let analyzer = SourceAnalyzer::new(self.parser);

        let results: Vec<(PathBuf, Result<ClassFolderMap>)> = self.pool.install(|| {
            files
                .into_par_iter()
                .map(|path| {
                    let result = analyzer.analyze_file(&path);

                    let current = {
                        let mut count = counter.lock();
                        *count += 1;
                        *count
                    };
                    progress_callback(ProgressUpdate::new(
                        current,
                        total,
                        format!("Scanned {}", path.display()),
                    ));

                    (path, result)
                })
                .collect()
        });

        let mut report = ScanReport {
            files_discovered: total,
            ..ScanReport::default()
        };

        for (path, result) in results {
            match result {
                Ok(found) => merge_into(&mut report, found),
                Err(err) => {
                    report.files_failed += 1;
                    if let Some(fatal) = handle_error(err) {
                        return Err(fatal);
                    }
                }
            }
            report.files_merged += 1;

            if covers(&report.class_folders, required) {
                if report.files_merged < total {
                    report.stopped_early = true;
                    debug!(
                        "All required classes found after {}; skipping remaining results",
                        path.display()
                    );
                }
                break;
            }
        }

        info!(
            "Scanned {} files: {} classes with folders, {} failed",
            total,
            report.class_folders.len(),
            report.files_failed
        );
        Ok(report)
    }
}

/// Nothing required means nothing to wait for; every result is merged
fn covers(class_folders: &ClassFolderMap, required: &HashSet<String>) -> bool {
    !required.is_empty() && required.iter().all(|class| class_folders.contains_key(class))
}

fn merge_into(report: &mut ScanReport, found: ClassFolderMap) {
    let mut entries: Vec<_> = found.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    for (class_name, folders) in entries {
        if let Some(previous) = report.class_folders.insert(class_name.clone(), folders.clone()) {
            debug!("Class {} redefined, replacing folders {:?} with {:?}", class_name, previous, folders);
            report.collisions.push(ClassCollision {
                class_name,
                previous,
                replacing: folders,
            });
        }
    }
}
