//! Concurrent tree scanning over realistic pack layouts

use super::common::{loader_class, write_source};
use nodescout::core::{ConcurrentTreeScanner, SourceTree};
use nodescout::parsers::{ClassMappingLoader, PythonParser};
use parking_lot::Mutex;
use std::collections::HashSet;
use tempfile::tempdir;

fn required(names: &[&str]) -> HashSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn test_scan_collects_classes_across_packs() {
    let dir = tempdir().unwrap();
    write_source(dir.path(), "pack_a/nodes.py", &loader_class("LoaderA", "checkpoints"));
    write_source(dir.path(), "pack_b/nodes/loaders.py", &loader_class("LoaderB", "loras"));
    write_source(dir.path(), "pack_b/util.py", "def helper():\n    return 1\n");
    write_source(dir.path(), "pack_c/broken.py", "def f(:\n    folder_paths.get_filename_list('x')\n");

    let parser = PythonParser::new().unwrap();
    let scanner = ConcurrentTreeScanner::new(&parser, 4, 2).unwrap();
    let report = scanner
        .scan(&SourceTree::new(dir.path()), &required(&["LoaderA", "LoaderB", "Missing"]))
        .unwrap();

    assert_eq!(report.files_discovered, 4);
    assert_eq!(report.files_failed, 1);
    assert!(!report.stopped_early);
    assert!(report.class_folders["LoaderA"].contains("checkpoints"));
    assert!(report.class_folders["LoaderB"].contains("loras"));
}

#[test]
fn test_scan_skips_hidden_and_excluded_sources() {
    let dir = tempdir().unwrap();
    write_source(dir.path(), "pack/.git/hooks/hook.py", &loader_class("Hidden", "vae"));
    write_source(dir.path(), "pack/tests/test_nodes.py", &loader_class("Fixture", "vae"));
    write_source(dir.path(), "pack/nodes.py", &loader_class("Real", "vae"));

    let tree = SourceTree::with_excludes(dir.path(), &["*/tests/*".to_string()]).unwrap();
    let parser = PythonParser::new().unwrap();
    let scanner = ConcurrentTreeScanner::new(&parser, 2, 1).unwrap();
    let report = scanner.scan(&tree, &required(&["Real", "Missing"])).unwrap();

    assert_eq!(report.files_discovered, 1);
    assert!(report.class_folders.contains_key("Real"));
    assert!(!report.class_folders.contains_key("Hidden"));
    assert!(!report.class_folders.contains_key("Fixture"));
}

#[test]
fn test_progress_reports_every_file() {
    let dir = tempdir().unwrap();
    for i in 0..6 {
        write_source(dir.path(), &format!("pack_{}/nodes.py", i), &loader_class(&format!("L{}", i), "vae"));
    }

    let parser = PythonParser::new().unwrap();
    let scanner = ConcurrentTreeScanner::new(&parser, 3, 1).unwrap();
    let seen = Mutex::new(Vec::new());
    scanner
        .scan_with_progress(&SourceTree::new(dir.path()), &required(&["Nope"]), |update| {
            seen.lock().push((update.current, update.total));
        })
        .unwrap();

    let mut seen = seen.into_inner();
    seen.sort();
    let expected: Vec<(usize, usize)> = (1..=6).map(|i| (i, 6)).collect();
    assert_eq!(seen, expected);
}

#[test]
fn test_alias_loader_reads_hidden_directories() {
    let dir = tempdir().unwrap();
    write_source(
        dir.path(),
        ".hidden_pack/__init__.py",
        "NODE_CLASS_MAPPINGS = {\"Shown\": Impl}\n",
    );

    let parser = PythonParser::new().unwrap();
    let aliases = ClassMappingLoader::new(&parser)
        .load(&SourceTree::new(dir.path()))
        .unwrap();

    assert_eq!(aliases.get("Shown").map(String::as_str), Some("Impl"));
}
