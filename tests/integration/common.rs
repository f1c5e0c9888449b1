//! Shared fixtures: on-disk custom node trees

use std::fs;
use std::path::Path;

/// Write `source` to `root/relative`, creating parent directories
pub fn write_source(root: &Path, relative: &str, source: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, source).unwrap();
}

/// A loader class reading its choices from a single model folder
pub fn loader_class(class_name: &str, folder: &str) -> String {
    format!(
        r#"import folder_paths


class {class_name}:
    @classmethod
    def INPUT_TYPES(s):
        return {{
            "required": {{
                "model_name": (folder_paths.get_filename_list("{folder}"),),
            }}
        }}

    RETURN_TYPES = ("MODEL",)
    FUNCTION = "load"

    def load(self, model_name):
        path = folder_paths.get_full_path("{folder}", model_name)
        return (path,)
"#
    )
}

/// A `NODE_CLASS_MAPPINGS` module mapping display names to classes
pub fn mappings(entries: &[(&str, &str)]) -> String {
    let imports: Vec<String> = entries
        .iter()
        .map(|(_, class_name)| format!("from .nodes import {}", class_name))
        .collect();
    let body: Vec<String> = entries
        .iter()
        .map(|(display, class_name)| format!("    \"{}\": {},", display, class_name))
        .collect();
    format!(
        "{}\n\nNODE_CLASS_MAPPINGS = {{\n{}\n}}\n",
        imports.join("\n"),
        body.join("\n")
    )
}
