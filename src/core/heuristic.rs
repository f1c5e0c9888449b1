//! Filename based folder guessing

/// Substring patterns and their folders, tried in order
pub const FOLDER_PATTERNS: &[(&str, &str)] = &[
    ("vae", "vae"),
    ("lora", "loras"),
    ("embedding", "embeddings"),
    ("checkpoint", "checkpoints"),
    ("upscale", "upscale_models"),
    ("controlnet", "controlnet"),
    ("clip", "clip"),
    ("hypernetwork", "hypernetworks"),
    ("t2i", "checkpoints"),
    ("sd", "checkpoints"),
];

/// Folder of the first pattern contained in the lower-cased filename
pub fn guess_folder(filename: &str) -> Option<&'static str> {
    let lower = filename.to_lowercase();
    FOLDER_PATTERNS
        .iter()
        .find(|(pattern, _)| lower.contains(pattern))
        .map(|(_, folder)| *folder)
}
