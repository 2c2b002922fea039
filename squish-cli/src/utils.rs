//! Utility functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Component, Path, PathBuf};

/// Create a progress bar with standard styling.
pub fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("progress bar template is valid")
            .progress_chars("█▓▒░ "),
    );
    pb
}

/// Format a byte count with 1024-based units.
pub fn human_size(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    if bytes < UNIT {
        return format!("{} B", bytes);
    }
    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    format!(
        "{:.1} {}B",
        bytes as f64 / div as f64,
        ["K", "M", "G", "T", "P", "E"][exp]
    )
}

/// Pick a `.sq` output path that does not collide with an existing file.
///
/// `name.sq`, then `name_1.sq`, `name_2.sq`, and so on.
pub fn unique_archive_path(dir: &Path, stem: &str) -> PathBuf {
    let mut candidate = dir.join(format!("{stem}.sq"));
    let mut count = 1;
    while candidate.exists() {
        candidate = dir.join(format!("{stem}_{count}.sq"));
        count += 1;
    }
    candidate
}

/// Reduce an archived entry name to a path that is safe to extract.
///
/// Drops parent-directory components, root prefixes, and `.` segments,
/// and replaces NUL bytes, so a hostile archive cannot climb out of the
/// output directory.
pub fn sanitize_entry_name(name: &str) -> String {
    let mut result = String::new();
    for component in Path::new(name).components() {
        if let Component::Normal(part) = component {
            if !result.is_empty() {
                result.push('/');
            }
            result.push_str(&part.to_string_lossy().replace('\0', "_"));
        }
    }
    result
}

/// Best-effort removal of a partially written output file.
pub fn remove_partial(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        eprintln!("Warning: could not remove partial file {}: {}", path.display(), e);
    }
}
