//! The compress command: collect inputs, build the container, seal it.

use crate::utils;
use squish_archive::{ArchiveWriter, FileRecord};
use squish_core::error::SquishError;
use std::fs::{self, File};
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub fn run(
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
    password: &str,
    all: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Reject an oversized password before touching any file.
    squish_crypto::derive_key(password)?;

    let entries = collect_inputs(inputs, all)?;
    if entries.is_empty() {
        return Err(SquishError::EmptyInput.into());
    }

    let pb = utils::progress_bar(entries.len() as u64);
    pb.set_message("reading");

    let mut writer = ArchiveWriter::new();
    for (name, path) in &entries {
        let content = fs::read(path)
            .map_err(|e| format!("failed to read file {}: {}", path.display(), e))?;
        writer.add_record(FileRecord::new(name.clone(), content));
        pb.inc(1);
    }
    pb.finish_and_clear();

    let input_size = writer.input_size();
    let mut container = Cursor::new(Vec::new());
    writer.write_to(&mut container)?;

    let out_dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_output_dir(&inputs[0]),
    };
    fs::create_dir_all(&out_dir)
        .map_err(|e| format!("failed to create output directory {}: {}", out_dir.display(), e))?;

    let stem = inputs[0]
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "archive".to_string());
    let archive_path = utils::unique_archive_path(&out_dir, &stem);

    let sealed = (|| -> squish_core::error::Result<u64> {
        let mut file = File::create(&archive_path)?;
        let mut source = Cursor::new(container.into_inner());
        squish_crypto::seal(&mut source, &mut file, password)
    })();

    let archive_size = match sealed {
        Ok(n) => n,
        Err(e) => {
            utils::remove_partial(&archive_path);
            return Err(e.into());
        }
    };

    println!("Archive created: {}", archive_path.display());
    println!("  Files:       {}", entries.len());
    println!("  Input size:  {}", utils::human_size(input_size));
    println!("  Output size: {}", utils::human_size(archive_size));
    if input_size > 0 {
        println!(
            "  Ratio:       {:.2}%",
            archive_size as f64 / input_size as f64 * 100.0
        );
    }

    Ok(())
}

/// Resolve each input to `(archive name, filesystem path)` pairs.
///
/// Directories are walked recursively and their members stored under
/// slash-separated paths relative to the directory itself; plain files
/// are stored under their base name. With `-a` every input must be a
/// directory.
fn collect_inputs(
    inputs: &[PathBuf],
    all: bool,
) -> Result<Vec<(String, PathBuf)>, Box<dyn std::error::Error>> {
    let mut entries = Vec::new();

    for input in inputs {
        let metadata = fs::metadata(input)
            .map_err(|_| format!("file or folder does not exist: {}", input.display()))?;

        if metadata.is_dir() {
            walk_dir(input, input, &mut entries)?;
        } else if all {
            return Err(format!("input is not a directory: {}", input.display()).into());
        } else {
            let name = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| format!("invalid input path: {}", input.display()))?;
            entries.push((name, input.clone()));
        }
    }

    Ok(entries)
}

/// Recursively collect files under `dir`, named relative to `base`.
///
/// Directory listings are sorted so the record order (and with it the
/// archive bytes) does not depend on filesystem iteration order.
fn walk_dir(
    base: &Path,
    dir: &Path,
    entries: &mut Vec<(String, PathBuf)>,
) -> std::io::Result<()> {
    let mut children: Vec<PathBuf> = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    children.sort();

    for path in children {
        if path.is_dir() {
            walk_dir(base, &path, entries)?;
        } else {
            let relative = path.strip_prefix(base).unwrap_or(&path);
            let name = relative.to_string_lossy().replace('\\', "/");
            entries.push((name, path));
        }
    }
    Ok(())
}

/// Default output directory: the parent of the first input.
fn default_output_dir(first_input: &Path) -> PathBuf {
    match first_input.parent() {
        Some(parent) if parent != Path::new("") => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
