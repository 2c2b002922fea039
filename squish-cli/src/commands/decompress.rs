//! The decompress command: open the envelope, extract every record.

use crate::utils;
use squish_archive::ArchiveReader;
use std::fs::{self, File};
use std::io::{BufReader, Cursor};
use std::path::{Path, PathBuf};

pub fn run(
    archive: &Path,
    output_dir: Option<&Path>,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::open(archive)
        .map_err(|e| format!("failed to open archive {}: {}", archive.display(), e))?;

    let mut container = Vec::new();
    squish_crypto::open(&mut BufReader::new(file), &mut container, password)?;

    let out_dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_output_dir(archive),
    };

    let mut reader = ArchiveReader::new(Cursor::new(&container))?;
    let pb = utils::progress_bar(reader.file_count());
    pb.set_message("extracting");

    let mut extracted: Vec<(String, u64)> = Vec::new();
    while reader.remaining() > 0 {
        let name = reader.next_name()?;
        let safe_name = utils::sanitize_entry_name(&name);
        if safe_name.is_empty() {
            return Err(format!("archive entry has an unusable name: {name:?}").into());
        }

        let target = out_dir.join(&safe_name);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("failed to create directory {}: {}", parent.display(), e))?;
        }

        let mut out = File::create(&target)
            .map_err(|e| format!("failed to create file {}: {}", target.display(), e))?;
        match reader.extract_payload(&mut out) {
            Ok(size) => extracted.push((safe_name, size)),
            Err(e) => {
                drop(out);
                utils::remove_partial(&target);
                return Err(e.into());
            }
        }
        pb.inc(1);
    }
    reader.finish()?;
    pb.finish_and_clear();

    println!("Extracted {} file(s) to {}", extracted.len(), out_dir.display());
    for (name, size) in &extracted {
        println!("  {} ({})", name, utils::human_size(*size));
    }

    Ok(())
}

/// Default output directory: the parent of the archive.
fn default_output_dir(archive: &Path) -> PathBuf {
    match archive.parent() {
        Some(parent) if parent != Path::new("") => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
