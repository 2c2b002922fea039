//! Squish CLI - Huffman archive utility
//!
//! Packs files and directories into a single `.sq` archive with a global
//! Huffman code, optionally sealed with password-based AES-256-GCM.

mod commands;
mod utils;

use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "squish")]
#[command(version, disable_version_flag = true)]
#[command(about = "Huffman archive utility with optional password protection")]
#[command(long_about = "
Squish concatenates files into a single .sq archive, compressing their
contents with a shared Huffman code. With a password, the archive is
sealed with AES-256-GCM and tampering is detected on extraction.

Examples:
  squish -c notes.txt todo.txt
  squish -c project/ -o backups -p hunter2
  squish -c photos -a
  squish -d backups/project.sq -p hunter2
")]
struct Cli {
    /// Files or directories to compress
    #[arg(short = 'c', value_name = "PATHS", num_args = 1.., conflicts_with = "decompress")]
    compress: Vec<PathBuf>,

    /// Archive file to decompress
    #[arg(short = 'd', value_name = "PATH")]
    decompress: Option<PathBuf>,

    /// Output directory (defaults to the parent of the first input)
    #[arg(short = 'o', value_name = "DIR")]
    output: Option<PathBuf>,

    /// Password for encryption (optional)
    #[arg(short = 'p', value_name = "PASSWORD", default_value = "", hide_default_value = true)]
    password: String,

    /// Recursively enumerate all files under the input directory
    #[arg(short = 'a', long = "all", conflicts_with = "decompress")]
    all: bool,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,
}

fn main() {
    let cli = Cli::parse();

    let result = if let Some(archive) = &cli.decompress {
        commands::decompress::run(archive, cli.output.as_deref(), &cli.password)
    } else if !cli.compress.is_empty() {
        commands::compress::run(&cli.compress, cli.output.as_deref(), &cli.password, cli.all)
    } else {
        eprintln!("No input provided: use -c to compress or -d to decompress (-h for help)");
        std::process::exit(1);
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
