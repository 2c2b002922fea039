//! # Squish Huffman
//!
//! Deterministic Huffman codec for the squish archiver.
//!
//! One global prefix code covers every byte of an archive (file names and
//! payloads alike). The pipeline is:
//!
//! 1. [`FrequencyTable`] — a single counting pass over all input bytes;
//!    per-file tallies are mergeable so the pass can run in parallel.
//! 2. [`build_codes`] — bottom-up tree construction with deterministic
//!    tie-breaking, then code extraction into a [`CodeTable`].
//! 3. [`encode`] / [`decode`] — byte stream to bit stream and back,
//!    through the core `BitWriter`/`BitReader` field framing.
//!
//! # Determinism
//!
//! For a given multiset of input bytes the code table is reproducible
//! across runs and platforms: frequency ties break on the byte value,
//! and ties between merged subtrees break on the smallest byte the
//! subtree contains. The serialized table lists entries in ascending
//! byte order, so the head of the container is byte-identical between
//! identical inputs.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod decode;
pub mod encode;
pub mod freq;
pub mod table;
mod tree;

pub use decode::DecodeTree;
pub use freq::FrequencyTable;
pub use table::{Code, CodeTable};
pub use tree::build_codes;
