//! Polypress: a family of chunked lossless file compressors.
//!
//! - Provides five container formats built from a shared set of classical
//!   transforms: LZ77/LZSS, the Burrows-Wheeler transform, move-to-front,
//!   two run-length encoders, canonical Huffman coding and a 32-bit
//!   arithmetic coder.
//! - Every container reads fixed-size chunks, compresses each chunk
//!   independently and writes a small magic header followed by the
//!   concatenated chunk payloads.
//!
//! Basic usage to compress a file:
//!
//! ```text
//! $> polypress rlh -i test.txt
//! ```
//!
//! This creates test.txt.rlh. Decompress with:
//!
//! ```text
//! $> polypress rlh -e -i test.txt.rlh
//! ```
//!
//! Help is available by entering:
//!
//! ```text
//! $> polypress --help
//! ```
pub mod bitstream;
pub mod coding;
pub mod container;
pub mod lz;
pub mod tools;
pub mod transform;

/// Errors shared by every container. All of them are fatal to the archive
/// operation in progress; no partial output is considered valid.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{path} is not a valid archive (bad magic)")]
    BadMagic { path: String },
    #[error("unexpected end of stream")]
    TruncatedStream,
    #[error("invalid frequency table in entry preamble")]
    InvalidFrequencyTable,
    #[error("arithmetic coder total exceeds 32 bits")]
    OversizedTotal,
    #[error("invalid back-reference in compressed stream")]
    InvalidBackReference,
    #[error("run count out of range")]
    InvalidRunCount,
    #[error("symbol out of range for this stage")]
    InvalidSymbol,
    #[error("BWT key outside the block")]
    InvalidBwtKey,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
