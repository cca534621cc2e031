//! Archive framing shared by the five container formats.
//!
//! An archive is the uppercase format name, one version byte, then the
//! concatenation of independently compressed chunk payloads. Compression
//! reads fixed-size chunks until the input runs out; decompression loops
//! until the stream ends cleanly between chunks.

use std::io::{Read, Write};

use log::{debug, info};

use crate::bitstream::bitreader::BitReader;
use crate::{Error, Result};

pub mod bwlz3;
pub mod bwlzhd;
pub mod lza;
pub mod lzb;
pub mod mra;
pub mod rlh;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Lzb,
    Lza,
    Rlh,
    Bwlzhd,
    Bwlz3,
    Mra,
}

impl Format {
    pub fn from_name(name: &str) -> Option<Format> {
        match name.to_ascii_lowercase().as_str() {
            "lzb" => Some(Format::Lzb),
            "lza" => Some(Format::Lza),
            "rlh" => Some(Format::Rlh),
            "bwlzhd" => Some(Format::Bwlzhd),
            "bwlz3" => Some(Format::Bwlz3),
            "mra" => Some(Format::Mra),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Format::Lzb => "lzb",
            Format::Lza => "lza",
            Format::Rlh => "rlh",
            Format::Bwlzhd => "bwlzhd",
            Format::Bwlz3 => "bwlz3",
            Format::Mra => "mra",
        }
    }

    fn version(&self) -> u8 {
        match self {
            Format::Mra => 0x03,
            _ => 0x01,
        }
    }

    /// The archive signature: uppercase name plus a version byte.
    pub fn magic(&self) -> Vec<u8> {
        let mut magic = self.name().to_ascii_uppercase().into_bytes();
        magic.push(self.version());
        magic
    }

    /// How many input bytes each chunk covers.
    pub fn chunk_size(&self) -> usize {
        match self {
            Format::Lzb => 1 << 15,
            Format::Lza | Format::Rlh | Format::Mra => 1 << 16,
            Format::Bwlzhd | Format::Bwlz3 => 1 << 17,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Compress `source` into `sink` as one archive.
pub fn compress<R: Read, W: Write>(format: Format, source: &mut R, sink: &mut W) -> Result<()> {
    sink.write_all(&format.magic())?;
    let mut sequence = 0_usize;
    while let Some(chunk) = read_chunk(source, format.chunk_size())? {
        let payload = match format {
            Format::Lzb => lzb::compress_chunk(&chunk),
            Format::Lza => lza::compress_chunk(&chunk),
            Format::Rlh => rlh::compress_chunk(&chunk),
            Format::Bwlzhd => bwlzhd::compress_chunk(&chunk),
            Format::Bwlz3 => bwlz3::compress_chunk(&chunk),
            Format::Mra => mra::compress_chunk(&chunk),
        };
        sequence += 1;
        debug!(
            "chunk {}: {} bytes in, {} bytes out",
            sequence,
            chunk.len(),
            payload.len()
        );
        sink.write_all(&payload)?;
    }
    sink.flush()?;
    info!("wrote {} chunks", sequence);
    Ok(())
}

/// Decompress an archive from `source` into `sink`. `path` names the
/// archive in diagnostics.
pub fn decompress<R: Read, W: Write>(
    format: Format,
    source: &mut R,
    sink: &mut W,
    path: &str,
) -> Result<()> {
    let mut br = BitReader::new(source);
    let magic = format.magic();
    match br.bytes(magic.len())? {
        Some(found) if found == magic => (),
        _ => {
            return Err(Error::BadMagic {
                path: path.to_string(),
            })
        }
    }
    let mut sequence = 0_usize;
    while br.has_data()? {
        let chunk = match format {
            Format::Lzb => lzb::decompress_chunk(&mut br)?,
            Format::Lza => lza::decompress_chunk(&mut br)?,
            Format::Rlh => rlh::decompress_chunk(&mut br)?,
            Format::Bwlzhd => bwlzhd::decompress_chunk(&mut br)?,
            Format::Bwlz3 => bwlz3::decompress_chunk(&mut br)?,
            Format::Mra => mra::decompress_chunk(&mut br)?,
        };
        sequence += 1;
        debug!("chunk {}: {} bytes out", sequence, chunk.len());
        sink.write_all(&chunk)?;
    }
    sink.flush()?;
    info!("restored {} chunks", sequence);
    Ok(())
}

/// Read up to `size` bytes; None once the source is exhausted.
fn read_chunk<R: Read>(source: &mut R, size: usize) -> Result<Option<Vec<u8>>> {
    let mut buf = vec![0_u8; size];
    let mut filled = 0_usize;
    while filled < size {
        let n = source.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    if filled == 0 {
        return Ok(None);
    }
    buf.truncate(filled);
    Ok(Some(buf))
}

/// Widen chunk bytes for the symbol-oriented transforms.
pub(crate) fn to_syms(chunk: &[u8]) -> Vec<u32> {
    chunk.iter().map(|&b| b as u32).collect()
}

/// Narrow decoded symbols back to bytes, rejecting anything out of range.
pub(crate) fn to_bytes(data: &[u32]) -> Result<Vec<u8>> {
    data.iter()
        .map(|&s| {
            if s <= 255 {
                Ok(s as u8)
            } else {
                Err(Error::InvalidSymbol)
            }
        })
        .collect()
}
