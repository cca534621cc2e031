//! LZA: triple-stream LZ77 with one arithmetic-coder entry per stream.
//! Match distances travel as 16-bit little-endian byte pairs so the
//! coder sees a byte alphabet.

use super::{to_bytes, to_syms};
use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::coding::arith;
use crate::lz::lz77::{lz77_decode, lz77_encode, Lz77Streams};
use crate::lz::LzConfig;
use crate::{Error, Result};

pub(super) fn compress_chunk(chunk: &[u8]) -> Vec<u8> {
    let streams = lz77_encode(&to_syms(chunk), LzConfig::LZA);
    let index_bytes: Vec<u32> = streams
        .distances
        .iter()
        .flat_map(|&d| [d & 0xFF, d >> 8])
        .collect();
    let mut bw = BitWriter::new(chunk.len() / 2 + 64);
    arith::write_entry(&mut bw, &streams.literals);
    arith::write_entry(&mut bw, &index_bytes);
    arith::write_entry(&mut bw, &streams.lengths);
    bw.finish()
}

pub(super) fn decompress_chunk<R: std::io::Read>(br: &mut BitReader<R>) -> Result<Vec<u8>> {
    let literals = arith::read_entry(br)?;
    let index_bytes = arith::read_entry(br)?;
    let lengths = arith::read_entry(br)?;
    if index_bytes.len() % 2 != 0 {
        return Err(Error::InvalidBackReference);
    }
    if index_bytes.iter().any(|&b| b > 255) {
        return Err(Error::InvalidSymbol);
    }
    let distances: Vec<u32> = index_bytes.chunks(2).map(|p| p[0] | p[1] << 8).collect();
    let streams = Lz77Streams {
        literals,
        distances,
        lengths,
    };
    to_bytes(&lz77_decode(&streams)?)
}

#[cfg(test)]
mod test {
    use crate::container::test::{archive_round_trip, xorshift_bytes};
    use crate::container::Format;

    #[test]
    fn kilobyte_of_zeros() {
        let data = vec![0_u8; 1024];
        let archive = archive_round_trip(Format::Lza, &data);
        // One literal step and one match step. The dense length-frequency
        // preamble dominates what is left.
        assert!(archive.len() < 256);
    }

    #[test]
    fn text_round_trips() {
        let mut data = Vec::new();
        while data.len() < 90_000 {
            data.extend_from_slice(b"round and round the ragged rock the rascal ran. ");
        }
        archive_round_trip(Format::Lza, &data);
    }

    #[test]
    fn noise_round_trips() {
        archive_round_trip(Format::Lza, &xorshift_bytes(7, 5_000));
    }
}
