//! RLH: run-of-four run length coding followed by one Huffman entry per
//! chunk.

use super::{to_bytes, to_syms};
use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::coding::huffman;
use crate::transform::rle1::{rle1_decode, rle1_encode};
use crate::Result;

const MAX_RUN: u32 = 255;

pub(super) fn compress_chunk(chunk: &[u8]) -> Vec<u8> {
    let rle = rle1_encode(&to_syms(chunk), MAX_RUN);
    let mut bw = BitWriter::new(chunk.len() / 2 + 32);
    huffman::write_entry(&mut bw, &rle);
    bw.finish()
}

pub(super) fn decompress_chunk<R: std::io::Read>(br: &mut BitReader<R>) -> Result<Vec<u8>> {
    let rle = huffman::read_entry(br)?;
    to_bytes(&rle1_decode(&rle, MAX_RUN)?)
}

#[cfg(test)]
mod test {
    use crate::container::test::{archive_round_trip, xorshift_bytes};
    use crate::container::Format;

    #[test]
    fn aaaab_archive() {
        let archive = archive_round_trip(Format::Rlh, b"AAAAB");
        assert!(archive.starts_with(b"RLH\x01"));
    }

    #[test]
    fn runs_shrink_a_lot() {
        let data = vec![b'z'; 60_000];
        let archive = archive_round_trip(Format::Rlh, &data);
        assert!(archive.len() < data.len() / 10);
    }

    #[test]
    fn text_and_noise() {
        archive_round_trip(Format::Rlh, b"a tale of two cities, in two cities");
        archive_round_trip(Format::Rlh, &xorshift_bytes(42, 70_000));
    }
}
