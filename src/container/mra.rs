//! MRA: move-to-front over the chunk's own alphabet, zero-run coding,
//! run-of-four coding capped at 254, then one arithmetic-coder entry.

use super::{to_bytes, to_syms};
use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::coding::arith;
use crate::tools::alphabet::{decode_alphabet, encode_alphabet};
use crate::transform::mtf::{alphabet_of, mtf_decode, mtf_encode};
use crate::transform::rle1::{rle1_decode, rle1_encode};
use crate::transform::rle2::{rle2_decode, rle2_encode};
use crate::Result;

// 254 keeps the symbol 255 out of the run alphabet.
const MAX_RUN: u32 = 254;

pub(super) fn compress_chunk(chunk: &[u8]) -> Vec<u8> {
    let data = to_syms(chunk);
    let alphabet = alphabet_of(&data);
    let mtf = mtf_encode(&data, &alphabet);
    let rle = rle1_encode(&rle2_encode(&mtf), MAX_RUN);
    let mut bw = BitWriter::new(chunk.len() / 2 + 64);
    encode_alphabet(&mut bw, &alphabet);
    arith::write_entry(&mut bw, &rle);
    bw.finish()
}

pub(super) fn decompress_chunk<R: std::io::Read>(br: &mut BitReader<R>) -> Result<Vec<u8>> {
    let alphabet = decode_alphabet(br)?;
    let rle = arith::read_entry(br)?;
    let mtf = rle2_decode(&rle1_decode(&rle, MAX_RUN)?)?;
    to_bytes(&mtf_decode(&mtf, &alphabet)?)
}

#[cfg(test)]
mod test {
    use crate::container::test::{archive_round_trip, xorshift_bytes};
    use crate::container::Format;

    #[test]
    fn alternating_pair_marks_two_groups() {
        let data: Vec<u8> = [0x00, 0xFF].iter().copied().cycle().take(4096).collect();
        let archive = archive_round_trip(Format::Mra, &data);
        // Payload starts right after the 4-byte magic; its first byte is
        // the alphabet group map with only groups 0 and 7 marked.
        assert_eq!(archive[4], 0b1000_0001);
    }

    #[test]
    fn text_round_trips() {
        let mut data = Vec::new();
        while data.len() < 80_000 {
            data.extend_from_slice(b"how much wood would a woodchuck chuck. ");
        }
        archive_round_trip(Format::Mra, &data);
    }

    #[test]
    fn noise_and_runs() {
        archive_round_trip(Format::Mra, &xorshift_bytes(99, 3_000));
        archive_round_trip(Format::Mra, &vec![3_u8; 70_000]);
    }
}
