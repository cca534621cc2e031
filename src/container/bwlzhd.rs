//! BWLZHD: run length coding around a Burrows-Wheeler transform, LZSS
//! over the result, then Huffman entries for the literal and length
//! streams and an offset-bit-Huffman (OBH) stream for the distances.
//!
//! OBH sends each distance as its bit-length bucket through a Huffman
//! entry, followed by the raw low bits (the bucket minus one of them)
//! concatenated after the entry.
//!
//! A chunk that fails to beat a ratio of 1 (strictly) falls back to an
//! uncompressed payload: a plain Huffman entry of the raw chunk bytes.

use super::{to_bytes, to_syms};
use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::coding::huffman;
use crate::lz::lzss::{dist_bucket, lzss_decode, lzss_encode, LzssStreams};
use crate::lz::LzConfig;
use crate::transform::bwt::{bwt_decode, bwt_encode};
use crate::transform::rle1::{rle1_decode, rle1_encode};
use crate::{Error, Result};

const MAX_RUN: u32 = 255;
const COMPRESSED: u8 = 0x01;
const UNCOMPRESSED: u8 = 0x00;
// A chunk is stored compressed only when input/output exceeds this,
// strictly.
const RANDOM_DATA_THRESHOLD: usize = 1;

pub(super) fn compress_chunk(chunk: &[u8]) -> Vec<u8> {
    let r1 = rle1_encode(&to_syms(chunk), MAX_RUN);
    let (key, bwt) = bwt_encode(&r1);
    let r2 = rle1_encode(&bwt, MAX_RUN);
    let streams = lzss_encode(&r2, LzConfig::LZSS);

    let buckets: Vec<u32> = streams
        .distances
        .iter()
        .map(|&d| dist_bucket(d as usize))
        .collect();
    let mut body = BitWriter::new(chunk.len() / 2 + 64);
    body.out32_be(key);
    huffman::write_entry(&mut body, &streams.literals);
    huffman::write_entry(&mut body, &streams.lengths);
    huffman::write_entry(&mut body, &buckets);
    for (&d, &bucket) in streams.distances.iter().zip(buckets.iter()) {
        body.write_bits(d as u64 & ((1 << (bucket - 1)) - 1), bucket - 1);
    }
    let body = body.finish();

    let mut out = BitWriter::new(body.len() + 1);
    if chunk.len() > body.len() * RANDOM_DATA_THRESHOLD + 1 {
        out.out8(COMPRESSED);
        out.extend(&body);
    } else {
        out.out8(UNCOMPRESSED);
        huffman::write_entry(&mut out, &to_syms(chunk));
    }
    out.finish()
}

pub(super) fn decompress_chunk<R: std::io::Read>(br: &mut BitReader<R>) -> Result<Vec<u8>> {
    let flag = br.byte()?.ok_or(Error::TruncatedStream)?;
    match flag {
        UNCOMPRESSED => to_bytes(&huffman::read_entry(br)?),
        COMPRESSED => {
            let key = br
                .bytes(4)?
                .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
                .ok_or(Error::TruncatedStream)?;
            let literals = huffman::read_entry(br)?;
            let lengths = huffman::read_entry(br)?;
            let buckets = huffman::read_entry(br)?;
            let mut distances = Vec::with_capacity(buckets.len());
            for &bucket in &buckets {
                if !(1..=16).contains(&bucket) {
                    return Err(Error::InvalidBackReference);
                }
                let extra = br
                    .read_bits(bucket - 1)?
                    .ok_or(Error::TruncatedStream)?;
                distances.push(1 << (bucket - 1) | extra as u32);
            }
            br.align();
            let streams = LzssStreams {
                literals,
                lengths,
                distances,
            };
            let r2 = lzss_decode(&streams)?;
            let bwt = rle1_decode(&r2, MAX_RUN)?;
            let r1 = bwt_decode(key, &bwt)?;
            to_bytes(&rle1_decode(&r1, MAX_RUN)?)
        }
        _ => Err(Error::InvalidSymbol),
    }
}
