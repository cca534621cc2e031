//! BWLZ3: a long-range LZB pass over the raw chunk, then run length
//! coding, a symbolic Burrows-Wheeler transform, move-to-front, zero-run
//! coding, and a final symbolic LZ77 whose three streams travel delta
//! coded.

use super::{to_bytes, to_syms};
use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::coding::delta::{delta_decode, delta_encode};
use crate::lz::lz77::{lz77_decode, lz77_encode, Lz77Streams};
use crate::lz::lzb::{lzb_decode_chunk, lzb_encode};
use crate::lz::LzConfig;
use crate::tools::alphabet::{decode_alphabet, encode_alphabet};
use crate::transform::bwt::{bwt_decode, bwt_encode};
use crate::transform::mtf::{alphabet_of, mtf_decode, mtf_encode};
use crate::transform::rle1::{rle1_decode, rle1_encode};
use crate::transform::rle2::{rle2_decode, rle2_encode};
use crate::{Error, Result};

const MAX_RUN: u32 = 255;

pub(super) fn compress_chunk(chunk: &[u8]) -> Vec<u8> {
    let packed = lzb_encode(chunk, LzConfig::LZB_LONG);
    let rle = rle1_encode(&to_syms(&packed), MAX_RUN);
    let (key, bwt) = bwt_encode(&rle);
    let alphabet = alphabet_of(&bwt);
    let mtf = mtf_encode(&bwt, &alphabet);
    let zrle = rle2_encode(&mtf);
    let streams = lz77_encode(&zrle, LzConfig::SYMBOLIC);

    let mut bw = BitWriter::new(chunk.len() / 4 + 64);
    bw.out32_be(key);
    encode_alphabet(&mut bw, &alphabet);
    delta_encode(&mut bw, &widen(&streams.literals), false);
    delta_encode(&mut bw, &widen(&streams.distances), false);
    delta_encode(&mut bw, &widen(&streams.lengths), false);
    bw.finish()
}

pub(super) fn decompress_chunk<R: std::io::Read>(br: &mut BitReader<R>) -> Result<Vec<u8>> {
    let key = br
        .bytes(4)?
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or(Error::TruncatedStream)?;
    let alphabet = decode_alphabet(br)?;
    let streams = Lz77Streams {
        literals: narrow(delta_decode(br, false)?)?,
        distances: narrow(delta_decode(br, false)?)?,
        lengths: narrow(delta_decode(br, false)?)?,
    };
    let zrle = lz77_decode(&streams)?;
    let mtf = rle2_decode(&zrle)?;
    let bwt = mtf_decode(&mtf, &alphabet)?;
    let rle = bwt_decode(key, &bwt)?;
    let packed = to_bytes(&rle1_decode(&rle, MAX_RUN)?)?;
    let mut packed_br = BitReader::new(packed.as_slice());
    lzb_decode_chunk(&mut packed_br, LzConfig::LZB_LONG, super::Format::Bwlz3.chunk_size())
}

fn widen(data: &[u32]) -> Vec<i64> {
    data.iter().map(|&v| v as i64).collect()
}

fn narrow(data: Vec<i64>) -> Result<Vec<u32>> {
    data.into_iter()
        .map(|v| u32::try_from(v).map_err(|_| Error::InvalidSymbol))
        .collect()
}
