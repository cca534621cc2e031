//! Byte-aligned LZ4-style block codec.
//!
//! A chunk is a run of tokens. The token byte holds the literal count in
//! its high nibble and (match length - min length) in its low nibble;
//! nibble value 15 extends with bytes that are summed until one is below
//! 255. Literal-count extension bytes follow the token, then the
//! literals, then the 16-bit little-endian match distance and the match
//! length extension. The chunk always ends with a literal-only token
//! carrying the remainder; the decoder recognizes it by reaching the
//! chunk size or the end of the input.

use super::matcher::MatchFinder;
use super::LzConfig;
use crate::bitstream::bitreader::BitReader;
use crate::{Error, Result};

const NIBBLE_MAX: usize = 15;

pub fn lzb_encode(data: &[u8], cfg: LzConfig) -> Vec<u8> {
    let syms: Vec<u32> = data.iter().map(|&b| b as u32).collect();
    let mut mf = MatchFinder::new(&syms, cfg);
    let mut out = Vec::with_capacity(data.len() / 2 + 16);
    let mut lit_start = 0_usize;
    let mut pos = 0_usize;
    while pos < data.len() {
        if let Some((dist, len)) = mf.longest_match(pos) {
            emit_token(&mut out, &data[lit_start..pos], Some((dist, len)), &cfg);
            for p in pos..pos + len {
                mf.insert(p);
            }
            pos += len;
            lit_start = pos;
        } else {
            mf.insert(pos);
            pos += 1;
        }
    }
    // The remainder rides out on a final literal-only token, present even
    // when empty so the decoder can delimit the chunk.
    emit_token(&mut out, &data[lit_start..], None, &cfg);
    out
}

fn emit_token(out: &mut Vec<u8>, lits: &[u8], m: Option<(usize, usize)>, cfg: &LzConfig) {
    let lit_nibble = lits.len().min(NIBBLE_MAX);
    let match_nibble = match m {
        Some((_, len)) => (len - cfg.min_len).min(NIBBLE_MAX),
        None => 0,
    };
    out.push((lit_nibble << 4 | match_nibble) as u8);
    if lit_nibble == NIBBLE_MAX {
        push_ext(out, lits.len() - NIBBLE_MAX);
    }
    out.extend_from_slice(lits);
    if let Some((dist, len)) = m {
        out.extend_from_slice(&(dist as u16).to_le_bytes());
        if match_nibble == NIBBLE_MAX {
            push_ext(out, len - cfg.min_len - NIBBLE_MAX);
        }
    }
}

fn push_ext(out: &mut Vec<u8>, mut rem: usize) {
    while rem >= 255 {
        out.push(255);
        rem -= 255;
    }
    out.push(rem as u8);
}

/// Decode one chunk worth of tokens: stops once `limit` output bytes have
/// been produced or the input runs out after a token.
pub fn lzb_decode_chunk<R: std::io::Read>(
    br: &mut BitReader<R>,
    cfg: LzConfig,
    limit: usize,
) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    loop {
        let token = br.byte()?.ok_or(Error::TruncatedStream)?;
        let mut lit = (token >> 4) as usize;
        if lit == NIBBLE_MAX {
            lit += read_ext(br)?;
        }
        let lits = br.bytes(lit)?.ok_or(Error::TruncatedStream)?;
        out.extend_from_slice(&lits);
        if out.len() >= limit {
            if out.len() > limit {
                return Err(Error::InvalidBackReference);
            }
            break;
        }
        if !br.has_data()? {
            break;
        }
        let d = br.bytes(2)?.ok_or(Error::TruncatedStream)?;
        let dist = u16::from_le_bytes([d[0], d[1]]) as usize;
        if dist == 0 || dist > out.len() {
            return Err(Error::InvalidBackReference);
        }
        let mut nibble = (token & 0xF) as usize;
        if nibble == NIBBLE_MAX {
            nibble += read_ext(br)?;
        }
        let len = nibble + cfg.min_len;
        if out.len() + len > limit {
            return Err(Error::InvalidBackReference);
        }
        // Byte-wise copy: the match may reach into its own output.
        let from = out.len() - dist;
        for k in 0..len {
            let byte = out[from + k];
            out.push(byte);
        }
    }
    Ok(out)
}

fn read_ext<R: std::io::Read>(br: &mut BitReader<R>) -> Result<usize> {
    let mut sum = 0_usize;
    loop {
        let byte = br.byte()?.ok_or(Error::TruncatedStream)?;
        sum += byte as usize;
        if byte < 255 {
            return Ok(sum);
        }
        if sum > 1 << 26 {
            return Err(Error::InvalidRunCount);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn round_trip(data: &[u8], cfg: LzConfig) -> Vec<u8> {
        let encoded = lzb_encode(data, cfg);
        let mut br = BitReader::new(encoded.as_slice());
        let decoded = lzb_decode_chunk(&mut br, cfg, usize::MAX).unwrap();
        assert_eq!(decoded, data);
        encoded
    }

    #[test]
    fn abcabcabc_has_a_match() {
        let encoded = round_trip(b"abcabcabc", LzConfig::LZB);
        // Token (3 literals, len 6-4), "abc", distance 3, final token.
        assert_eq!(encoded, vec![0x32, b'a', b'b', b'c', 0x03, 0x00, 0x00]);
    }

    #[test]
    fn long_literal_run_extends_the_nibble() {
        // Little-endian 16-bit counters: no 4-byte window ever repeats,
        // so the whole chunk rides the final literal-only token.
        let data: Vec<u8> = (0_u16..500).flat_map(|k| k.to_le_bytes()).collect();
        let encoded = round_trip(&data, LzConfig::LZB);
        assert_eq!(encoded[0], 0xF0);
        assert!(encoded.len() >= data.len() + 2);
    }

    #[test]
    fn long_match_extends_the_nibble() {
        let data = vec![9_u8; 5000];
        round_trip(&data, LzConfig::LZB);
        round_trip(&data, LzConfig::LZB_LONG);
    }

    #[test]
    fn empty_chunk_is_one_token() {
        assert_eq!(round_trip(&[], LzConfig::LZB), vec![0x00]);
    }

    #[test]
    fn chunked_stream_decodes_in_order() {
        let a = vec![1_u8; 300];
        let b = vec![2_u8; 77];
        let mut stream = lzb_encode(&a, LzConfig::LZB);
        stream.extend(lzb_encode(&b, LzConfig::LZB));
        let mut br = BitReader::new(stream.as_slice());
        assert_eq!(lzb_decode_chunk(&mut br, LzConfig::LZB, 300).unwrap(), a);
        assert_eq!(lzb_decode_chunk(&mut br, LzConfig::LZB, 300).unwrap(), b);
        assert!(!br.has_data().unwrap());
    }

    #[test]
    fn zero_distance_is_rejected() {
        let bad = [0x14_u8, b'x', 0x00, 0x00, 0x00];
        let mut br = BitReader::new(bad.as_slice());
        assert!(lzb_decode_chunk(&mut br, LzConfig::LZB, 100).is_err());
    }
}
