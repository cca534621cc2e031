//! Elias-like delta coding for length-prefixed integer sequences.
//!
//! The sequence is written as the differences of [len, v0, v1, ...] against
//! a running previous value that starts at 0. A zero delta costs one bit.
//! A nonzero delta d is written as a marker bit, a sign bit, and the binary
//! magnitude with its bit count in unary and its leading 1 dropped. The
//! "double" form adds one more layer (the bit count of the bit count) and
//! is used where magnitudes can reach 32 bits, such as alphabet bitmaps
//! and arithmetic coder frequency vectors.
//!
//! Every encoded sequence ends on a byte boundary so the surrounding
//! container sections stay byte-aligned.

use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::{Error, Result};

// Decoded sequences are capped well above any chunk-derived stream to stop
// a corrupt length prefix from allocating without bound.
const MAX_SEQ_LEN: i64 = 1 << 24;

/// Encode a sequence of integers onto the bit stream, leaving the writer
/// byte-aligned. Set `double` for the nested bit-length form.
pub fn delta_encode(bw: &mut BitWriter, ints: &[i64], double: bool) {
    let mut prev = 0_i64;
    let mut emit = |bw: &mut BitWriter, value: i64| {
        let d = value - prev;
        prev = value;
        if d == 0 {
            bw.push_bit(0);
            return;
        }
        bw.push_bit(1);
        bw.push_bit(if d > 0 { 1 } else { 0 });
        let mag = d.unsigned_abs();
        let t_len = 64 - mag.leading_zeros();
        if double {
            let l = t_len as u64;
            let l_len = 64 - l.leading_zeros();
            for _ in 0..l_len - 1 {
                bw.push_bit(1);
            }
            bw.push_bit(0);
            bw.write_bits(l & mask(l_len - 1), l_len - 1);
            bw.write_bits(mag & mask(t_len - 1), t_len - 1);
        } else {
            for _ in 0..t_len - 1 {
                bw.push_bit(1);
            }
            bw.push_bit(0);
            bw.write_bits(mag & mask(t_len - 1), t_len - 1);
        }
    };
    emit(bw, ints.len() as i64);
    for &value in ints {
        emit(bw, value);
    }
    bw.align();
}

/// Decode a delta-encoded sequence, consuming the padding of its final
/// byte. The first decoded integer is the element count.
pub fn delta_decode<R: std::io::Read>(br: &mut BitReader<R>, double: bool) -> Result<Vec<i64>> {
    let mut prev = 0_i64;
    let count = prev + read_delta(br, double)?;
    if !(0..MAX_SEQ_LEN).contains(&count) {
        return Err(Error::InvalidFrequencyTable);
    }
    prev = count;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let value = prev + read_delta(br, double)?;
        prev = value;
        out.push(value);
    }
    br.align();
    Ok(out)
}

fn read_delta<R: std::io::Read>(br: &mut BitReader<R>, double: bool) -> Result<i64> {
    if next_bit(br)? == 0 {
        return Ok(0);
    }
    let sign = next_bit(br)?;
    let t_len = if double {
        let l_len = unary(br)? + 1;
        if l_len > 7 {
            return Err(Error::InvalidFrequencyTable);
        }
        let l = (1 << (l_len - 1)) | read_tail(br, l_len - 1)?;
        l as u32
    } else {
        unary(br)? + 1
    };
    if t_len > 63 {
        return Err(Error::InvalidFrequencyTable);
    }
    let mag = (1_u64 << (t_len - 1)) | read_tail(br, t_len - 1)?;
    Ok(if sign == 1 {
        mag as i64
    } else {
        -(mag as i64)
    })
}

fn next_bit<R: std::io::Read>(br: &mut BitReader<R>) -> Result<u8> {
    br.bit()?.ok_or(Error::TruncatedStream)
}

fn unary<R: std::io::Read>(br: &mut BitReader<R>) -> Result<u32> {
    let mut ones = 0;
    while next_bit(br)? == 1 {
        ones += 1;
        if ones > 64 {
            return Err(Error::InvalidFrequencyTable);
        }
    }
    Ok(ones)
}

fn read_tail<R: std::io::Read>(br: &mut BitReader<R>, n: u32) -> Result<u64> {
    br.read_bits(n)?.ok_or(Error::TruncatedStream)
}

fn mask(n: u32) -> u64 {
    (1_u64 << n) - 1
}

#[cfg(test)]
mod test {
    use super::*;

    fn round_trip(ints: &[i64], double: bool) {
        let mut bw = BitWriter::new(64);
        delta_encode(&mut bw, ints, double);
        let packed = bw.finish();
        let mut br = BitReader::new(packed.as_slice());
        assert_eq!(delta_decode(&mut br, double).unwrap(), ints);
    }

    #[test]
    fn single_form() {
        round_trip(&[0, 1, 2, 3, 100, 3, 0, 0, 7], false);
        round_trip(&[5, -5, 65535, -65535, 1], false);
    }

    #[test]
    fn double_form() {
        round_trip(&[0, 1, 0xFFFF_FFFF, 12, 0x8000_0000], true);
        round_trip(&[-1, 1, -1, 1], true);
    }

    #[test]
    fn empty_sequence() {
        round_trip(&[], false);
        round_trip(&[], true);
    }

    #[test]
    fn sections_stay_byte_aligned() {
        let mut bw = BitWriter::new(64);
        delta_encode(&mut bw, &[9, 9, 9], false);
        delta_encode(&mut bw, &[4], true);
        let packed = bw.finish();
        let mut br = BitReader::new(packed.as_slice());
        assert_eq!(delta_decode(&mut br, false).unwrap(), vec![9, 9, 9]);
        assert_eq!(delta_decode(&mut br, true).unwrap(), vec![4]);
    }
}
