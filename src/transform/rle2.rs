//! Zero-run binary run length coding (ZRLE).
//!
//! Non-zero symbols shift up by one; a run of z zeros becomes the binary
//! expansion of z+1 with its leading 1 stripped, written as {0,1} symbols
//! most-significant bit first. The two alphabets stay disjoint because
//! shifted symbols are always at least 2.

use crate::{Error, Result};

pub fn rle2_encode(data: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(data.len());
    let mut idx = 0_usize;
    while idx < data.len() {
        if data[idx] == 0 {
            let mut run = 1_u64;
            while idx + (run as usize) < data.len() && data[idx + run as usize] == 0 {
                run += 1;
            }
            idx += run as usize;
            let v = run + 1;
            for shift in (0..63 - v.leading_zeros()).rev() {
                out.push(((v >> shift) & 1) as u32);
            }
        } else {
            out.push(data[idx] + 1);
            idx += 1;
        }
    }
    out
}

pub fn rle2_decode(data: &[u32]) -> Result<Vec<u32>> {
    let mut out = Vec::with_capacity(data.len());
    let mut idx = 0_usize;
    while idx < data.len() {
        if data[idx] < 2 {
            // Accumulate the run bits behind an implicit leading 1.
            let mut v = 1_u64;
            let mut bits = 0;
            while idx < data.len() && data[idx] < 2 {
                v = v << 1 | data[idx] as u64;
                idx += 1;
                bits += 1;
                if bits > 32 {
                    return Err(Error::InvalidRunCount);
                }
            }
            out.extend(std::iter::repeat(0).take((v - 1) as usize));
        } else {
            out.push(data[idx] - 1);
            idx += 1;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;

    fn round_trip(data: &[u32]) -> Vec<u32> {
        let encoded = rle2_encode(data);
        assert_eq!(rle2_decode(&encoded).unwrap(), data);
        encoded
    }

    #[test]
    fn short_zero_runs() {
        // One zero -> "10" minus the leading 1 -> a single 0 symbol.
        assert_eq!(round_trip(&[0]), vec![0]);
        assert_eq!(round_trip(&[0, 0]), vec![1]);
        assert_eq!(round_trip(&[0, 0, 0]), vec![0, 0]);
    }

    #[test]
    fn mixed_stream() {
        let data = vec![0, 0, 5, 0, 7, 7, 0, 0, 0, 0, 1];
        let encoded = round_trip(&data);
        assert_eq!(encoded, vec![1, 6, 0, 8, 8, 0, 1, 2]);
    }

    #[test]
    fn long_run() {
        let mut data = vec![0_u32; 100_000];
        data.push(9);
        round_trip(&data);
    }

    #[test]
    fn no_zeros_just_shifts() {
        assert_eq!(round_trip(&[3, 1, 2]), vec![4, 2, 3]);
    }

    #[test]
    fn empty() {
        assert_eq!(round_trip(&[]), vec![]);
    }
}
