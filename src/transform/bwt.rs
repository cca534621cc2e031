//! Burrows-Wheeler transform over integer symbol sequences.
//!
//! The forward transform sorts rotation start indices with a cyclic
//! comparator. The comparator is total: it walks at most n positions and
//! falls back to comparing the indices themselves, so rotations of a
//! repeated motif sort in index order and an all-equal block comes out as
//! the identity permutation with key 0.

use log::debug;
use rayon::prelude::*;

use crate::{Error, Result};

// Below this length the parallel sort costs more than it saves.
const PAR_SORT_MIN: usize = 40_000;

/// Forward transform. Returns the key (the rank of the unrotated block)
/// and the sequence of predecessor symbols in sorted rotation order.
pub fn bwt_encode(data: &[u32]) -> (u32, Vec<u32>) {
    let n = data.len();
    if n == 0 {
        return (0, Vec::new());
    }
    let mut index = (0_u32..n as u32).collect::<Vec<u32>>();

    if n > PAR_SORT_MIN {
        index.par_sort_unstable_by(|&a, &b| rot_compare(a as usize, b as usize, data));
    } else {
        index.sort_unstable_by(|&a, &b| rot_compare(a as usize, b as usize, data));
    }

    let mut key = 0_u32;
    let mut bwt = vec![0; n];
    for (i, &rot) in index.iter().enumerate() {
        if rot == 0 {
            key = i as u32;
            bwt[i] = data[n - 1];
        } else {
            bwt[i] = data[rot as usize - 1];
        }
    }
    debug!("BWT of {} symbols, key {}", n, key);
    (key, bwt)
}

/// Compare two rotations of the block, wrapping around the end. Equal
/// rotations (the input is a repeated motif) fall back to index order so
/// the sort stays deterministic.
fn rot_compare(a: usize, b: usize, block: &[u32]) -> std::cmp::Ordering {
    let n = block.len();
    let (mut i, mut j) = (a, b);
    for _ in 0..n {
        match block[i].cmp(&block[j]) {
            std::cmp::Ordering::Equal => {
                i += 1;
                if i == n {
                    i = 0;
                }
                j += 1;
                if j == n {
                    j = 0;
                }
            }
            ord => return ord,
        }
    }
    a.cmp(&b)
}

/// Decode a Burrows-Wheeler transform in O(n) using the LF-mapping table:
/// a counting pass assigns each position of the sorted first column the
/// next unused position of its symbol in the last column.
pub fn bwt_decode(key: u32, bwt: &[u32]) -> Result<Vec<u32>> {
    let end = bwt.len();
    if end == 0 {
        return Ok(Vec::new());
    }
    if key as usize >= end {
        return Err(Error::InvalidBwtKey);
    }

    // Convert the symbol frequency count to a cumulative sum.
    let max = *bwt.iter().max().unwrap() as usize;
    let mut freq = vec![0_u32; max + 2];
    for &s in bwt {
        freq[s as usize + 1] += 1;
    }
    for i in 0..max + 1 {
        freq[i + 1] += freq[i];
    }

    // Build the transformation vector that finds the next symbol of the
    // original block.
    let mut t_vec = vec![0_u32; end];
    for (i, &s) in bwt.iter().enumerate() {
        t_vec[freq[s as usize] as usize] = i as u32;
        freq[s as usize] += 1;
    }

    let mut out = vec![0_u32; end];
    let mut i = key;
    for slot in out.iter_mut() {
        i = t_vec[i as usize];
        *slot = bwt[i as usize];
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;

    fn syms(text: &str) -> Vec<u32> {
        text.bytes().map(u32::from).collect()
    }

    #[test]
    fn banana_is_classic() {
        let (key, bwt) = bwt_encode(&syms("banana"));
        assert_eq!(key, 3);
        assert_eq!(bwt, syms("nnbaaa"));
        assert_eq!(bwt_decode(key, &bwt).unwrap(), syms("banana"));
    }

    #[test]
    fn round_trip_text() {
        let data = syms("it was the best of times, it was the worst of times");
        let (key, bwt) = bwt_encode(&data);
        assert_eq!(bwt_decode(key, &bwt).unwrap(), data);
    }

    #[test]
    fn all_equal_block_is_identity() {
        let data = vec![9_u32; 517];
        let (key, bwt) = bwt_encode(&data);
        assert_eq!(key, 0);
        assert_eq!(bwt, data);
        assert_eq!(bwt_decode(key, &bwt).unwrap(), data);
    }

    #[test]
    fn repeated_motif_round_trips() {
        let data: Vec<u32> = (0..600).map(|i| [7, 1, 7][i % 3]).collect();
        let (key, bwt) = bwt_encode(&data);
        assert_eq!(bwt_decode(key, &bwt).unwrap(), data);
    }

    #[test]
    fn tiny_blocks() {
        for data in [vec![], vec![42], vec![3, 2], vec![2, 3]] {
            let (key, bwt) = bwt_encode(&data);
            assert_eq!(bwt_decode(key, &bwt).unwrap(), data);
        }
    }

    #[test]
    fn bad_key_is_rejected() {
        assert!(bwt_decode(5, &[1, 2, 3]).is_err());
    }
}
