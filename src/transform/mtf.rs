//! Move-to-front transform over an explicit alphabet.

use crate::{Error, Result};

/// Encode data against an alphabet that covers every symbol in the input
/// (normally its sorted distinct symbols). The output is the index of each
/// symbol in the self-adjusting alphabet.
pub fn mtf_encode(data: &[u32], alphabet: &[u32]) -> Vec<u32> {
    let mut index = alphabet.to_vec();
    let mut out = Vec::with_capacity(data.len());
    for &sym in data {
        let idx = index.iter().position(|&c| c == sym).unwrap();
        out.push(idx as u32);
        // Shift everything in front of the symbol one right, then put the
        // symbol at the front.
        index[..=idx].rotate_right(1);
    }
    out
}

/// Invert the transform with the same initial alphabet.
pub fn mtf_decode(data: &[u32], alphabet: &[u32]) -> Result<Vec<u32>> {
    let mut index = alphabet.to_vec();
    let mut out = Vec::with_capacity(data.len());
    for &idx in data {
        let idx = idx as usize;
        if idx >= index.len() {
            return Err(Error::InvalidSymbol);
        }
        out.push(index[idx]);
        index[..=idx].rotate_right(1);
    }
    Ok(out)
}

/// The sorted distinct symbols of a block, the default MTF alphabet.
pub fn alphabet_of(data: &[u32]) -> Vec<u32> {
    let mut alphabet = data.to_vec();
    alphabet.sort_unstable();
    alphabet.dedup();
    alphabet
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn front_runs_become_zeros() {
        let data = vec![5, 5, 5, 2, 2, 5];
        let alphabet = alphabet_of(&data);
        assert_eq!(alphabet, vec![2, 5]);
        let mtf = mtf_encode(&data, &alphabet);
        assert_eq!(mtf, vec![1, 0, 0, 1, 0, 1]);
        assert_eq!(mtf_decode(&mtf, &alphabet).unwrap(), data);
    }

    #[test]
    fn round_trip_bytes() {
        let data: Vec<u32> = "abracadabra abracadabra".bytes().map(u32::from).collect();
        let alphabet = alphabet_of(&data);
        let mtf = mtf_encode(&data, &alphabet);
        assert_eq!(mtf_decode(&mtf, &alphabet).unwrap(), data);
    }

    #[test]
    fn oversized_alphabet_is_fine() {
        let data = vec![1, 200, 1];
        let alphabet: Vec<u32> = (0..=255).collect();
        let mtf = mtf_encode(&data, &alphabet);
        assert_eq!(mtf, vec![1, 200, 1]);
        assert_eq!(mtf_decode(&mtf, &alphabet).unwrap(), data);
    }

    #[test]
    fn bad_index_is_rejected() {
        assert!(mtf_decode(&[3], &[1, 2]).is_err());
    }
}
