//! Symbol frequency counting for the entropy coder preambles.
//!
//! NOTE: This uses multi-threading when the data is over 64k in length.

use rayon::prelude::*;

/// Returns a dense frequency count of the input, indexed 0..=max_symbol.
pub fn freqs(data: &[u32], table_len: usize) -> Vec<u32> {
    if data.len() > 64_000 {
        // 16k is pretty much the sweet spot for chunk size.
        data.par_chunks(16_000)
            .fold(
                || vec![0_u32; table_len],
                |mut freqs, chunk| {
                    chunk.iter().for_each(|&el| freqs[el as usize] += 1);
                    freqs
                },
            )
            .reduce(
                || vec![0_u32; table_len],
                |mut acc, f| {
                    acc.iter_mut().zip(&f).for_each(|(a, b)| *a += b);
                    acc
                },
            )
    } else {
        let mut freqs = vec![0_u32; table_len];
        data.iter().for_each(|&el| freqs[el as usize] += 1);
        freqs
    }
}

#[cfg(test)]
mod test {
    use super::freqs;

    #[test]
    fn counts_match_by_hand() {
        let data = vec![0, 1, 1, 3, 3, 3];
        assert_eq!(freqs(&data, 4), vec![1, 2, 0, 3]);
    }

    #[test]
    fn parallel_path_agrees_with_serial() {
        let data: Vec<u32> = (0..100_000).map(|i| i % 13).collect();
        let serial = freqs(&data[..50_000], 13);
        let parallel = freqs(&data, 13);
        let expected: Vec<u32> = (0..13)
            .map(|s| data.iter().filter(|&&x| x == s).count() as u32)
            .collect();
        assert_eq!(parallel, expected);
        assert_eq!(serial.iter().sum::<u32>(), 50_000);
    }
}
