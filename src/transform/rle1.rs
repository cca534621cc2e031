//! Run-of-four run length coding.
//!
//! After four identical symbols the encoder inserts a single count symbol
//! holding the number of extra repetitions, zero included. The cap is 255
//! in the byte-domain containers; MRA caps at 254 to keep 255 out of its
//! run alphabet. Source runs longer than 4 + cap start over as a fresh
//! run after the count symbol.

use crate::{Error, Result};

/// Encode runs of four or more identical symbols.
pub fn rle1_encode(data: &[u32], max_run: u32) -> Vec<u32> {
    if data.len() < 4 {
        return data.to_vec();
    }
    // Extending by chunks is faster than pushing each symbol; remember
    // where the pending stretch started.
    let mut start = 0_usize;
    let mut out = Vec::with_capacity(data.len() * 5 / 4);
    let mut idx = 3;
    while idx < data.len() {
        // The four identical symbols must all sit inside the pending
        // stretch, or the decoder would see a phantom run.
        if idx >= start + 3
            && data[idx] == data[idx - 1]
            && data[idx] == data[idx - 2]
            && data[idx] == data[idx - 3]
        {
            // Write everything through the run of four, then the count of
            // extra repetitions that follow it.
            out.extend_from_slice(&data[start..=idx]);
            let dups = count_dups(data, idx, max_run);
            out.push(dups);
            idx += 1 + dups as usize;
            start = idx;
        } else {
            idx += 1;
        }
    }
    out.extend_from_slice(&data[start..]);
    out
}

/// How many identical symbols follow position i, capped.
fn count_dups(data: &[u32], i: usize, max_run: u32) -> u32 {
    data.iter()
        .skip(i + 1)
        .take(max_run as usize)
        .position(|&x| x != data[i])
        .unwrap_or_else(|| max_run.min((data.len() - i - 1) as u32) as usize) as u32
}

/// Undo runs of four or more identical symbols. The count symbol after a
/// run of four must be present and within the cap.
pub fn rle1_decode(data: &[u32], max_run: u32) -> Result<Vec<u32>> {
    let mut out = Vec::with_capacity(data.len() * 11 / 10);
    let mut idx = 0_usize;
    let mut run = 0_usize;
    let mut prev = None;
    while idx < data.len() {
        let sym = data[idx];
        idx += 1;
        if prev == Some(sym) {
            run += 1;
        } else {
            run = 1;
            prev = Some(sym);
        }
        out.push(sym);
        if run == 4 {
            let count = *data.get(idx).ok_or(Error::TruncatedStream)?;
            idx += 1;
            if count > max_run {
                return Err(Error::InvalidRunCount);
            }
            out.extend(std::iter::repeat(sym).take(count as usize));
            run = 0;
            prev = None;
        }
    }
    Ok(out)
}
