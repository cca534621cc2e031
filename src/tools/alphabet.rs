//! Encode which subset of the byte alphabet a chunk uses.
//!
//! The 256 possible symbols split into eight groups of 32. A header byte
//! marks the populated groups (bit 7 = group 0); each marked group then
//! contributes a 32-bit bitmap (bit 31 = the group's first symbol). The
//! bitmap values travel delta-coded in double form since they span the
//! full 32-bit range.

use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::coding::delta::{delta_decode, delta_encode};
use crate::{Error, Result};

/// Write the alphabet (ascending distinct symbols, all < 256).
pub fn encode_alphabet(bw: &mut BitWriter, alphabet: &[u32]) {
    let mut groups = 0_u8;
    let mut bitmaps = [0_u32; 8];
    for &sym in alphabet {
        debug_assert!(sym < 256);
        let group = (sym >> 5) as usize;
        groups |= 0x80 >> group;
        bitmaps[group] |= 0x8000_0000 >> (sym & 31);
    }
    bw.out8(groups);
    let marked: Vec<i64> = (0..8)
        .filter(|&g| groups & (0x80 >> g) != 0)
        .map(|g| bitmaps[g] as i64)
        .collect();
    delta_encode(bw, &marked, true);
}

/// Read an alphabet back as its ascending symbol list.
pub fn decode_alphabet<R: std::io::Read>(br: &mut BitReader<R>) -> Result<Vec<u32>> {
    let groups = br.byte()?.ok_or(Error::TruncatedStream)?;
    let bitmaps = delta_decode(br, true)?;
    if bitmaps.len() != groups.count_ones() as usize {
        return Err(Error::InvalidFrequencyTable);
    }
    let mut alphabet = Vec::new();
    let mut next = bitmaps.iter();
    for group in 0..8_u32 {
        if groups & (0x80 >> group) == 0 {
            continue;
        }
        let &bitmap = next.next().unwrap();
        if !(0..=u32::MAX as i64).contains(&bitmap) {
            return Err(Error::InvalidFrequencyTable);
        }
        let bitmap = bitmap as u32;
        for bit in 0..32 {
            if bitmap & (0x8000_0000 >> bit) != 0 {
                alphabet.push(group * 32 + bit);
            }
        }
    }
    Ok(alphabet)
}
