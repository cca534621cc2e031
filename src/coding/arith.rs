//! 32-bit arithmetic (range) coder with underflow bit-stuffing.
//!
//! The coder is driven by a dense cumulative-frequency table covering
//! symbols 0..=sentinel, where the sentinel (one past the largest input
//! symbol) terminates the stream and is encoded exactly once. The
//! serialized "entry" is the delta-coded dense frequency vector with the
//! encoded bit count appended as one extra trailing element, followed by
//! the byte-aligned encoded bits. All interval arithmetic widens to u64;
//! the total is guarded against exceeding 32 bits.

use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::coding::delta::{delta_decode, delta_encode};
use crate::{Error, Result};

const MAX: u64 = u32::MAX as u64;
const HALF: u32 = 0x8000_0000;
const QUARTER: u32 = 0x4000_0000;

struct Encoder {
    low: u32,
    high: u32,
    uf_count: u32,
    payload: BitWriter,
}

impl Encoder {
    fn new(capacity: usize) -> Self {
        Self {
            low: 0,
            high: u32::MAX,
            uf_count: 0,
            payload: BitWriter::new(capacity),
        }
    }

    fn encode(&mut self, cum: &[u64], total: u64, sym: u32) {
        let w = (self.high - self.low) as u64 + 1;
        let cf_lo = cum[sym as usize];
        let cf_hi = cum[sym as usize + 1];
        self.high = self.low.wrapping_add((w * cf_hi / total - 1) as u32);
        self.low = self.low.wrapping_add((w * cf_lo / total) as u32);
        loop {
            if (self.low & HALF) == (self.high & HALF) {
                let bit = (self.high >> 31) as u8;
                self.payload.push_bit(bit);
                for _ in 0..self.uf_count {
                    self.payload.push_bit(bit ^ 1);
                }
                self.uf_count = 0;
                self.low <<= 1;
                self.high = self.high << 1 | 1;
            } else if (self.low & QUARTER) != 0 && (self.high & QUARTER) == 0 {
                self.uf_count += 1;
                self.low = (self.low - QUARTER) << 1;
                self.high = ((self.high - QUARTER) << 1) | 1;
            } else {
                break;
            }
        }
    }
}

/// Write one arithmetic-coder entry for `data` onto the stream. The writer
/// is left byte-aligned.
pub fn write_entry(bw: &mut BitWriter, data: &[u32]) {
    let sentinel = data.iter().max().map_or(0, |&m| m + 1);
    debug_assert!(sentinel <= 1 << 20, "alphabet too wide for a dense table");
    let mut freqs: Vec<i64> = crate::tools::freq_count::freqs(data, sentinel as usize + 1)
        .iter()
        .map(|&f| f as i64)
        .collect();
    freqs[sentinel as usize] = 1;
    let cum = cumulative(&freqs);
    let total = *cum.last().unwrap();
    debug_assert!(total <= MAX);

    let mut enc = Encoder::new(data.len());
    for &sym in data {
        enc.encode(&cum, total, sym);
    }
    enc.encode(&cum, total, sentinel);
    // Terminator: the value 0b0111... always lands inside the final
    // interval, and its 1-tail doubles as the pending underflow bits.
    enc.payload.push_bit(0);
    enc.payload.push_bit(1);

    let mut vec = freqs;
    vec.push(enc.payload.bit_len() as i64);
    delta_encode(bw, &vec, true);
    bw.extend(&enc.payload.finish());
}

/// Read one arithmetic-coder entry and return the decoded symbols.
pub fn read_entry<R: std::io::Read>(br: &mut BitReader<R>) -> Result<Vec<u32>> {
    let vec = delta_decode(br, true)?;
    if vec.len() < 2 {
        return Err(Error::InvalidFrequencyTable);
    }
    let nbits = vec[vec.len() - 1];
    if nbits < 0 {
        return Err(Error::InvalidFrequencyTable);
    }
    let freqs = &vec[..vec.len() - 1];
    if freqs.iter().any(|&f| f < 0) || *freqs.last().unwrap() < 1 {
        return Err(Error::InvalidFrequencyTable);
    }
    let sentinel = (freqs.len() - 1) as u32;
    let cum = cumulative(freqs);
    let total = *cum.last().unwrap();
    if total > MAX {
        return Err(Error::OversizedTotal);
    }
    let expected = (total - freqs[sentinel as usize] as u64) as usize;
    if expected > 1 << 28 {
        return Err(Error::InvalidFrequencyTable);
    }

    let payload = br
        .bytes((nbits as usize).div_ceil(8))?
        .ok_or(Error::TruncatedStream)?;
    // The encoder pads with 1s; keep feeding 1s past the end of the
    // delimited payload.
    let mut pos = 0_usize;
    let mut next_bit = move |payload: &[u8]| -> u32 {
        let bit = if pos < payload.len() * 8 {
            ((payload[pos >> 3] >> (pos & 7)) & 1) as u32
        } else {
            1
        };
        pos += 1;
        bit
    };

    let mut enc = 0_u32;
    for _ in 0..32 {
        enc = enc << 1 | next_bit(&payload);
    }
    let mut low = 0_u32;
    let mut high = u32::MAX;
    let mut out = Vec::with_capacity(expected);
    loop {
        let w = (high - low) as u64 + 1;
        let ss = (total * (enc.wrapping_sub(low) as u64 + 1) - 1) / w;
        if ss >= total {
            return Err(Error::InvalidFrequencyTable);
        }
        let sym = (cum.partition_point(|&c| c <= ss) - 1) as u32;
        if sym == sentinel {
            break;
        }
        if out.len() == expected {
            return Err(Error::InvalidFrequencyTable);
        }
        out.push(sym);

        let cf_lo = cum[sym as usize];
        let cf_hi = cum[sym as usize + 1];
        let hi_scaled = w * cf_hi / total;
        if hi_scaled == 0 {
            return Err(Error::InvalidFrequencyTable);
        }
        high = low.wrapping_add((hi_scaled - 1) as u32);
        low = low.wrapping_add((w * cf_lo / total) as u32);
        if high < low {
            return Err(Error::InvalidFrequencyTable);
        }
        loop {
            if (low & HALF) == (high & HALF) {
                low <<= 1;
                high = high << 1 | 1;
                enc = enc << 1 | next_bit(&payload);
            } else if (low & QUARTER) != 0 && (high & QUARTER) == 0 {
                low = (low - QUARTER) << 1;
                high = ((high - QUARTER) << 1) | 1;
                enc = ((enc - QUARTER) << 1) | next_bit(&payload);
            } else {
                break;
            }
        }
    }
    Ok(out)
}

fn cumulative(freqs: &[i64]) -> Vec<u64> {
    let mut cum = Vec::with_capacity(freqs.len() + 1);
    let mut sum = 0_u64;
    cum.push(0);
    for &f in freqs {
        sum += f as u64;
        cum.push(sum);
    }
    cum
}
