//! Canonical Huffman coding over arbitrary integer symbols.
//!
//! A tree is built from a frequency table by repeatedly merging the two
//! lowest-weight nodes; ties pop the node whose smallest contained symbol
//! is lower, so encoder and decoder grow identical trees from identical
//! tables. The serialized form is a self-delimiting "entry": the sorted
//! symbol list (delta coded), the frequency list in the same order (delta
//! coded, double form), a 32-bit big-endian count of code bits, and the
//! code bits themselves padded to a byte boundary.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::coding::delta::{delta_decode, delta_encode};
use crate::{Error, Result};

#[derive(Debug)]
pub enum NodeData {
    Kids(Box<Node>, Box<Node>),
    Leaf(u32),
}

#[derive(Debug)]
pub struct Node {
    pub weight: u64,
    pub sym: u32,
    pub node_data: NodeData,
}

impl Node {
    fn new(weight: u64, sym: u32, node_data: NodeData) -> Node {
        Node {
            weight,
            sym,
            node_data,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.sym == other.sym
    }
}
impl Eq for Node {}
impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Node {
    /// Order nodes by weight, ties broken by the smallest symbol value in
    /// the subtree. The heap pops the minimum first.
    fn cmp(&self, other: &Self) -> Ordering {
        (self.weight, self.sym).cmp(&(other.weight, other.sym))
    }
}

/// Build the merge tree for a set of (symbol, weight) pairs. Returns None
/// for an empty alphabet.
pub fn build_tree(pairs: &[(u32, u64)]) -> Option<Node> {
    let mut heap = std::collections::BinaryHeap::with_capacity(pairs.len());
    for &(sym, weight) in pairs {
        heap.push(std::cmp::Reverse(Node::new(weight, sym, NodeData::Leaf(sym))));
    }
    while heap.len() > 1 {
        let left = heap.pop().unwrap().0;
        let right = heap.pop().unwrap().0;
        heap.push(std::cmp::Reverse(Node::new(
            left.weight + right.weight,
            left.sym.min(right.sym),
            NodeData::Kids(Box::new(left), Box::new(right)),
        )));
    }
    heap.pop().map(|n| n.0)
}

/// Walk the tree with an explicit stack and collect a code per symbol,
/// left edges as 0 and right edges as 1. A one-symbol alphabet gets the
/// single code "0".
pub fn code_table(root: &Node) -> BTreeMap<u32, (u64, u8)> {
    let mut codes = BTreeMap::new();
    let mut stack: Vec<(&Node, u64, u8)> = vec![(root, 0, 0)];
    while let Some((node, code, len)) = stack.pop() {
        match &node.node_data {
            NodeData::Kids(left, right) => {
                stack.push((left, code << 1, len + 1));
                stack.push((right, code << 1 | 1, len + 1));
            }
            NodeData::Leaf(sym) => {
                codes.insert(*sym, if len == 0 { (0, 1) } else { (code, len) });
            }
        }
    }
    codes
}

/// Write one Huffman entry for `data` onto the stream. The writer is left
/// byte-aligned.
pub fn write_entry(bw: &mut BitWriter, data: &[u32]) {
    let mut freq: BTreeMap<u32, u64> = BTreeMap::new();
    for &sym in data {
        *freq.entry(sym).or_insert(0) += 1;
    }
    let syms: Vec<i64> = freq.keys().map(|&s| s as i64).collect();
    let counts: Vec<i64> = freq.values().map(|&f| f as i64).collect();
    delta_encode(bw, &syms, false);
    delta_encode(bw, &counts, true);

    let pairs: Vec<(u32, u64)> = freq.iter().map(|(&s, &f)| (s, f)).collect();
    let mut payload = BitWriter::new(data.len());
    if let Some(root) = build_tree(&pairs) {
        let codes = code_table(&root);
        for sym in data {
            let (code, len) = codes[sym];
            payload.write_bits(code, len as u32);
        }
    }
    bw.out32_be(payload.bit_len() as u32);
    bw.extend(&payload.finish());
}

/// Read one Huffman entry and return the decoded symbol sequence.
pub fn read_entry<R: std::io::Read>(br: &mut BitReader<R>) -> Result<Vec<u32>> {
    let syms = delta_decode(br, false)?;
    let counts = delta_decode(br, true)?;
    if syms.len() != counts.len() {
        return Err(Error::InvalidFrequencyTable);
    }
    let mut pairs = Vec::with_capacity(syms.len());
    let mut total = 0_u64;
    for (&sym, &count) in syms.iter().zip(counts.iter()) {
        if !(0..=u32::MAX as i64).contains(&sym) || count < 1 {
            return Err(Error::InvalidFrequencyTable);
        }
        if let Some(&(last, _)) = pairs.last() {
            if sym as u32 <= last {
                return Err(Error::InvalidFrequencyTable);
            }
        }
        pairs.push((sym as u32, count as u64));
        total += count as u64;
    }
    if total > 1 << 28 {
        return Err(Error::InvalidFrequencyTable);
    }

    let nbits = match br.bytes(4)? {
        Some(b) => u32::from_be_bytes([b[0], b[1], b[2], b[3]]) as usize,
        None => return Err(Error::TruncatedStream),
    };
    let payload = br
        .bytes(nbits.div_ceil(8))?
        .ok_or(Error::TruncatedStream)?;

    let root = match build_tree(&pairs) {
        Some(root) => root,
        None => {
            if nbits != 0 {
                return Err(Error::InvalidFrequencyTable);
            }
            return Ok(Vec::new());
        }
    };

    let mut out = Vec::with_capacity(total as usize);
    let bit_at = |i: usize| (payload[i >> 3] >> (i & 7)) & 1;
    // A one-symbol alphabet still costs one bit per symbol.
    let single = matches!(root.node_data, NodeData::Leaf(_));
    let mut used = 0;
    while used < nbits {
        let mut node = &root;
        loop {
            match &node.node_data {
                NodeData::Leaf(sym) => {
                    if single {
                        used += 1;
                    }
                    out.push(*sym);
                    break;
                }
                NodeData::Kids(left, right) => {
                    if used >= nbits {
                        return Err(Error::InvalidFrequencyTable);
                    }
                    let bit = bit_at(used);
                    used += 1;
                    node = if bit == 0 { left } else { right };
                }
            }
        }
    }
    if out.len() as u64 != total {
        return Err(Error::InvalidFrequencyTable);
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;

    fn round_trip(data: &[u32]) {
        let mut bw = BitWriter::new(64);
        write_entry(&mut bw, data);
        let packed = bw.finish();
        let mut br = BitReader::new(packed.as_slice());
        assert_eq!(read_entry(&mut br).unwrap(), data);
    }

    #[test]
    fn text_round_trip() {
        let data: Vec<u32> = "the quick brown fox jumps over the lazy dog"
            .bytes()
            .map(u32::from)
            .collect();
        round_trip(&data);
    }

    #[test]
    fn one_symbol_alphabet() {
        round_trip(&[7, 7, 7, 7, 7, 7]);
    }

    #[test]
    fn empty_entry() {
        round_trip(&[]);
    }

    #[test]
    fn wide_symbols() {
        round_trip(&[0, 256, 65535, 256, 256, 0, 70000]);
    }

    #[test]
    fn codes_satisfy_kraft() {
        let pairs: Vec<(u32, u64)> = [(0_u32, 45_u64), (1, 13), (2, 12), (3, 16), (4, 9), (5, 5)]
            .to_vec();
        let root = build_tree(&pairs).unwrap();
        let codes = code_table(&root);
        let kraft: f64 = codes.values().map(|&(_, len)| (0.5_f64).powi(len as i32)).sum();
        assert!((kraft - 1.0).abs() < 1e-9);
        // Prefix-free: no code is a prefix of another.
        let list: Vec<(u64, u8)> = codes.values().copied().collect();
        for (i, &(ca, la)) in list.iter().enumerate() {
            for &(cb, lb) in list.iter().skip(i + 1) {
                let shared = la.min(lb) as u32;
                assert_ne!(ca >> (la as u32 - shared), cb >> (lb as u32 - shared));
            }
        }
    }
}
