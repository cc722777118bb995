//! Wavelet trees: access/rank/select over arbitrary-alphabet texts.
//!
//! A wavelet tree decomposes a text along the bits of a binary code. The
//! root holds one bit per symbol (the first bit of its codeword); the left
//! subtree represents the subsequence of symbols whose bit was `0`, the
//! right subtree those whose bit was `1`, and so on recursively. The tree
//! shape therefore mirrors the codec's code tree, and every query is a walk
//! of at most `max code length` rank or select operations on plain
//! bitvectors.
//!
//! Nodes own their children; upward walks (needed by `select`) retain the
//! downward path instead of storing parent pointers.

use crate::bits::{BitBuf, BitVec, RankSelect};
use crate::code::{Code, Codec};
use crate::error::{Error, Result};

/// A wavelet tree over a text, shaped by a [`Codec`].
#[derive(Debug, Clone)]
pub struct WaveletTree<C: Codec> {
    codec: C,
    root: WtNode,
}

#[derive(Debug, Clone)]
struct WtNode {
    bv: BitVec,
    children: [Option<Box<WtNode>>; 2],
}

#[derive(Default)]
struct BuildNode {
    buf: BitBuf,
    children: [Option<Box<BuildNode>>; 2],
}

impl BuildNode {
    fn freeze(self) -> WtNode {
        let [left, right] = self.children;
        WtNode {
            bv: self.buf.freeze(),
            children: [
                left.map(|c| Box::new(c.freeze())),
                right.map(|c| Box::new(c.freeze())),
            ],
        }
    }
}

impl<C: Codec> WaveletTree<C> {
    /// Build a wavelet tree over `text`, splitting on the bits of
    /// `codec.encode(symbol)`.
    pub fn new(text: &str, codec: C) -> Result<Self> {
        let mut root = BuildNode::default();
        for sym in text.chars() {
            let code = codec.encode(sym)?;
            let mut node = &mut root;
            for bit in code.iter() {
                node.buf.push(bit);
                node = node.children[bit as usize]
                    .get_or_insert_with(Default::default)
                    .as_mut();
            }
        }
        Ok(Self {
            codec,
            root: root.freeze(),
        })
    }

    /// Number of symbols in the text.
    #[inline]
    pub fn len(&self) -> usize {
        self.root.bv.len()
    }

    /// Whether the text is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The symbol at position `i`.
    pub fn get(&self, i: usize) -> Result<char> {
        if i >= self.len() {
            return Err(Error::index(i as isize, self.len()));
        }
        let mut code = Code::new();
        let mut idx = i;
        let mut node = &self.root;
        while !node.bv.is_empty() {
            let bit = node.bv.bit(idx);
            code.push(bit);
            idx = rank_inclusive(&node.bv, bit, idx) - 1;
            node = node.children[bit as usize]
                .as_deref()
                .expect("observed bit implies the child exists");
        }
        self.codec.decode(&code)
    }

    /// Number of occurrences of `sym` at or before position `i`.
    pub fn rank(&self, sym: char, i: usize) -> Result<usize> {
        if i >= self.len() {
            return Err(Error::index(i as isize, self.len()));
        }
        let code = self.codec.encode(sym)?;
        let mut idx = i;
        let mut node = &self.root;
        let mut cnt = 0;
        for bit in code.iter() {
            if node.bv.is_empty() {
                break;
            }
            cnt = rank_inclusive(&node.bv, bit, idx);
            if cnt == 0 {
                break;
            }
            idx = cnt - 1;
            node = match node.children[bit as usize].as_deref() {
                Some(child) => child,
                None => break,
            };
        }
        Ok(cnt)
    }

    /// Position of the `k`-th (1-indexed) occurrence of `sym`.
    pub fn select(&self, sym: char, k: usize) -> Result<usize> {
        if k == 0 || k > self.len() {
            return Err(Error::count(format!("count {} out of range", k)));
        }
        let code = self.codec.encode(sym)?;

        // descend to the symbol's leaf, retaining the path
        let mut path = Vec::with_capacity(code.len());
        let mut node = &self.root;
        for bit in code.iter() {
            path.push((node, bit));
            node = node.children[bit as usize].as_deref().ok_or_else(|| {
                Error::count(format!("{:?} does not occur in text", sym))
            })?;
        }

        // walk back up, translating the occurrence rank level by level
        let mut cnt = k;
        let mut idx = 0;
        for &(node, bit) in path.iter().rev() {
            idx = select_nth(&node.bv, bit, cnt).ok_or_else(|| {
                Error::count(format!("{:?} occurs in text fewer than {} times", sym, k))
            })?;
            cnt = idx + 1;
        }
        Ok(idx)
    }
}

/// Occurrences of `bit` in positions `[0, i]`.
#[inline]
fn rank_inclusive(bv: &BitVec, bit: bool, i: usize) -> usize {
    if bit {
        bv.rank1(i + 1)
    } else {
        bv.rank0(i + 1)
    }
}

/// Position of the `k`-th (1-indexed) occurrence of `bit`.
#[inline]
fn select_nth(bv: &BitVec, bit: bool, k: usize) -> Option<usize> {
    if bit {
        bv.select1(k - 1)
    } else {
        bv.select0(k - 1)
    }
}
