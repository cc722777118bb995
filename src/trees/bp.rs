//! Balanced parentheses encoding with excess-based search primitives.
//!
//! A [`BalancedParens`] views a [`BitVec`] as a parenthesis string where
//! `1` is `'('` and `0` is `')'`. All tree navigation reduces to a small
//! algebra over the *excess* function
//!
//! ```text
//! excess(i) = #opens - #closes over positions [0, i]
//! ```
//!
//! and six primitives on it: `fwdsearch`, `bwdsearch`, `firstmin`,
//! `firstmax`, `countmin`, and `selectmin`.
//!
//! The primitives are answered in O(log n) with a range min-max tree: a
//! flat segment tree over 64-bit blocks storing, per node, the total excess
//! change across the node, the minimum and maximum prefix excess within it,
//! and the number of positions attaining the minimum. Because excess moves
//! in steps of exactly one, a block whose `[min, max]` window straddles a
//! target value is guaranteed to contain it, so a search descends along a
//! single root-to-leaf path.

use crate::bits::{BitVec, RankSelect};
use crate::error::{Error, Result};

/// Sentinel for min/max of padding nodes; far outside any attainable excess.
const MIN_NEUTRAL: i32 = i32::MAX / 4;
const MAX_NEUTRAL: i32 = i32::MIN / 4;

/// Flat segment tree over 64-bit blocks of the parenthesis bitmap.
#[derive(Debug, Clone)]
struct RangeMinMax {
    /// Number of real blocks.
    blocks: usize,
    /// Leaf capacity; a power of two, `>= blocks`.
    base: usize,
    /// Per node: excess change across its range.
    delta: Vec<i32>,
    /// Per node: minimum prefix excess within its range, relative to entry.
    min: Vec<i32>,
    /// Per node: maximum prefix excess within its range, relative to entry.
    max: Vec<i32>,
    /// Per node: number of positions attaining the minimum.
    nmin: Vec<u32>,
}

impl RangeMinMax {
    fn build(bv: &BitVec) -> Self {
        let len = bv.len();
        let blocks = len.div_ceil(64).max(1);
        let base = blocks.next_power_of_two();
        let size = 2 * base;

        let mut delta = vec![0i32; size];
        let mut min = vec![MIN_NEUTRAL; size];
        let mut max = vec![MAX_NEUTRAL; size];
        let mut nmin = vec![0u32; size];

        for b in 0..blocks {
            let start = b * 64;
            let end = (start + 64).min(len);
            let mut e = 0i32;
            let (mut m, mut x, mut cnt) = (i32::MAX, i32::MIN, 0u32);
            for p in start..end {
                e += if bv.bit(p) { 1 } else { -1 };
                if e < m {
                    m = e;
                    cnt = 1;
                } else if e == m {
                    cnt += 1;
                }
                x = x.max(e);
            }
            let v = base + b;
            delta[v] = e;
            min[v] = m;
            max[v] = x;
            nmin[v] = cnt;
        }

        for v in (1..base).rev() {
            let (l, r) = (2 * v, 2 * v + 1);
            delta[v] = delta[l] + delta[r];
            min[v] = min[l].min(delta[l] + min[r]);
            max[v] = max[l].max(delta[l] + max[r]);
            let mut n = 0;
            if min[l] == min[v] {
                n += nmin[l];
            }
            if delta[l] + min[r] == min[v] {
                n += nmin[r];
            }
            nmin[v] = n;
        }

        Self {
            blocks,
            base,
            delta,
            min,
            max,
            nmin,
        }
    }

    #[inline]
    fn leaf(&self, block: usize) -> usize {
        self.base + block
    }

    #[inline]
    fn contains(&self, v: usize, entry: isize, target: isize) -> bool {
        entry + self.min[v] as isize <= target && target <= entry + self.max[v] as isize
    }
}

/// A segment of the canonical decomposition of a position range: either a
/// run of raw bit positions (inclusive) or a whole segment-tree node.
enum Seg {
    Bits(usize, usize),
    Node(usize),
}

/// An ordinal tree encoded as balanced parentheses.
#[derive(Debug, Clone)]
pub struct BalancedParens {
    bv: BitVec,
    rmm: RangeMinMax,
}

impl BalancedParens {
    /// Wrap a bitvector, validating that it encodes balanced parentheses.
    ///
    /// The encoding must be non-empty, of even length, keep every prefix
    /// excess non-negative, and end with excess zero.
    pub fn new(bv: BitVec) -> Result<Self> {
        let rmm = RangeMinMax::build(&bv);
        let root = 1;
        let balanced = !bv.is_empty()
            && bv.len() % 2 == 0
            && rmm.delta[root] == 0
            && rmm.min[root] >= 0;
        if !balanced {
            return Err(Error::domain("unbalanced parentheses encoding"));
        }
        Ok(Self { bv, rmm })
    }

    /// Parse a string of `'('` and `')'` characters.
    pub fn from_parens(s: &str) -> Result<Self> {
        let mut buf = crate::bits::BitBuf::new();
        for c in s.chars() {
            match c {
                '(' => buf.push(true),
                ')' => buf.push(false),
                _ => return Err(Error::domain(format!("invalid parenthesis '{}'", c))),
            }
        }
        Self::new(buf.freeze())
    }

    /// Number of parentheses.
    #[inline]
    pub fn len(&self) -> usize {
        self.bv.len()
    }

    /// Always false; an empty encoding is rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bv.is_empty()
    }

    /// The underlying bitvector.
    #[inline]
    pub fn bitvec(&self) -> &BitVec {
        &self.bv
    }

    /// True if position `i` holds `'('`.
    #[inline]
    pub(crate) fn is_open(&self, i: usize) -> bool {
        self.bv.bit(i)
    }

    #[inline]
    fn step(&self, i: usize) -> isize {
        if self.bv.bit(i) {
            1
        } else {
            -1
        }
    }

    /// Excess of the prefix of length `p` (excess *before* position `p`).
    #[inline]
    fn prefix_excess(&self, p: usize) -> isize {
        2 * self.bv.rank1(p) as isize - p as isize
    }

    /// Number of `'('` minus number of `')'` in positions `[0, i]`.
    #[inline]
    pub fn excess(&self, i: usize) -> isize {
        debug_assert!(i < self.len());
        self.prefix_excess(i + 1)
    }

    /// Position of the `'('` matching the `')'` at `i`.
    pub fn open(&self, i: usize) -> Result<usize> {
        if i >= self.len() {
            return Err(Error::index(i as isize, self.len()));
        }
        if self.is_open(i) {
            return Err(Error::domain(format!("open({}) called on '('", i)));
        }
        Ok((self.bwdsearch(i as isize, 0)? + 1) as usize)
    }

    /// Position of the `')'` matching the `'('` at `i`.
    pub fn close(&self, i: usize) -> Result<usize> {
        if i >= self.len() {
            return Err(Error::index(i as isize, self.len()));
        }
        if !self.is_open(i) {
            return Err(Error::domain(format!("close({}) called on ')'", i)));
        }
        self.fwdsearch(i as isize, -1)
    }

    /// Opening position of the nearest pair strictly enclosing position `i`.
    pub fn enclose(&self, i: usize) -> Result<usize> {
        if i == 0 || i + 1 >= self.len() {
            return Err(Error::domain("no node encloses the root"));
        }
        let i = if self.is_open(i) { i } else { self.open(i)? };
        Ok((self.bwdsearch(i as isize, -2)? + 1) as usize)
    }

    /// Smallest `j > i` with `excess(j) = excess(i) + d`.
    ///
    /// `i = -1` scans from the start with a base excess of zero.
    pub fn fwdsearch(&self, i: isize, d: isize) -> Result<usize> {
        let len = self.len();
        if i < -1 || i >= len as isize {
            return Err(Error::index(i, len));
        }
        let base = if i < 0 { 0 } else { self.excess(i as usize) };
        let target = base + d;
        let start = (i + 1) as usize;
        if start >= len {
            return Err(Error::not_found(format!(
                "excess {} not found after {}",
                target, i
            )));
        }

        // scan the remainder of the starting block
        let block_end = ((start / 64) + 1) * 64;
        let scan_end = block_end.min(len);
        let mut e = base;
        for j in start..scan_end {
            e += self.step(j);
            if e == target {
                return Ok(j);
            }
        }

        // climb right over sibling subtrees until one covers the target
        let rmm = &self.rmm;
        let mut v = rmm.leaf(start / 64);
        loop {
            while v != 1 && v & 1 == 1 {
                v >>= 1;
            }
            if v == 1 {
                return Err(Error::not_found(format!(
                    "excess {} not found after {}",
                    target, i
                )));
            }
            v += 1;
            if rmm.contains(v, e, target) {
                break;
            }
            e += rmm.delta[v] as isize;
        }

        // descend to the leftmost covering block
        while v < rmm.base {
            let l = 2 * v;
            if rmm.contains(l, e, target) {
                v = l;
            } else {
                e += rmm.delta[l] as isize;
                v = l + 1;
            }
        }

        let b = v - rmm.base;
        let end = ((b * 64) + 64).min(len);
        for j in b * 64..end {
            e += self.step(j);
            if e == target {
                return Ok(j);
            }
        }
        Err(Error::not_found(format!(
            "excess {} not found after {}",
            target, i
        )))
    }

    /// Largest `j < i` with `excess(j) = excess(i) + d`.
    ///
    /// `i = len` scans from the end with a base excess of zero. Returns
    /// `-1` when the target excess is zero and no position matches
    /// (the conventional `excess(-1) = 0`).
    pub fn bwdsearch(&self, i: isize, d: isize) -> Result<isize> {
        let len = self.len();
        if i < 0 || i > len as isize {
            return Err(Error::index(i, len));
        }
        let base = if i == len as isize {
            0
        } else {
            self.excess(i as usize)
        };
        let target = base + d;
        let miss = || {
            if target == 0 {
                Ok(-1)
            } else {
                Err(Error::not_found(format!(
                    "excess {} not found before {}",
                    target, i
                )))
            }
        };
        if i == 0 {
            return miss();
        }
        let i = i as usize;

        // scan down through the block containing i - 1
        let mut j = i - 1;
        let block_start = (j / 64) * 64;
        let mut e = self.prefix_excess(i);
        loop {
            if e == target {
                return Ok(j as isize);
            }
            if j == block_start {
                break;
            }
            e -= self.step(j);
            j -= 1;
        }
        let b0 = block_start / 64;
        if b0 == 0 {
            return miss();
        }

        // climb left over sibling subtrees until one covers the target
        let rmm = &self.rmm;
        let mut v = rmm.leaf(b0);
        let mut entry = self.prefix_excess(block_start);
        loop {
            while v != 1 && v & 1 == 0 {
                v >>= 1;
            }
            if v == 1 {
                return miss();
            }
            v -= 1;
            entry -= rmm.delta[v] as isize;
            if rmm.contains(v, entry, target) {
                break;
            }
        }

        // descend to the rightmost covering block
        while v < rmm.base {
            let l = 2 * v;
            let r = l + 1;
            let right_entry = entry + rmm.delta[l] as isize;
            if rmm.contains(r, right_entry, target) {
                v = r;
                entry = right_entry;
            } else {
                v = l;
            }
        }

        let b = v - rmm.base;
        let end = ((b * 64) + 64).min(len);
        let mut e = entry;
        let mut found = None;
        for p in b * 64..end {
            e += self.step(p);
            if e == target {
                found = Some(p as isize);
            }
        }
        match found {
            Some(p) => Ok(p),
            None => miss(),
        }
    }

    fn check_range(&self, i: usize, j: usize) -> Result<()> {
        let len = self.len();
        if i >= len {
            return Err(Error::index(i as isize, len));
        }
        if j >= len {
            return Err(Error::index(j as isize, len));
        }
        if i > j {
            return Err(Error::domain(format!("{} > {}", i, j)));
        }
        Ok(())
    }

    /// Decompose the position range `[i, j]` into partial-block bit runs and
    /// whole segment-tree nodes, in left-to-right order.
    fn segments(&self, i: usize, j: usize) -> Vec<Seg> {
        let (bl, br) = (i / 64, j / 64);
        if bl == br {
            return vec![Seg::Bits(i, j)];
        }
        let mut segs = vec![Seg::Bits(i, bl * 64 + 63)];
        if br > bl + 1 {
            let mut l = self.rmm.leaf(bl + 1);
            let mut r = self.rmm.leaf(br); // exclusive
            let mut left = Vec::new();
            let mut right = Vec::new();
            while l < r {
                if l & 1 == 1 {
                    left.push(l);
                    l += 1;
                }
                if r & 1 == 1 {
                    r -= 1;
                    right.push(r);
                }
                l >>= 1;
                r >>= 1;
            }
            segs.extend(left.into_iter().map(Seg::Node));
            segs.extend(right.into_iter().rev().map(Seg::Node));
        }
        segs.push(Seg::Bits(br * 64, j));
        segs
    }

    /// Minimum excess over `[i, j]` and the number of positions attaining it.
    fn range_min(&self, i: usize, j: usize) -> (isize, usize) {
        let mut cur = self.prefix_excess(i);
        let mut m = isize::MAX;
        let mut cnt = 0usize;
        for seg in self.segments(i, j) {
            match seg {
                Seg::Bits(lo, hi) => {
                    for p in lo..=hi {
                        cur += self.step(p);
                        if cur < m {
                            m = cur;
                            cnt = 1;
                        } else if cur == m {
                            cnt += 1;
                        }
                    }
                }
                Seg::Node(v) => {
                    let nm = cur + self.rmm.min[v] as isize;
                    if nm < m {
                        m = nm;
                        cnt = self.rmm.nmin[v] as usize;
                    } else if nm == m {
                        cnt += self.rmm.nmin[v] as usize;
                    }
                    cur += self.rmm.delta[v] as isize;
                }
            }
        }
        (m, cnt)
    }

    /// Position of the leftmost minimum of excess over `[i, j]`.
    pub fn firstmin(&self, i: usize, j: usize) -> Result<usize> {
        self.check_range(i, j)?;
        let (m, _) = self.range_min(i, j);
        let mut cur = self.prefix_excess(i);
        for seg in self.segments(i, j) {
            match seg {
                Seg::Bits(lo, hi) => {
                    for p in lo..=hi {
                        cur += self.step(p);
                        if cur == m {
                            return Ok(p);
                        }
                    }
                }
                Seg::Node(v) => {
                    if cur + self.rmm.min[v] as isize == m {
                        return Ok(self.descend_first_min(v, cur, m));
                    }
                    cur += self.rmm.delta[v] as isize;
                }
            }
        }
        unreachable!("range minimum is attained within the range")
    }

    fn descend_first_min(&self, mut v: usize, mut entry: isize, m: isize) -> usize {
        while v < self.rmm.base {
            let l = 2 * v;
            if entry + self.rmm.min[l] as isize == m {
                v = l;
            } else {
                entry += self.rmm.delta[l] as isize;
                v = l + 1;
            }
        }
        let b = v - self.rmm.base;
        let mut e = entry;
        for p in b * 64..((b * 64) + 64).min(self.len()) {
            e += self.step(p);
            if e == m {
                return p;
            }
        }
        unreachable!("block minimum is attained within the block")
    }

    /// Position of the leftmost maximum of excess over `[i, j]`.
    pub fn firstmax(&self, i: usize, j: usize) -> Result<usize> {
        self.check_range(i, j)?;
        // max pass
        let mut cur = self.prefix_excess(i);
        let mut m = isize::MIN;
        for seg in self.segments(i, j) {
            match seg {
                Seg::Bits(lo, hi) => {
                    for p in lo..=hi {
                        cur += self.step(p);
                        m = m.max(cur);
                    }
                }
                Seg::Node(v) => {
                    m = m.max(cur + self.rmm.max[v] as isize);
                    cur += self.rmm.delta[v] as isize;
                }
            }
        }
        // locate pass
        let mut cur = self.prefix_excess(i);
        for seg in self.segments(i, j) {
            match seg {
                Seg::Bits(lo, hi) => {
                    for p in lo..=hi {
                        cur += self.step(p);
                        if cur == m {
                            return Ok(p);
                        }
                    }
                }
                Seg::Node(v) => {
                    if cur + self.rmm.max[v] as isize == m {
                        return Ok(self.descend_first_max(v, cur, m));
                    }
                    cur += self.rmm.delta[v] as isize;
                }
            }
        }
        unreachable!("range maximum is attained within the range")
    }

    fn descend_first_max(&self, mut v: usize, mut entry: isize, m: isize) -> usize {
        while v < self.rmm.base {
            let l = 2 * v;
            if entry + self.rmm.max[l] as isize == m {
                v = l;
            } else {
                entry += self.rmm.delta[l] as isize;
                v = l + 1;
            }
        }
        let b = v - self.rmm.base;
        let mut e = entry;
        for p in b * 64..((b * 64) + 64).min(self.len()) {
            e += self.step(p);
            if e == m {
                return p;
            }
        }
        unreachable!("block maximum is attained within the block")
    }

    /// Number of positions in `[i, j]` attaining the minimum excess.
    pub fn countmin(&self, i: usize, j: usize) -> Result<usize> {
        self.check_range(i, j)?;
        Ok(self.range_min(i, j).1)
    }

    /// Position of the `k`-th (1-indexed) minimum of excess over `[i, j]`.
    pub fn selectmin(&self, i: usize, j: usize, k: usize) -> Result<usize> {
        self.check_range(i, j)?;
        let (m, total) = self.range_min(i, j);
        if k == 0 || k > total {
            return Err(Error::count(format!("range has no minrank {}", k)));
        }
        let mut cur = self.prefix_excess(i);
        let mut remaining = k;
        for seg in self.segments(i, j) {
            match seg {
                Seg::Bits(lo, hi) => {
                    for p in lo..=hi {
                        cur += self.step(p);
                        if cur == m {
                            remaining -= 1;
                            if remaining == 0 {
                                return Ok(p);
                            }
                        }
                    }
                }
                Seg::Node(v) => {
                    let n = self.rmm.nmin[v] as usize;
                    if cur + self.rmm.min[v] as isize == m {
                        if remaining <= n {
                            return Ok(self.descend_kth_min(v, cur, m, remaining));
                        }
                        remaining -= n;
                    }
                    cur += self.rmm.delta[v] as isize;
                }
            }
        }
        unreachable!("k-th minimum is attained within the range")
    }

    fn descend_kth_min(&self, mut v: usize, mut entry: isize, m: isize, mut k: usize) -> usize {
        while v < self.rmm.base {
            let l = 2 * v;
            let ln = self.rmm.nmin[l] as usize;
            if entry + self.rmm.min[l] as isize == m && k <= ln {
                v = l;
            } else {
                if entry + self.rmm.min[l] as isize == m {
                    k -= ln;
                }
                entry += self.rmm.delta[l] as isize;
                v = l + 1;
            }
        }
        let b = v - self.rmm.base;
        let mut e = entry;
        for p in b * 64..((b * 64) + 64).min(self.len()) {
            e += self.step(p);
            if e == m {
                k -= 1;
                if k == 0 {
                    return p;
                }
            }
        }
        unreachable!("k-th block minimum is attained within the block")
    }
}
