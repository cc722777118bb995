//! Two-level rank directory and select acceleration for bit vectors.
//!
//! # Structure
//!
//! - **L1**: Absolute cumulative rank every 128 words (8192 bits).
//!   One `u32` per superblock.
//! - **L2**: Relative cumulative rank every 8 words (512 bits).
//!   One `u16` per block.
//!
//! Total overhead is ~3.5% of the bitmap. A query touches two array entries
//! plus at most seven word popcounts.
//!
//! Select is answered by a binary search over word boundaries, narrowed by a
//! sampled position of every 256th one-bit.

/// Words per L1 superblock.
const L1_WORDS: usize = 128;

/// Words per L2 block.
const L2_WORDS: usize = 8;

/// One-bit positions are sampled at this rank interval.
const SELECT_SAMPLE_RATE: usize = 256;

/// Two-level rank directory over a word-packed bitmap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankDirectory {
    /// Absolute cumulative rank at each superblock boundary.
    /// Entry i = popcount of words [0, i * 128).
    l1: Vec<u32>,
    /// Relative cumulative rank at each block boundary within its superblock.
    l2: Vec<u16>,
    /// Total popcount across all words.
    total: usize,
}

impl RankDirectory {
    /// Build a rank directory from bitmap words.
    pub fn build(words: &[u64]) -> Self {
        if words.is_empty() {
            return Self {
                l1: Vec::new(),
                l2: Vec::new(),
                total: 0,
            };
        }

        let num_superblocks = words.len().div_ceil(L1_WORDS);
        let num_blocks = words.len().div_ceil(L2_WORDS);

        let mut l1 = Vec::with_capacity(num_superblocks);
        let mut l2 = Vec::with_capacity(num_blocks);

        let mut absolute_rank: u32 = 0;

        for sb in 0..num_superblocks {
            l1.push(absolute_rank);

            let sb_start = sb * L1_WORDS;
            let sb_end = (sb_start + L1_WORDS).min(words.len());
            let mut relative_rank: u16 = 0;

            let blocks_in_sb = (sb_end - sb_start).div_ceil(L2_WORDS);
            for b in 0..blocks_in_sb {
                l2.push(relative_rank);

                let block_start = sb_start + b * L2_WORDS;
                let block_end = (block_start + L2_WORDS).min(sb_end);
                for &word in &words[block_start..block_end] {
                    let ones = word.count_ones() as u16;
                    relative_rank += ones;
                    absolute_rank += ones as u32;
                }
            }
        }

        Self {
            l1,
            l2,
            total: absolute_rank as usize,
        }
    }

    /// Total number of one-bits covered by the directory.
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of one-bits in `words[0..word_idx]`.
    ///
    /// `words` must be the bitmap passed to [`RankDirectory::build`].
    #[inline]
    pub fn rank_at_word(&self, words: &[u64], word_idx: usize) -> usize {
        if self.l1.is_empty() {
            return 0;
        }
        if word_idx >= words.len() {
            return self.total;
        }

        let sb_idx = word_idx / L1_WORDS;
        let block_idx = word_idx / L2_WORDS;

        let mut count = self.l1[sb_idx] as usize + self.l2[block_idx] as usize;

        let block_start = block_idx * L2_WORDS;
        for &word in &words[block_start..word_idx] {
            count += word.count_ones() as usize;
        }

        count
    }

    /// Number of one-bits in bit positions `[0, i)`.
    #[inline]
    pub fn rank1(&self, words: &[u64], i: usize) -> usize {
        let word_idx = i / 64;
        let mut count = self.rank_at_word(words, word_idx);
        let rem = i % 64;
        if rem > 0 && word_idx < words.len() {
            count += (words[word_idx] & ((1u64 << rem) - 1)).count_ones() as usize;
        }
        count
    }
}

/// Sampled positions of every 256th one-bit, used to bound the binary
/// search performed by `select1`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SelectIndex {
    /// `samples[j]` = bit position of the `(j * 256)`-th one (0-indexed).
    samples: Vec<u32>,
}

impl SelectIndex {
    /// Build the sample table from bitmap words.
    pub fn build(words: &[u64]) -> Self {
        let mut samples = Vec::new();
        let mut seen = 0usize;
        for (w, &word) in words.iter().enumerate() {
            let ones = word.count_ones() as usize;
            if ones == 0 {
                continue;
            }
            // sampled ranks falling inside this word
            let mut r = seen.div_ceil(SELECT_SAMPLE_RATE) * SELECT_SAMPLE_RATE;
            while r < seen + ones {
                let bit = select_in_word(word, (r - seen) as u32);
                samples.push((w * 64 + bit as usize) as u32);
                r += SELECT_SAMPLE_RATE;
            }
            seen += ones;
        }
        Self { samples }
    }

    /// Word-index window `[lo, hi]` known to contain the `k`-th one-bit.
    #[inline]
    pub fn window(&self, k: usize, num_words: usize) -> (usize, usize) {
        let s = k / SELECT_SAMPLE_RATE;
        let lo = self
            .samples
            .get(s)
            .map(|&p| p as usize / 64)
            .unwrap_or(0);
        let hi = self
            .samples
            .get(s + 1)
            .map(|&p| p as usize / 64)
            .unwrap_or(num_words.saturating_sub(1));
        (lo, hi)
    }
}

/// Position of the `k`-th (0-indexed) set bit of `word`.
///
/// The caller guarantees that `word` has more than `k` set bits.
#[inline]
pub(crate) fn select_in_word(mut word: u64, mut k: u32) -> u32 {
    loop {
        let t = word.trailing_zeros();
        if k == 0 {
            return t;
        }
        word &= word - 1;
        k -= 1;
    }
}
