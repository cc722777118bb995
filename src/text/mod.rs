//! Full-text indexes supporting count and locate queries.
//!
//! [`SuffixArray`] keeps the sorted suffix permutation and answers queries
//! by binary search; [`CompressedSuffixArray`] keeps only the per-character
//! suffix ranges and the Burrows-Wheeler sequence of predecessor characters
//! and counts matches by backward search. Following the convention of
//! substring counting, the empty pattern matches at every position
//! including the end of the text.

use std::collections::BTreeMap;

/// Sort the suffix start offsets of `bytes` lexicographically.
fn sorted_suffixes(bytes: &[u8]) -> Vec<usize> {
    let mut array: Vec<usize> = (0..bytes.len()).collect();
    array.sort_unstable_by(|&a, &b| bytes[a..].cmp(&bytes[b..]));
    array
}

/// A text index over the sorted suffixes of a text.
#[derive(Debug, Clone)]
pub struct SuffixArray {
    text: String,
    array: Vec<usize>,
}

impl SuffixArray {
    /// Build the suffix array of `text` (O(n log n) comparison sort).
    pub fn build(text: impl Into<String>) -> Self {
        let text = text.into();
        let array = sorted_suffixes(text.as_bytes());
        Self { text, array }
    }

    /// Length of the indexed text.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the indexed text is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The indexed text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Half-open range of suffix ranks whose suffixes start with `pat`.
    fn search(&self, pat: &[u8]) -> (usize, usize) {
        let bytes = self.text.as_bytes();
        let start = self.array.partition_point(|&off| &bytes[off..] < pat);
        let matching = self.array[start..].partition_point(|&off| bytes[off..].starts_with(pat));
        (start, start + matching)
    }

    /// Number of occurrences of `pattern` in the text.
    pub fn count(&self, pattern: &str) -> usize {
        if pattern.is_empty() {
            return self.len() + 1;
        }
        let (s, e) = self.search(pattern.as_bytes());
        e - s
    }

    /// True iff `pattern` occurs in the text.
    pub fn contains(&self, pattern: &str) -> bool {
        pattern.is_empty() || self.count(pattern) > 0
    }

    /// All match offsets of `pattern`, in suffix-rank order. The empty
    /// pattern yields every position.
    pub fn indexes(&self, pattern: &str) -> Vec<usize> {
        if pattern.is_empty() {
            return self.array.clone();
        }
        let (s, e) = self.search(pattern.as_bytes());
        self.array[s..e].to_vec()
    }

    /// The smallest match offset of `pattern`, or `None` when absent.
    pub fn first_index(&self, pattern: &str) -> Option<usize> {
        self.indexes(pattern).into_iter().min()
    }
}

/// A compressed suffix-array index answering count queries only.
///
/// Holds the half-open suffix-rank range for each first character and the
/// BWT predecessor sequence; locate would need a sampled suffix array and
/// is out of scope.
///
/// The terminal empty suffix is indexed alongside the proper suffixes (it
/// always takes rank 0). Without it the predecessor sequence misses the
/// text's final character and backward search overcounts patterns whose
/// inner characters match it.
#[derive(Debug, Clone)]
pub struct CompressedSuffixArray {
    offsets: BTreeMap<u8, (usize, usize)>,
    predecessors: Vec<Option<u8>>,
}

impl CompressedSuffixArray {
    /// Build the index for `text`.
    pub fn build(text: &str) -> Self {
        let bytes = text.as_bytes();
        // all suffix offsets including the empty suffix at `n`; the empty
        // suffix sorts first
        let mut array: Vec<usize> = (0..=bytes.len()).collect();
        array.sort_unstable_by(|&a, &b| bytes[a..].cmp(&bytes[b..]));

        let predecessors = array
            .iter()
            .map(|&off| if off == 0 { None } else { Some(bytes[off - 1]) })
            .collect();

        let mut offsets = BTreeMap::new();
        let mut k = 1; // skip the empty suffix
        while k < array.len() {
            let c = bytes[array[k]];
            let start = k;
            while k < array.len() && bytes[array[k]] == c {
                k += 1;
            }
            offsets.insert(c, (start, k));
        }

        Self {
            offsets,
            predecessors,
        }
    }

    /// Length of the indexed text.
    #[inline]
    pub fn len(&self) -> usize {
        self.predecessors.len() - 1
    }

    /// Whether the indexed text is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of occurrences of `pattern`, by backward search over the BWT.
    pub fn count(&self, pattern: &str) -> usize {
        if pattern.is_empty() {
            return self.len() + 1;
        }
        let pat = pattern.as_bytes();
        let n = self.predecessors.len();

        let (mut s, mut e) = (1usize, 0usize);
        let (mut soff, mut eoff) = (0usize, 0usize);
        for idx in (0..pat.len()).rev() {
            let Some(&(cs, ce)) = self.offsets.get(&pat[idx]) else {
                return 0;
            };
            let prev = if idx == 0 { None } else { Some(pat[idx - 1]) };
            s = (cs + soff).min(n);
            e = ce.saturating_sub(eoff);
            soff = self.predecessors[..s].iter().filter(|&&x| x == prev).count();
            eoff = self.predecessors[e.min(n)..]
                .iter()
                .filter(|&&x| x == prev)
                .count();
        }
        e.saturating_sub(s)
    }

    /// True iff `pattern` occurs in the text.
    pub fn contains(&self, pattern: &str) -> bool {
        pattern.is_empty() || self.count(pattern) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        let sa = SuffixArray::build("");
        assert!(sa.contains(""));
        assert!(!sa.contains("foo"));
        assert_eq!(sa.count(""), 1);

        let csa = CompressedSuffixArray::build("");
        assert!(csa.contains(""));
        assert!(!csa.contains("foo"));
    }

    #[test]
    fn test_match_all_and_boundaries() {
        let sa = SuffixArray::build("foo");
        assert!(sa.contains("foo"));
        assert!(sa.contains(""));
        assert_eq!(SuffixArray::build("foo bar").count("foo"), 1);
        assert_eq!(SuffixArray::build("bar foo").count("foo"), 1);

        let sa = SuffixArray::build("foo bar foo");
        assert_eq!(sa.count("foo"), 2);
        let mut idx = sa.indexes("foo");
        idx.sort_unstable();
        assert_eq!(idx, vec![0, 8]);
        assert_eq!(sa.first_index("foo"), Some(0));
        assert_eq!(sa.first_index("baz"), None);

        let csa = CompressedSuffixArray::build("foo bar foo");
        assert_eq!(csa.count("foo"), 2);
        assert_eq!(csa.count("bar"), 1);
        assert_eq!(csa.count("baz"), 0);
    }

    #[test]
    fn test_overlapping_matches() {
        let sa = SuffixArray::build("aaaa");
        assert_eq!(sa.count("aa"), 3);
        let csa = CompressedSuffixArray::build("aaaa");
        assert_eq!(csa.count("aa"), 3);
    }

    #[test]
    fn test_counts_match_naive() {
        let text = "the mass of men lead lives of quiet desperation";
        let sa = SuffixArray::build(text);
        let csa = CompressedSuffixArray::build(text);
        for word in text.split_whitespace().chain(["q", "e", "th", "zzz", "ion"]) {
            let naive = (0..text.len())
                .filter(|&i| text[i..].starts_with(word))
                .count();
            assert_eq!(sa.count(word), naive, "sa {:?}", word);
            assert_eq!(csa.count(word), naive, "csa {:?}", word);
            let mut idx = sa.indexes(word);
            idx.sort_unstable();
            let naive_idx: Vec<usize> = (0..text.len())
                .filter(|&i| text[i..].starts_with(word))
                .collect();
            assert_eq!(idx, naive_idx, "sa indexes {:?}", word);
        }
    }
}
