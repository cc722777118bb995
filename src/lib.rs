//! # Semidex
//!
//! Succinct data structures for semi-indexing static text and tree data.
//!
//! The crate builds up a small stack: bitvectors with rank/select, a
//! balanced-parenthesis tree encoding with excess-based navigation, and on
//! top of those a wavelet tree for arbitrary-alphabet texts, suffix-array
//! full-text indexes, and a JSON *semi-index* that stores only a document's
//! structural skeleton and deserializes sub-values lazily through a
//! jq-style query language.
//!
//! ## Module Organization
//!
//! - [`bits`] - bitvector with O(1) rank and near-O(1) select
//! - [`trees`] - balanced parentheses and ordinal-tree navigation
//! - [`intseq`] - Elias-Fano monotone integer sequences
//! - [`code`] - binary alphabet codes (fixed, Huffman, Hu-Tucker)
//! - [`wavelet`] - wavelet trees: access/rank/select over texts
//! - [`text`] - suffix-array and compressed-suffix-array indexes
//! - [`json`] - lazily-deserialized JSON documents
//! - [`jq`] - the query language over JSON documents
//!
//! ## Quick Start
//!
//! ```
//! use semidex::{BitVec, RankSelect};
//!
//! let bv = BitVec::from_bit_str("010110").unwrap();
//! assert_eq!(bv.rank("1", 4).unwrap(), 3);
//! assert_eq!(bv.select("0", 2).unwrap(), 2);
//! assert_eq!(bv.rank1(4), 2); // half-open fast path
//! ```
//!
//! Querying JSON without parsing it:
//!
//! ```
//! use semidex::jq;
//!
//! let results = jq::query(r#"{"users": [{"name": "ada"}]}"#, ".users | .[0]").unwrap();
//! assert_eq!(results, vec![r#"{"name": "ada"}"#]);
//! ```
//!
//! All structures are immutable after construction and safe to share
//! across threads for reads.

pub mod bits;
pub mod code;
pub mod error;
pub mod intseq;
pub mod jq;
pub mod json;
pub mod text;
pub mod trees;
pub mod wavelet;

// Core types
pub use bits::{BitBuf, BitVec, RankSelect};
pub use error::{Error, Result};
pub use intseq::EliasFano;
pub use trees::{BalancedParens, Navigator, Node};

// Application types
pub use code::{AsciiCodec, Code, Codec, HuTuckerCodec, HuffmanCodec};
pub use json::{Document, Value};
pub use jq::Query;
pub use text::{CompressedSuffixArray, SuffixArray};
pub use wavelet::WaveletTree;
