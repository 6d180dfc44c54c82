//! Pair and PairSet definitions.
//!
//! A `Pair` is defined by two 16-bit indices (`NAIDX`) packed into a
//! 32-bit integer key (`P1KEY`) for efficient set and map storage.
//! Since `i` occupies the high bits, sorting keys is the same as sorting
//! pairs by `(i, j)`, which we call the canonical order.
//!
//! Indices are **0-based** throughout. A `PairSet` is only ever built
//! through validating constructors, so every position has at most one
//! partner. It may, however, contain pseudoknots.
//!

use std::fmt;
use log::warn;
use nohash_hasher::IntMap;
use nohash_hasher::IntSet;
use serde::Deserialize;
use serde::Serialize;
use serde::Serializer;

use crate::NAIDX;
use crate::P1KEY;
use crate::PartnerList;
use crate::StructureError;


/// A base pair (i, j) with i < j.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "(NAIDX, NAIDX)", try_from = "(NAIDX, NAIDX)")]
pub struct Pair {
    i: NAIDX,
    j: NAIDX,
}

impl Pair {
    /// Create a new pair (i, j). Panics in debug if i >= j.
    pub fn new(i: NAIDX, j: NAIDX) -> Self {
        debug_assert!(i < j);
        Pair { i, j }
    }

    /// The pair between `a` and `b`, regardless of their order.
    pub fn canonical(a: NAIDX, b: NAIDX) -> Result<Self, StructureError> {
        if a == b {
            return Err(StructureError::SelfPair(a));
        }
        Ok(Pair { i: a.min(b), j: a.max(b) })
    }

    /// Return the 5'-side index.
    pub fn i(&self) -> NAIDX {
        self.i
    }

    /// Return the 3'-side index.
    pub fn j(&self) -> NAIDX {
        self.j
    }

    /// Compact 32-bit key encoding both indices.
    pub fn key(&self) -> P1KEY {
        ((self.i as P1KEY) << 16) | (self.j as P1KEY)
    }

    /// Decode a key back into a `Pair`.
    pub fn from_key(key: P1KEY) -> Self {
        let i = (key >> 16) as NAIDX;
        let j = (key & 0xFFFF) as NAIDX;
        debug_assert!(i < j);
        Pair { i, j }
    }

    /// True if the arcs of the two pairs intersect, i.e. `a < c < b < d`
    /// or `c < a < d < b`. Nested and disjoint pairs do not cross.
    pub fn crosses(&self, other: &Pair) -> bool {
        let (a, b) = (self.i, self.j);
        let (c, d) = (other.i, other.j);
        (a < c && c < b && b < d) || (c < a && a < d && d < b)
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.i, self.j)
    }
}

impl From<Pair> for (NAIDX, NAIDX) {
    fn from(pair: Pair) -> Self {
        (pair.i, pair.j)
    }
}

impl TryFrom<(NAIDX, NAIDX)> for Pair {
    type Error = StructureError;

    fn try_from((a, b): (NAIDX, NAIDX)) -> Result<Self, Self::Error> {
        Pair::canonical(a, b)
    }
}

/// A collection of base pairs represented as compact integer keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairSet {
    pairs: IntSet<P1KEY>,
}

impl PairSet {
    /// Build a pair set from canonical pairs. Repeated pairs collapse,
    /// but a position that shows up in two different pairs is an error.
    pub fn try_from_pairs<I>(pairs: I) -> Result<Self, StructureError>
    where
        I: IntoIterator<Item = Pair>,
    {
        let mut partners: IntMap<NAIDX, NAIDX> = IntMap::default();
        let mut keys: IntSet<P1KEY> = IntSet::default();
        for pair in pairs {
            if !keys.insert(pair.key()) {
                continue;
            }
            for (pos, other) in [(pair.i(), pair.j()), (pair.j(), pair.i())] {
                if let Some(seen) = partners.insert(pos, other) {
                    return Err(StructureError::AsymmetricPair {
                        position: pos,
                        expected: Some(seen),
                        found: Some(other),
                    });
                }
            }
        }
        Ok(Self { pairs: keys })
    }

    /// Wrap pairs that are known to be a subset of a valid `PairSet`.
    pub(crate) fn from_valid<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = Pair>,
    {
        Self {
            pairs: pairs.into_iter().map(|p| p.key()).collect(),
        }
    }

    /// Number of pairs contained in the set.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Check if a pair exists in the set.
    pub fn contains(&self, pair: &Pair) -> bool {
        self.pairs.contains(&pair.key())
    }

    /// True if every pair of `self` is also in `other`.
    pub fn is_subset(&self, other: &PairSet) -> bool {
        self.pairs.is_subset(&other.pairs)
    }

    /// Iterator over all pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = Pair> + '_ {
        self.pairs.iter().map(|&k| Pair::from_key(k))
    }

    /// Return all pairs in canonical order.
    pub fn to_vec(&self) -> Vec<Pair> {
        let mut keys: Vec<P1KEY> = self.pairs.iter().copied().collect();
        keys.sort_unstable();
        keys.into_iter().map(Pair::from_key).collect()
    }

    /// The canonical `(up, down)` list.
    pub fn to_tuples(&self) -> Vec<(NAIDX, NAIDX)> {
        self.to_vec().into_iter().map(<(NAIDX, NAIDX)>::from).collect()
    }

    /// Number of pairs that are neither Watson-Crick nor wobble pairs
    /// in the given sequence, indexed by character. Pairs reaching beyond
    /// the end of the sequence count as mismatches.
    pub fn mismatches(&self, sequence: &str) -> usize {
        let seq: Vec<char> = sequence.chars().collect();
        self.iter()
            .filter(|p| match (seq.get(p.i() as usize), seq.get(p.j() as usize)) {
                (Some(&a), Some(&b)) => !is_canonical_pair(a, b),
                _ => true,
            })
            .count()
    }
}

fn is_canonical_pair(a: char, b: char) -> bool {
    matches!(
        (a.to_ascii_uppercase(), b.to_ascii_uppercase()),
        ('A', 'U') | ('U', 'A') |
        ('A', 'T') | ('T', 'A') |
        ('G', 'C') | ('C', 'G') |
        ('G', 'U') | ('U', 'G') |
        ('G', 'T') | ('T', 'G')
    )
}

impl TryFrom<&PartnerList> for PairSet {
    type Error = StructureError;

    /// Collapse both directions of every bond into one canonical pair.
    fn try_from(list: &PartnerList) -> Result<Self, Self::Error> {
        let claims: IntMap<NAIDX, Option<NAIDX>> = list.iter().collect();
        let mut pairs = Vec::with_capacity(list.len() / 2);
        for (position, partner) in list.iter() {
            let Some(partner) = partner else {
                continue;
            };
            match claims.get(&partner) {
                Some(&back) if back != Some(position) => {
                    return Err(StructureError::AsymmetricPair {
                        position: partner,
                        expected: Some(position),
                        found: back,
                    });
                }
                None => warn!("index {position} pairs with {partner}, which has no record."),
                _ => (),
            }
            pairs.push(Pair::canonical(position, partner)?);
        }
        PairSet::try_from_pairs(pairs)
    }
}

impl Serialize for PairSet {
    /// A list of `[i, j]` in canonical order.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.to_vec())
    }
}

impl fmt::Display for PairSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for pair in self.to_vec() {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{}", pair)?;
            first = false;
        }
        Ok(())
    }
}
