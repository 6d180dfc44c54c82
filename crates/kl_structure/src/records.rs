//! Raw pairing records, the first stage of building a `PairSet`.
//!
//! Line-oriented structure files (BPSEQ, CT) list every residue with its
//! 1-based position and the 1-based position of its partner, where 0
//! means unpaired. A `PartnerList` is the 0-based version of such a
//! listing, with every position occurring exactly once.
//!

use nohash_hasher::IntMap;

use crate::NAIDX;
use crate::StructureError;

/// One residue line: 1-based `position`, `residue`, and 1-based `partner`
/// (0 for unpaired).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairingRecord {
    pub position: usize,
    pub residue: char,
    pub partner: usize,
}

/// 0-based (position, partner) entries in input order, including unpaired ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerList {
    entries: Vec<(NAIDX, Option<NAIDX>)>,
    residues: Vec<char>,
}

fn to_index(position: usize) -> Result<NAIDX, StructureError> {
    if position == 0 {
        return Err(StructureError::InvalidPosition(position));
    }
    NAIDX::try_from(position - 1).map_err(|_| StructureError::IndexOverflow(position))
}

impl PartnerList {
    /// Convert 1-based records into a 0-based partner list.
    ///
    /// A position may only occur once. If a repeated position also
    /// disagrees about its partner, this is reported as a pair conflict
    /// (`AsymmetricPair`), otherwise as `DuplicatePosition`.
    pub fn build(records: &[PairingRecord]) -> Result<Self, StructureError> {
        let mut seen: IntMap<NAIDX, Option<NAIDX>> = IntMap::default();
        let mut entries = Vec::with_capacity(records.len());
        let mut residues = Vec::with_capacity(records.len());

        for rec in records {
            let position = to_index(rec.position)?;
            let partner = match rec.partner {
                0 => None,
                p => Some(to_index(p)?),
            };
            if let Some(&first) = seen.get(&position) {
                if first != partner {
                    return Err(StructureError::AsymmetricPair {
                        position,
                        expected: first,
                        found: partner,
                    });
                }
                return Err(StructureError::DuplicatePosition(position));
            }
            seen.insert(position, partner);
            entries.push((position, partner));
            residues.push(rec.residue);
        }
        Ok(Self { entries, residues })
    }

    /// Number of entries (paired and unpaired).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(position, partner)` in input order.
    pub fn iter(&self) -> impl Iterator<Item = (NAIDX, Option<NAIDX>)> + '_ {
        self.entries.iter().copied()
    }

    /// Iterate over `(position, residue)` in input order.
    pub fn residues(&self) -> impl Iterator<Item = (NAIDX, char)> + '_ {
        self.entries.iter().map(|&(p, _)| p).zip(self.residues.iter().copied())
    }
}
