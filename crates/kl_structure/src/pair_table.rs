//! PairTable: the partner of every position, or `None` if unpaired.

use std::ops::Deref;
use std::ops::DerefMut;

use crate::NAIDX;
use crate::DotBracket;
use crate::DotBracketVec;
use crate::Pair;
use crate::PairSet;
use crate::StructureError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairTable(pub Vec<Option<NAIDX>>);

impl Deref for PairTable {
    type Target = Vec<Option<NAIDX>>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PairTable {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl TryFrom<&DotBracketVec> for PairTable {
    type Error = StructureError;

    fn try_from(dbv: &DotBracketVec) -> Result<Self, Self::Error> {
        if dbv.len() > NAIDX::MAX as usize + 1 {
            return Err(StructureError::IndexOverflow(dbv.len()));
        }
        let mut stack: Vec<usize> = Vec::new();
        let mut table = vec![None; dbv.len()];

        for (i, &db) in dbv.iter().enumerate() {
            match db {
                DotBracket::Unpaired => (),
                DotBracket::Open => stack.push(i),
                DotBracket::Close => {
                    let j = stack.pop().ok_or(StructureError::UnmatchedClose(i))?;
                    table[i] = Some(j as NAIDX);
                    table[j] = Some(i as NAIDX);
                }
            }
        }
        if let Some(&j) = stack.last() {
            return Err(StructureError::UnmatchedOpen(j));
        }
        Ok(PairTable(table))
    }
}

impl TryFrom<&str> for PairTable {
    type Error = StructureError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let dbv = DotBracketVec::try_from(s)?;
        PairTable::try_from(&dbv)
    }
}

impl TryFrom<&PairTable> for PairSet {
    type Error = StructureError;

    /// Every entry must be mirrored by its partner's entry.
    fn try_from(pt: &PairTable) -> Result<Self, Self::Error> {
        if pt.len() > NAIDX::MAX as usize + 1 {
            return Err(StructureError::IndexOverflow(pt.len()));
        }
        let mut pairs = Vec::new();
        for (i, &j_opt) in pt.iter().enumerate() {
            let Some(j) = j_opt else {
                continue;
            };
            let back = *pt.get(j as usize)
                .ok_or(StructureError::IndexOutOfRange { index: j, length: pt.len() })?;
            if back != Some(i as NAIDX) {
                return Err(StructureError::AsymmetricPair {
                    position: j,
                    expected: Some(i as NAIDX),
                    found: back,
                });
            }
            pairs.push(Pair::canonical(i as NAIDX, j)?);
        }
        PairSet::try_from_pairs(pairs)
    }
}

impl PairSet {
    /// Partner table over `length` positions. Pseudoknots are allowed.
    pub fn to_pair_table(&self, length: usize) -> Result<PairTable, StructureError> {
        let mut table = vec![None; length];
        for pair in self.iter() {
            let (i, j) = (pair.i() as usize, pair.j() as usize);
            if j >= length {
                return Err(StructureError::IndexOutOfRange { index: pair.j(), length });
            }
            table[i] = Some(pair.j());
            table[j] = Some(pair.i());
        }
        Ok(PairTable(table))
    }
}
