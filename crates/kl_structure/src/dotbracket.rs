//! Dot-bracket (Vienna) notation.

use std::fmt;
use std::ops::Deref;
use std::ops::DerefMut;

use crate::PairSet;
use crate::PairTable;
use crate::StructureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotBracket {
    Unpaired, // '.'
    Open,     // '('
    Close,    // ')'
}

impl TryFrom<char> for DotBracket {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '.' => Ok(DotBracket::Unpaired),
            '(' => Ok(DotBracket::Open),
            ')' => Ok(DotBracket::Close),
            _ => Err(c),
        }
    }
}

impl From<DotBracket> for char {
    fn from(db: DotBracket) -> Self {
        match db {
            DotBracket::Unpaired => '.',
            DotBracket::Open => '(',
            DotBracket::Close => ')',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotBracketVec(pub Vec<DotBracket>);

impl Deref for DotBracketVec {
    type Target = Vec<DotBracket>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DotBracketVec {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl TryFrom<&str> for DotBracketVec {
    type Error = StructureError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.chars()
            .enumerate()
            .map(|(index, c)| {
                DotBracket::try_from(c).map_err(|token| StructureError::InvalidToken { token, index })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(DotBracketVec)
    }
}

impl From<&PairTable> for DotBracketVec {
    /// Assumes a pseudoknot-free table.
    fn from(pt: &PairTable) -> Self {
        DotBracketVec(pt.iter()
            .enumerate()
            .map(|(i, &partner)| match partner {
                None => DotBracket::Unpaired,
                Some(j) if (j as usize) > i => DotBracket::Open,
                Some(_) => DotBracket::Close,
            })
            .collect())
    }
}

impl fmt::Display for DotBracketVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &db in &self.0 {
            write!(f, "{}", char::from(db))?;
        }
        Ok(())
    }
}

impl PairSet {
    /// Render the pairs as a dot-bracket string over `length` positions.
    ///
    /// The pair set must be pseudoknot-free: call `remove_pseudoknots`
    /// first if needed.
    pub fn to_dot_bracket(&self, length: usize) -> Result<DotBracketVec, StructureError> {
        let pairs = self.to_vec();
        if let Some(p) = pairs.iter().find(|p| p.j() as usize >= length) {
            return Err(StructureError::IndexOutOfRange { index: p.j(), length });
        }
        if let Some((first, second)) = self.first_crossing() {
            return Err(StructureError::PseudoknotPresent { first, second });
        }

        let mut dbv = vec![DotBracket::Unpaired; length];
        for pair in pairs {
            debug_assert!(dbv[pair.i() as usize] == DotBracket::Unpaired);
            debug_assert!(dbv[pair.j() as usize] == DotBracket::Unpaired);
            dbv[pair.i() as usize] = DotBracket::Open;
            dbv[pair.j() as usize] = DotBracket::Close;
        }
        Ok(DotBracketVec(dbv))
    }
}
