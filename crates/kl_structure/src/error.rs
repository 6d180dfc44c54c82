use thiserror::Error;

use crate::NAIDX;
use crate::Pair;

/// Errors raised while building, validating or rendering base-pair data.
///
/// Indices are 0-based, except for `InvalidPosition` and `IndexOverflow`
/// which report the raw (1-based) input value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// The same position was listed more than once.
    #[error("position {0} occurs more than once")]
    DuplicatePosition(NAIDX),

    /// A position is claimed by two different partners.
    #[error("conflicting pairs at index {position}: expected partner {expected:?}, found {found:?}")]
    AsymmetricPair {
        position: NAIDX,
        expected: Option<NAIDX>,
        found: Option<NAIDX>,
    },

    /// A position is paired with itself.
    #[error("index {0} is paired with itself")]
    SelfPair(NAIDX),

    /// 1-based input positions start at 1.
    #[error("invalid position {0} (positions are 1-based)")]
    InvalidPosition(usize),

    /// The position does not fit into `NAIDX`.
    #[error("position {0} exceeds the maximum sequence length")]
    IndexOverflow(usize),

    /// A pair reaches beyond the sequence length.
    #[error("pair index {index} out of range for length {length}")]
    IndexOutOfRange { index: NAIDX, length: usize },

    /// Two pairs cross where a nested structure is required.
    #[error("pseudoknot: pairs {first} and {second} cross")]
    PseudoknotPresent { first: Pair, second: Pair },

    /// Not a known pseudoknot removal rule.
    #[error("unknown pseudoknot removal rule '{0}' (expected 'first' or 'majority')")]
    InvalidPolicy(String),

    /// An opening bracket without a closing one.
    #[error("unmatched '(' at index {0}")]
    UnmatchedOpen(usize),

    /// A closing bracket without an opening one.
    #[error("unmatched ')' at index {0}")]
    UnmatchedClose(usize),

    /// A character other than '.', '(' or ')'.
    #[error("invalid token '{token}' at index {index}")]
    InvalidToken { token: char, index: usize },
}
