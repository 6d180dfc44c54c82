use thiserror::Error;

use kl_structure::StructureError;

/// Errors raised while reading a BPSEQ file.
#[derive(Debug, Error)]
pub enum BpseqError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A residue line without exactly `position residue partner`.
    #[error("line {line}: malformed residue line '{content}'")]
    MalformedLine { line: usize, content: String },

    #[error("no residue lines found")]
    NoResidues,

    /// Residue positions must cover 1..=N.
    #[error("residue position {0} is missing")]
    MissingPosition(usize),

    #[error("line {line}: partner {partner} is beyond the sequence length {length}")]
    PartnerOutOfRange { line: usize, partner: usize, length: usize },

    /// A residue position listed twice.
    #[error("line {line}: position {position} occurs more than once")]
    DuplicatePosition { line: usize, position: usize },

    /// Two lines disagree about the partner of `position` (0 = unpaired).
    #[error("line {line}: conflicting partners for position {position}: {expected} and {found}")]
    ConflictingPartners { line: usize, position: usize, expected: usize, found: usize },

    #[error("line {line}: position {position} is paired with itself")]
    SelfPair { line: usize, position: usize },

    /// Any other structure error raised by a residue line.
    #[error("line {line}: {source}")]
    Record { line: usize, source: StructureError },

    /// Inconsistent pairs (0-based indices).
    #[error("invalid structure: {0}")]
    Structure(#[from] StructureError),
}
