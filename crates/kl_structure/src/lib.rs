//! The kl_structure crate.
//!
//! Base-pair sets for nucleic acid secondary structures:
//!  - two-phase construction from 1-based (position, residue, partner) records,
//!  - pseudoknot detection and removal ("first" and "majority" rules),
//!  - partner tables and dot-bracket (Vienna) notation.
//!

mod error;
mod records;
mod pair_set;
mod pair_table;
mod pseudoknots;
mod dotbracket;

pub use error::*;
pub use records::*;
pub use pair_set::*;
pub use pair_table::*;
pub use pseudoknots::*;
pub use dotbracket::*;


/// Nucleic Acid INdeX: we use `u16` (0 to 65k), which is plenty for nucleic acids.
/// Beware that `P1KEY` needs to be *twice as large* (in bits) as `NAIDX`,
/// since pairs `(NAIDX, NAIDX)` are compacted into one `P1KEY`.
pub type NAIDX = u16;

/// Pair key. Must be >= 2×`NAIDX` in bit width so we can safely pack two indices.
pub type P1KEY = u32;

/// Compile-time sanity check: 2×NAIDX bits must fit into P1KEY.
const _: () = {
    assert!(2 * NAIDX::BITS <= P1KEY::BITS);
};

