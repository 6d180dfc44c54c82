//! The kl_bpseq crate.
//!
//! Reads BPSEQ secondary structure files into `kl_structure` pair sets:
//!  - header lines (filename, organism, accession, citation),
//!  - 1-based residue lines `position residue partner`,
//!  - optional pseudoknot removal on load.
//!

mod error;
mod header;
mod reader;

pub use error::*;
pub use header::*;
pub use reader::*;

