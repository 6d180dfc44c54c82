//! BPSEQ header lines, as written by the Comparative RNA Web site:
//!
//! ```text
//! Filename: d.16.b.E.coli.bpseq
//! Organism: Escherichia coli
//! Accession Number: J01695
//! Citation and related information available at http://www.rna.ccbb.utexas.edu
//! ```

use serde::Serialize;

const FILENAME: &str = "Filename:";
const ORGANISM: &str = "Organism:";
const ACCESSION: &str = "Accession Number:";
const CITATION: &str = "Citation and related information available at";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BpseqHeader {
    pub filename: Option<String>,
    pub organism: Option<String>,
    pub accession: Option<String>,
    pub citation: Option<String>,
    /// Any other header line, verbatim.
    pub other: Vec<String>,
}

impl BpseqHeader {
    /// Sort a (trimmed, non-empty) header line into its field.
    pub fn push_line(&mut self, line: &str) {
        let field = |prefix: &str| line.strip_prefix(prefix).map(|v| v.trim().to_string());

        if let Some(v) = field(FILENAME) {
            self.filename = Some(v);
        } else if let Some(v) = field(ORGANISM) {
            self.organism = Some(v);
        } else if let Some(v) = field(ACCESSION) {
            self.accession = Some(v);
        } else if let Some(v) = field(CITATION) {
            self.citation = Some(v);
        } else {
            self.other.push(line.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
