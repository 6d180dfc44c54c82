//! BPSEQ records.
//!
//! A BPSEQ file is an optional header followed by one line per residue:
//! `position residue partner`, 1-based, where partner 0 means unpaired.
//! Blank lines and `#` comments are ignored anywhere.
//!

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;
use log::debug;
use serde::Serialize;

use kl_structure::DotBracketVec;
use kl_structure::NAIDX;
use kl_structure::PairSet;
use kl_structure::PairingRecord;
use kl_structure::PartnerList;
use kl_structure::PseudoknotRule;
use kl_structure::StructureError;

use crate::BpseqError;
use crate::BpseqHeader;

/// Settings for reading BPSEQ files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BpseqOptions {
    /// Rule to remove pseudoknots with, `None` keeps them.
    pub pseudoknots: Option<PseudoknotRule>,
}

impl Default for BpseqOptions {
    fn default() -> Self {
        Self { pseudoknots: Some(PseudoknotRule::Majority) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BpseqRecord {
    pub header: BpseqHeader,
    pub sequence: String,
    pub pairs: PairSet,
}

/// Residue lines start with an integer.
fn is_residue_line(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|f| f.parse::<usize>().is_ok())
}

fn parse_residue_line(line: &str, line_no: usize) -> Result<PairingRecord, BpseqError> {
    let malformed = || BpseqError::MalformedLine {
        line: line_no,
        content: line.to_string(),
    };
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [position, residue, partner] = fields[..] else {
        return Err(malformed());
    };
    let mut chars = residue.chars();
    let (Some(residue), None) = (chars.next(), chars.next()) else {
        return Err(malformed());
    };
    Ok(PairingRecord {
        position: position.parse().map_err(|_| malformed())?,
        residue,
        partner: partner.parse().map_err(|_| malformed())?,
    })
}

/// Translate a structure error into 1-based file positions and the line
/// that raised it. For repeated positions, that is the second occurrence.
fn locate(err: StructureError, records: &[PairingRecord], line_numbers: &[usize]) -> BpseqError {
    let line_of = |position: usize| {
        let mut hits = records.iter()
            .zip(line_numbers)
            .filter(|(r, _)| r.position == position)
            .map(|(_, &line)| line);
        let first = hits.next();
        hits.next().or(first).unwrap_or(0)
    };
    let one_based = |index: Option<NAIDX>| index.map_or(0, |i| i as usize + 1);

    match &err {
        StructureError::DuplicatePosition(p) => {
            let position = *p as usize + 1;
            BpseqError::DuplicatePosition { line: line_of(position), position }
        }
        StructureError::AsymmetricPair { position, expected, found } => {
            let position = *position as usize + 1;
            BpseqError::ConflictingPartners {
                line: line_of(position),
                position,
                expected: one_based(*expected),
                found: one_based(*found),
            }
        }
        StructureError::SelfPair(p) => {
            let position = *p as usize + 1;
            BpseqError::SelfPair { line: line_of(position), position }
        }
        // Raised by the first record that carries the value. A partner of 0 is unpaired.
        StructureError::InvalidPosition(v) | StructureError::IndexOverflow(v) => {
            let hit = records.iter()
                .zip(line_numbers)
                .find(|(r, _)| r.position == *v || (*v > 0 && r.partner == *v));
            match hit {
                Some((_, &line)) => BpseqError::Record { line, source: err.clone() },
                None => BpseqError::Structure(err.clone()),
            }
        }
        _ => BpseqError::Structure(err.clone()),
    }
}

impl BpseqRecord {
    pub fn from_reader<R: BufRead>(reader: R, options: &BpseqOptions) -> Result<Self, BpseqError> {
        let mut header = BpseqHeader::default();
        let mut records: Vec<PairingRecord> = Vec::new();
        let mut line_numbers: Vec<usize> = Vec::new();

        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if is_residue_line(line) {
                records.push(parse_residue_line(line, n + 1)?);
                line_numbers.push(n + 1);
            } else if records.is_empty() {
                header.push_line(line);
            } else {
                return Err(BpseqError::MalformedLine { line: n + 1, content: line.to_string() });
            }
        }
        if records.is_empty() {
            return Err(BpseqError::NoResidues);
        }

        let list = PartnerList::build(&records)
            .map_err(|e| locate(e, &records, &line_numbers))?;
        let length = records.len();

        // Positions are unique and >= 1 now, so 1..=N is covered iff none exceeds N.
        if records.iter().any(|r| r.position > length) {
            let mut present = vec![false; length];
            for r in records.iter().filter(|r| r.position <= length) {
                present[r.position - 1] = true;
            }
            let missing = present.iter().position(|&p| !p).map_or(length, |i| i + 1);
            return Err(BpseqError::MissingPosition(missing));
        }
        if let Some((r, &line)) = records.iter().zip(&line_numbers).find(|(r, _)| r.partner > length) {
            return Err(BpseqError::PartnerOutOfRange { line, partner: r.partner, length });
        }

        let mut residues: Vec<_> = list.residues().collect();
        residues.sort_unstable_by_key(|&(position, _)| position);
        let sequence: String = residues.into_iter().map(|(_, c)| c).collect();

        let mut pairs = PairSet::try_from(&list)
            .map_err(|e| locate(e, &records, &line_numbers))?;
        if let Some(rule) = options.pseudoknots {
            pairs = pairs.remove_pseudoknots(rule);
        }
        debug!("Read {} residues and {} pairs ({} non-canonical).",
            length, pairs.len(), pairs.mismatches(&sequence));

        Ok(Self { header, sequence, pairs })
    }

    pub fn from_path<P: AsRef<Path>>(path: P, options: &BpseqOptions) -> Result<Self, BpseqError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), options)
    }

    /// Sequence length.
    pub fn len(&self) -> usize {
        self.sequence.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// The structure in dot-bracket notation. Fails if pseudoknots were kept.
    pub fn to_vienna(&self) -> Result<DotBracketVec, StructureError> {
        self.pairs.to_dot_bracket(self.len())
    }
}

impl FromStr for BpseqRecord {
    type Err = BpseqError;

    /// Parse with default options.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_reader(s.as_bytes(), &BpseqOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_residue_line() {
        assert!(is_residue_line("1 A 0"));
        assert!(is_residue_line("12"));
        assert!(!is_residue_line("Filename: x.bpseq"));
        assert!(!is_residue_line("-1 A 0"));
    }

    #[test]
    fn test_parse_residue_line() {
        assert_eq!(parse_residue_line("3  G\t9", 7).unwrap(),
            PairingRecord { position: 3, residue: 'G', partner: 9 });

        for bad in ["3 G", "3 G 9 1", "3 GG 9", "3 G x", "3 G -1"] {
            match parse_residue_line(bad, 7) {
                Err(BpseqError::MalformedLine { line: 7, content }) => assert_eq!(content, bad),
                other => panic!("expected MalformedLine for '{bad}', got {other:?}"),
            }
        }
    }

    #[test]
    fn test_minimal_record() {
        let rec: BpseqRecord = "1 G 4\n2 A 0\n3 A 0\n4 C 1\n".parse().unwrap();
        assert!(rec.header.is_empty());
        assert_eq!(rec.sequence, "GAAC");
        assert_eq!(rec.len(), 4);
        assert_eq!(rec.pairs.to_tuples(), vec![(0, 3)]);
        assert_eq!(rec.to_vienna().unwrap().to_string(), "(..)");
    }

    #[test]
    fn test_unordered_residue_lines() {
        let rec: BpseqRecord = "3 C 1\n1 G 3\n2 A 0\n".parse().unwrap();
        assert_eq!(rec.sequence, "GAC");
        assert_eq!(rec.pairs.to_tuples(), vec![(0, 2)]);
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let rec: BpseqRecord = "# made up\n\nFilename: x\n\n1 G 2\n# inner\n2 C 1\n\n".parse().unwrap();
        assert_eq!(rec.header.filename.as_deref(), Some("x"));
        assert_eq!(rec.sequence, "GC");
    }

    #[test]
    fn test_header_after_residues() {
        let res = "1 G 2\n2 C 1\nOrganism: late\n".parse::<BpseqRecord>();
        assert!(matches!(res, Err(BpseqError::MalformedLine { line: 3, .. })));
    }

    #[test]
    fn test_no_residues() {
        assert!(matches!("Filename: x\n".parse::<BpseqRecord>(), Err(BpseqError::NoResidues)));
        assert!(matches!("".parse::<BpseqRecord>(), Err(BpseqError::NoResidues)));
    }

    #[test]
    fn test_missing_position() {
        let res = "1 G 0\n2 A 0\n4 C 0\n".parse::<BpseqRecord>();
        assert!(matches!(res, Err(BpseqError::MissingPosition(3))));
    }

    #[test]
    fn test_partner_out_of_range() {
        let res = "1 G 5\n2 A 0\n3 C 0\n".parse::<BpseqRecord>();
        assert!(matches!(res,
            Err(BpseqError::PartnerOutOfRange { line: 1, partner: 5, length: 3 })));
    }

    #[test]
    fn test_structure_errors() {
        let res = "1 G 2\n2 C 1\n2 C 1\n".parse::<BpseqRecord>();
        assert!(matches!(res,
            Err(BpseqError::DuplicatePosition { line: 3, position: 2 })));

        let res = "1 A 4\n2 B 3\n3 C 2\n4 D 1\n4 D 0\n".parse::<BpseqRecord>();
        assert!(matches!(res,
            Err(BpseqError::ConflictingPartners { line: 5, position: 4, expected: 1, found: 0 })));

        // Line 1 claims 3, but line 3 claims 2.
        let res = "1 G 3\n2 A 3\n3 C 2\n".parse::<BpseqRecord>();
        assert!(matches!(res,
            Err(BpseqError::ConflictingPartners { line: 3, position: 3, expected: 1, found: 2 })));

        let res = "1 G 0\n2 A 2\n".parse::<BpseqRecord>();
        assert!(matches!(res, Err(BpseqError::SelfPair { line: 2, position: 2 })));

        let res = "Filename: x\n1 G 0\n0 A 0\n".parse::<BpseqRecord>();
        assert!(matches!(res, Err(BpseqError::Record {
            line: 3,
            source: StructureError::InvalidPosition(0),
        })));

        let res = "1 G 0\n2 A 70000\n".parse::<BpseqRecord>();
        assert!(matches!(res, Err(BpseqError::Record {
            line: 2,
            source: StructureError::IndexOverflow(70_000),
        })));
    }
}
