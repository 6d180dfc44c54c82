//! Pseudoknot detection and removal.
//!
//! Two pairs (a, b) and (c, d) form a pseudoknot if their arcs cross:
//! a < c < b < d. Removal turns a `PairSet` into a crossing-free subset
//! that can be written in dot-bracket notation.
//!
//! Both removal rules walk pairs in canonical order, which makes them
//! deterministic:
//!  - `First`: keep a pair unless it crosses a pair that was kept before.
//!  - `Majority`: repeatedly drop the pair involved in the most remaining
//!    crossings. Among equally bad pairs, the first in canonical order
//!    (lowest i, then lowest j) is dropped.
//!

use std::fmt;
use std::str::FromStr;
use log::debug;
use log::trace;
use serde::Deserialize;
use serde::Serialize;

use crate::Pair;
use crate::PairSet;
use crate::StructureError;

/// How to resolve crossing pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PseudoknotRule {
    First,
    Majority,
}

impl FromStr for PseudoknotRule {
    type Err = StructureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" => Ok(PseudoknotRule::First),
            "majority" => Ok(PseudoknotRule::Majority),
            _ => Err(StructureError::InvalidPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for PseudoknotRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PseudoknotRule::First => write!(f, "first"),
            PseudoknotRule::Majority => write!(f, "majority"),
        }
    }
}

/// All crossing index pairs (x, y), x < y, of canonically sorted `pairs`.
///
/// Since pairs are sorted by i, a later pair (c, d) can only cross
/// (a, b) if a <= c < b, so the inner scan stops at the first c >= b.
fn crossings(pairs: &[Pair]) -> impl Iterator<Item = (usize, usize)> + '_ {
    (0..pairs.len()).flat_map(move |x| {
        let p = pairs[x];
        pairs[x + 1..].iter()
            .enumerate()
            .take_while(move |(_, q)| q.i() < p.j())
            .filter(move |(_, q)| p.crosses(q))
            .map(move |(k, _)| (x, x + 1 + k))
    })
}

fn remove_first(pairs: &[Pair]) -> Vec<Pair> {
    let mut kept: Vec<Pair> = Vec::with_capacity(pairs.len());
    for &p in pairs {
        match kept.iter().find(|q| q.crosses(&p)) {
            Some(q) => trace!("first: dropping {p}, crosses {q}."),
            None => kept.push(p),
        }
    }
    kept
}

fn remove_majority(pairs: &[Pair]) -> Vec<Pair> {
    let n = pairs.len();
    let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (x, y) in crossings(pairs) {
        neighbors[x].push(y);
        neighbors[y].push(x);
    }
    let mut degree: Vec<usize> = neighbors.iter().map(Vec::len).collect();
    let mut removed = vec![false; n];

    loop {
        // Strictly greater: ties go to the earliest pair.
        let mut worst: Option<usize> = None;
        for x in 0..n {
            if removed[x] || degree[x] == 0 {
                continue;
            }
            match worst {
                Some(w) if degree[w] >= degree[x] => (),
                _ => worst = Some(x),
            }
        }
        let Some(x) = worst else {
            break;
        };
        trace!("majority: dropping {} with {} crossings.", pairs[x], degree[x]);
        removed[x] = true;
        degree[x] = 0;
        for &y in &neighbors[x] {
            if !removed[y] {
                degree[y] -= 1;
            }
        }
    }

    (0..n).filter(|&x| !removed[x]).map(|x| pairs[x]).collect()
}

impl PairSet {
    /// True if any two pairs cross.
    pub fn has_pseudoknots(&self) -> bool {
        self.first_crossing().is_some()
    }

    /// The first crossing pair of pairs in canonical order.
    pub(crate) fn first_crossing(&self) -> Option<(Pair, Pair)> {
        let pairs = self.to_vec();
        crossings(&pairs).next().map(|(x, y)| (pairs[x], pairs[y]))
    }

    /// Every crossing pair of pairs, in canonical order.
    pub fn crossing_pairs(&self) -> Vec<(Pair, Pair)> {
        let pairs = self.to_vec();
        crossings(&pairs).map(|(x, y)| (pairs[x], pairs[y])).collect()
    }

    /// Return the crossing-free subset of pairs selected by `rule`.
    pub fn remove_pseudoknots(&self, rule: PseudoknotRule) -> PairSet {
        let pairs = self.to_vec();
        let kept = match rule {
            PseudoknotRule::First => remove_first(&pairs),
            PseudoknotRule::Majority => remove_majority(&pairs),
        };
        debug!("{rule} rule removed {} of {} pairs.", pairs.len() - kept.len(), pairs.len());
        PairSet::from_valid(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;

    fn pair_set(tuples: &[(u16, u16)]) -> PairSet {
        PairSet::try_from_pairs(tuples.iter().map(|&(i, j)| Pair::new(i, j))).unwrap()
    }

    fn knotted() -> PairSet {
        pair_set(&[(2, 8), (3, 7), (4, 11), (5, 10), (6, 9), (12, 18), (13, 17)])
    }

    /// A random valid pair set over `length` positions.
    fn random_pair_set(rng: &mut StdRng, length: u16) -> PairSet {
        let mut positions: Vec<u16> = (0..length).collect();
        positions.shuffle(rng);
        let num = rng.random_range(0..=positions.len() / 2);
        let pairs = positions.chunks_exact(2)
            .take(num)
            .map(|c| Pair::canonical(c[0], c[1]).unwrap());
        PairSet::try_from_pairs(pairs).unwrap()
    }

    #[test]
    fn test_rule_from_str() {
        assert_eq!("first".parse::<PseudoknotRule>(), Ok(PseudoknotRule::First));
        assert_eq!("Majority".parse::<PseudoknotRule>(), Ok(PseudoknotRule::Majority));
        assert_eq!("nussinov".parse::<PseudoknotRule>(),
            Err(StructureError::InvalidPolicy("nussinov".to_string())));
        assert_eq!(PseudoknotRule::Majority.to_string(), "majority");
    }

    #[test]
    fn test_has_pseudoknots() {
        assert!(knotted().has_pseudoknots());
        assert!(!pair_set(&[(0, 9), (1, 3), (4, 8), (10, 12)]).has_pseudoknots());
        assert!(!PairSet::default().has_pseudoknots());
        // only the last pair is involved
        assert!(pair_set(&[(0, 1), (2, 3), (4, 6), (5, 7)]).has_pseudoknots());
    }

    #[test]
    fn test_crossing_pairs() {
        let ps = pair_set(&[(0, 4), (2, 6), (3, 5), (10, 12)]);
        assert_eq!(ps.crossing_pairs(), vec![
            (Pair::new(0, 4), Pair::new(2, 6)),
            (Pair::new(0, 4), Pair::new(3, 5)),
        ]);
        assert_eq!(ps.first_crossing(), Some((Pair::new(0, 4), Pair::new(2, 6))));
    }

    #[test]
    fn test_remove_majority() {
        let ps = knotted().remove_pseudoknots(PseudoknotRule::Majority);
        assert_eq!(ps.to_tuples(), vec![(4, 11), (5, 10), (6, 9), (12, 18), (13, 17)]);
        assert!(!ps.has_pseudoknots());
        assert_eq!(ps.to_dot_bracket(20).unwrap().to_string(), "....(((..)))((...)).");
    }

    #[test]
    fn test_remove_first() {
        let ps = knotted().remove_pseudoknots(PseudoknotRule::First);
        assert_eq!(ps.to_tuples(), vec![(2, 8), (3, 7), (12, 18), (13, 17)]);
        assert!(!ps.has_pseudoknots());
    }

    #[test]
    fn test_majority_tie_break() {
        // Two crossing pairs with one crossing each: drop the first.
        let ps = pair_set(&[(0, 4), (2, 6)]);
        let res = ps.remove_pseudoknots(PseudoknotRule::Majority);
        assert_eq!(res.to_tuples(), vec![(2, 6)]);
        let res = ps.remove_pseudoknots(PseudoknotRule::First);
        assert_eq!(res.to_tuples(), vec![(0, 4)]);
    }

    #[test]
    fn test_majority_updates_degrees() {
        // (1,5) crosses (0,3) and (4,7). Dropping it resolves both.
        let ps = pair_set(&[(0, 3), (1, 5), (4, 7)]);
        let res = ps.remove_pseudoknots(PseudoknotRule::Majority);
        assert_eq!(res.to_tuples(), vec![(0, 3), (4, 7)]);
        let res = ps.remove_pseudoknots(PseudoknotRule::First);
        assert_eq!(res.to_tuples(), vec![(0, 3), (4, 7)]);
    }

    #[test]
    fn test_idempotence() {
        let nested = pair_set(&[(0, 9), (1, 3), (4, 8), (5, 7), (10, 12)]);
        for rule in [PseudoknotRule::First, PseudoknotRule::Majority] {
            assert_eq!(nested.remove_pseudoknots(rule), nested);
            let once = knotted().remove_pseudoknots(rule);
            assert_eq!(once.remove_pseudoknots(rule), once);
        }
        assert_eq!(PairSet::default().remove_pseudoknots(PseudoknotRule::Majority),
            PairSet::default());
    }

    #[test]
    fn test_random_pair_sets() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let length = rng.random_range(0..60u16);
            let ps = random_pair_set(&mut rng, length);
            for rule in [PseudoknotRule::First, PseudoknotRule::Majority] {
                let res = ps.remove_pseudoknots(rule);
                assert!(res.is_subset(&ps));
                assert!(!res.has_pseudoknots());
                assert_eq!(res.remove_pseudoknots(rule), res);

                let db = res.to_dot_bracket(length as usize).unwrap().to_string();
                assert_eq!(db.len(), length as usize);
                assert_eq!(db.matches('(').count(), db.matches(')').count());
                assert_eq!(db.matches('(').count(), res.len());
            }
            // Every pair dropped by the first rule crosses a kept one.
            let kept = ps.remove_pseudoknots(PseudoknotRule::First);
            for p in ps.iter().filter(|p| !kept.contains(p)) {
                assert!(kept.iter().any(|q| q.crosses(&p)));
            }
        }
    }

    #[test]
    fn test_crossings_agree_with_brute_force() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let ps = random_pair_set(&mut rng, 40);
            let pairs = ps.to_vec();
            let mut brute = Vec::new();
            for x in 0..pairs.len() {
                for y in x + 1..pairs.len() {
                    if pairs[x].crosses(&pairs[y]) {
                        brute.push((pairs[x], pairs[y]));
                    }
                }
            }
            assert_eq!(ps.crossing_pairs(), brute);
        }
    }
}
