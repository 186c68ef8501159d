//! The `Match` model: the result of one local alignment against the doubled
//! target.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::sequence::Seq;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Match {
    pub db_id: String,
    pub entry_id: String,
    /// 0-based, inclusive, on the doubled target.
    pub qs: usize,
    pub qe: usize,
    /// 0-based, inclusive, on the source entry.
    pub ss: usize,
    pub se: usize,
    /// Gap-stripped, uppercase subject sequence.
    pub subject_seq: Seq,
    pub mismatches_and_gaps: usize,
    pub query_is_rc: bool,
    pub subject_is_circular: bool,
    pub tag: String,
}

impl Match {
    /// `entry ⊕ (qs mod L)` — stable across equivalent copies that appear at
    /// different offsets on the doubled target.
    pub fn unique_id(&self, target_len: usize) -> String {
        let wrapped = if target_len == 0 { 0 } else { self.qs % target_len };
        format!("{}@{}", self.entry_id, wrapped)
    }

    pub fn query_len(&self) -> usize {
        self.qe - self.qs + 1
    }

    fn subject_len(&self) -> usize {
        self.se - self.ss + 1
    }

    /// `max(qe-qs+1, se-ss+1)`.
    pub fn len(&self) -> usize {
        self.query_len().max(self.subject_len())
    }

    /// Non-gapped match ratio used to threshold by percent identity:
    /// matched bases over the longer of the two spans.
    pub fn match_ratio(&self) -> f64 {
        let aligned = self.subject_len().min(self.query_len());
        let matched = aligned.saturating_sub(self.mismatches_and_gaps);
        matched as f64 / self.len().max(1) as f64
    }

    /// Validate `qs <= qe`, that the subject span length equals the
    /// gap-stripped subject sequence length, and `len() == max(query_len,
    /// subject_len)`.
    pub fn is_valid(&self) -> bool {
        self.qs <= self.qe
            && self.se >= self.ss
            && self.subject_len() == self.subject_seq.len()
            && self.len() == self.query_len().max(self.subject_len())
    }

    /// Whether this match came from scanning the query's reverse complement.
    /// A subject entry searched on its reverse-complement strand is recorded
    /// by the homology driver flipping `query_is_rc` for that half of the
    /// search, so this reduces to the stored flag.
    pub fn is_reverse_match(&self) -> bool {
        self.query_is_rc
    }
}

/// `engulfed(a, b) = b.qs >= a.qs && b.qe <= a.qe`.
pub fn engulfed(a: &Match, b: &Match) -> bool {
    b.qs >= a.qs && b.qe <= a.qe
}

/// Sort matches by (qs ascending, length descending, circular before
/// non-circular, fewer mismatches first, entry id descending as final
/// tie-break).
pub fn sort_matches(matches: &mut [Match]) {
    matches.sort_by(|a, b| {
        a.qs
            .cmp(&b.qs)
            .then_with(|| b.len().cmp(&a.len()))
            .then_with(|| {
                // Circular before non-circular.
                b.subject_is_circular.cmp(&a.subject_is_circular)
            })
            .then_with(|| a.mismatches_and_gaps.cmp(&b.mismatches_and_gaps))
            .then_with(|| b.entry_id.cmp(&a.entry_id))
    });
}

/// For each database group independently, sort matches and drop any match
/// engulfed by the preceding (`limit`-th) kept match, then re-sort globally.
pub fn cull(matches: Vec<Match>, limit: usize) -> Vec<Match> {
    use std::collections::HashMap;

    let mut groups: HashMap<String, Vec<Match>> = HashMap::new();
    for m in matches {
        groups.entry(m.db_id.clone()).or_default().push(m);
    }

    let mut kept = Vec::new();
    for (_, mut group) in groups {
        sort_matches(&mut group);
        let mut window: Vec<Match> = Vec::new();
        for m in group {
            let is_engulfed = window.len() >= limit
                && window[window.len() - limit..]
                    .iter()
                    .any(|kept_m| engulfed(kept_m, &m));
            if !is_engulfed {
                window.push(m);
            }
        }
        kept.extend(window);
    }

    sort_matches(&mut kept);
    kept
}

impl PartialEq for Match {
    fn eq(&self, other: &Self) -> bool {
        self.db_id == other.db_id
            && self.entry_id == other.entry_id
            && self.qs == other.qs
            && self.qe == other.qe
    }
}

impl Eq for Match {}

impl PartialOrd for Match {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.qs.cmp(&other.qs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::seq_from_str;

    fn m(qs: usize, qe: usize, entry: &str) -> Match {
        Match {
            db_id: "db".into(),
            entry_id: entry.into(),
            qs,
            qe,
            ss: 0,
            se: qe - qs,
            subject_seq: seq_from_str(&"A".repeat(qe - qs + 1)),
            mismatches_and_gaps: 0,
            query_is_rc: false,
            subject_is_circular: false,
            tag: String::new(),
        }
    }

    #[test]
    fn engulfed_detects_containment() {
        let a = m(10, 50, "a");
        let b = m(20, 40, "b");
        assert!(engulfed(&a, &b));
        assert!(!engulfed(&b, &a));
    }

    #[test]
    fn cull_drops_engulfed_matches_per_group() {
        let matches = vec![m(0, 100, "a"), m(10, 40, "b"), m(200, 300, "c")];
        let culled = cull(matches, 1);
        assert_eq!(culled.len(), 2);
        assert_eq!(culled[0].entry_id, "a");
        assert_eq!(culled[1].entry_id, "c");
    }

    #[test]
    fn match_validity_invariant() {
        let valid = m(0, 9, "a");
        assert!(valid.is_valid());
    }
}
