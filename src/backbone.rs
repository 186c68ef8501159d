//! Backbone digester: cuts a backbone with one or two restriction enzymes
//! and orients the linearized form.
//!
//! Called ahead of [`crate::plan`], not from within it: a caller that wants
//! a specific backbone included runs `digest` once to linearize it, then
//! wraps the result in a `fragment::Frag` of kind `Backbone` (or adds it to
//! a `homology::Database` entry so it competes for coverage like any other
//! source) before invoking `plan`. Digestion needs the enzyme catalog and
//! original circular sequence up front, neither of which `plan` takes as
//! input, so folding it into the planning entry point would mean widening
//! that signature for a step most callers run once per backbone, not once
//! per planning run.

use crate::error::EngineError;
use crate::restriction_enzyme::{find_sites, Enzyme};
use crate::sequence::Seq;

pub const MIN_BACKBONE_LEN: usize = 38;

/// The original source sequence, the enzymes used to cut it, the cut-site
/// indices, and a strand flag per cut.
#[derive(Clone, Debug)]
pub struct BackboneRecord {
    pub original: Seq,
    pub enzymes: Vec<String>,
    pub cut_sites: Vec<usize>,
    /// `true` if the cut was found on the sense (top) strand scan.
    pub forward: Vec<bool>,
}

/// Digest `seq` with `enzymes` and return the linearized fragment plus the
/// record describing where it was cut.
pub fn digest(seq: &Seq, enzymes: &[Enzyme]) -> Result<(Seq, BackboneRecord), EngineError> {
    if enzymes.is_empty() {
        return Err(EngineError::Input(
            "backbone digestion requires at least one enzyme".into(),
        ));
    }

    // Step 1: undo doubling if the input already arrived as seq++seq.
    let mut working = seq.clone();
    if working.len() % 2 == 0 {
        let half = working.len() / 2;
        if working[..half] == working[half..] {
            working.truncate(half);
        }
    }

    let l = working.len();
    if l < MIN_BACKBONE_LEN {
        return Err(EngineError::Input(format!(
            "backbone is {l} bp; must be at least {MIN_BACKBONE_LEN} bp"
        )));
    }

    let mut doubled = working.clone();
    doubled.extend(working.iter().copied());

    // Step 2: find every recognition-site occurrence on both strands,
    // discarding occurrences whose start index >= L.
    let mut cuts: Vec<(usize, String, bool)> = Vec::new();
    for enzyme in enzymes {
        for site in find_sites(enzyme, &doubled, l)? {
            let idx = site.cut_index(enzyme) % l;
            cuts.push((idx, enzyme.name.clone(), site.top_strand));
        }
    }

    if cuts.is_empty() {
        return Err(EngineError::Input(
            "backbone contains no recognition site for the given enzyme(s)".into(),
        ));
    }

    // Step 3: sort and dedup identical cut positions, compute band lengths.
    cuts.sort_by_key(|c| c.0);
    cuts.dedup_by_key(|c| c.0);

    let enzyme_names: Vec<String> = enzymes.iter().map(|e| e.name.clone()).collect();

    if cuts.len() == 1 {
        // Step 4: exactly one cut — rotate to place it at index 0.
        let (idx, _, forward) = cuts[0].clone();
        let mut linearized = working[idx..].to_vec();
        linearized.extend(working[..idx].iter().copied());

        let record = BackboneRecord {
            original: working,
            enzymes: enzyme_names,
            cut_sites: vec![idx],
            forward: vec![forward],
        };
        return Ok((linearized, record));
    }

    // Step 5: multiple cuts — extract the largest band between two
    // consecutive cuts, wrapping through the origin if necessary.
    let n = cuts.len();
    let mut best: Option<(usize, usize, usize)> = None; // (start, end_exclusive_wrapped, len)
    for i in 0..n {
        let start = cuts[i].0;
        let end = if i + 1 < n { cuts[i + 1].0 } else { cuts[0].0 + l };
        let len = end - start;
        if best.map(|(_, _, best_len)| len > best_len).unwrap_or(true) {
            best = Some((start, end, len));
        }
    }
    let (start, end, _) = best.expect("cuts is non-empty");

    let linearized = if end <= l {
        working[start..end].to_vec()
    } else {
        let mut v = working[start..].to_vec();
        v.extend(working[..end - l].iter().copied());
        v
    };

    let record = BackboneRecord {
        original: working,
        enzymes: enzyme_names,
        cut_sites: cuts.iter().map(|c| c.0).collect(),
        forward: cuts.iter().map(|c| c.2).collect(),
    };

    Ok((linearized, record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::seq_from_str;

    /// A 105 bp backbone with a single "GAATTC" site at symmetric cut
    /// offsets (3,3), positioned at index 24.
    #[test]
    fn digest_single_site_in_frame() {
        let enzyme = Enzyme::parse("Test", "GAA^_TTC").unwrap();
        let before = "A".repeat(24);
        let site = "GAATTC";
        let after = "C".repeat(105 - 24 - 6);
        let full = format!("{before}{site}{after}");
        assert_eq!(full.len(), 105);
        let seq = seq_from_str(&full);

        let (linearized, record) = digest(&seq, std::slice::from_ref(&enzyme)).unwrap();

        let mut expected = seq[24..].to_vec();
        expected.extend(seq[..24].iter().copied());
        assert_eq!(linearized, expected);
        assert_eq!(record.cut_sites, vec![24]);
        assert!(record.forward[0]);
    }

    #[test]
    fn digest_rejects_short_backbone() {
        let enzyme = Enzyme::parse("EcoRI", "G^AATT_C").unwrap();
        let seq = seq_from_str(&"A".repeat(20));
        assert!(digest(&seq, &[enzyme]).is_err());
    }

    #[test]
    fn digest_rejects_no_site() {
        let enzyme = Enzyme::parse("EcoRI", "G^AATT_C").unwrap();
        let seq = seq_from_str(&"A".repeat(60));
        assert!(digest(&seq, &[enzyme]).is_err());
    }

    #[test]
    fn digest_undoubles_pre_doubled_input() {
        let enzyme = Enzyme::parse("Test", "GAA^_TTC").unwrap();
        let unit = format!("{}{}{}", "A".repeat(24), "GAATTC", "C".repeat(75));
        assert_eq!(unit.len(), 105);
        let doubled = format!("{unit}{unit}");
        let seq = seq_from_str(&doubled);

        let (linearized, record) = digest(&seq, &[enzyme]).unwrap();
        assert_eq!(record.original.len(), 105);
        assert_eq!(linearized.len(), 105);
    }
}
