//! The `Primer` model and the quality gates applied to a candidate pair.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::config::Config;
use crate::melting_temp::{duplex_tm, hairpin_tm, IonConcentrations};
use crate::sequence::{seq_to_string, Nucleotide, Seq};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum PrimerDirection {
    Forward,
    Reverse,
}

/// A single designed oligo: its priming region on the target, the
/// non-template bases embedded at its 5' end (if any), and the metrics an
/// external primer-design tool reported for it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Primer {
    pub sequence: Seq,
    pub direction: PrimerDirection,
    /// 0-based, inclusive span of the priming region on the doubled target
    /// (excludes any embedded non-template bases at the 5' end).
    pub range: (usize, usize),
    pub tm: f32,
    pub gc_fraction: f32,
    /// Lower is better; as reported or approximated from a primer-design
    /// tool's objective function.
    pub penalty: f32,
    pub notes: String,
}

impl Primer {
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn to_string(&self) -> String {
        seq_to_string(&self.sequence)
    }

    /// Longest run of the same base, used for the homopolymer-length gate.
    pub fn longest_homopolymer(&self) -> u8 {
        let mut longest = 0u8;
        let mut run = 0u8;
        let mut prev: Option<Nucleotide> = None;
        for nt in &self.sequence {
            if prev == Some(*nt) {
                run += 1;
            } else {
                run = 1;
            }
            longest = longest.max(run);
            prev = Some(*nt);
        }
        longest
    }
}

/// Combined penalty of a forward/reverse pair, used to reject designs whose
/// pairing is poor even if each primer individually scores well.
pub fn pair_penalty(fwd: &Primer, rev: &Primer) -> f32 {
    fwd.penalty + rev.penalty
}

/// Validate a single primer against the configured thresholds: length range,
/// Tm range, homopolymer run length, and hairpin Tm.
pub fn validate_primer(primer: &Primer, cfg: &Config) -> Result<(), String> {
    if primer.len() < cfg.primer_len_min || primer.len() > cfg.primer_len_max {
        return Err(format!(
            "{} primer length {} outside [{}, {}]",
            primer.direction,
            primer.len(),
            cfg.primer_len_min,
            cfg.primer_len_max
        ));
    }
    if primer.tm < cfg.primer_tm_min || primer.tm > cfg.primer_tm_max {
        return Err(format!(
            "primer Tm {} outside [{}, {}]",
            primer.tm, cfg.primer_tm_min, cfg.primer_tm_max
        ));
    }
    if primer.longest_homopolymer() > cfg.max_homopolymer_len {
        return Err(format!(
            "primer has a homopolymer run of {} (max {})",
            primer.longest_homopolymer(),
            cfg.max_homopolymer_len
        ));
    }
    if let Some(hp_tm) = hairpin_tm(&primer.sequence, 4, 3) {
        if hp_tm > cfg.max_hairpin_tm {
            return Err(format!(
                "primer hairpin Tm {hp_tm} exceeds {}",
                cfg.max_hairpin_tm
            ));
        }
    }
    Ok(())
}

/// Validate a forward/reverse pair: each individually, their combined
/// penalty, and (unless disabled) the Tm difference between them.
pub fn validate_pair(fwd: &Primer, rev: &Primer, cfg: &Config) -> Result<(), String> {
    validate_primer(fwd, cfg)?;
    validate_primer(rev, cfg)?;

    if pair_penalty(fwd, rev) > cfg.max_pair_penalty {
        return Err(format!(
            "pair penalty {} exceeds {}",
            pair_penalty(fwd, rev),
            cfg.max_pair_penalty
        ));
    }

    if let Some(max_diff) = cfg.max_primer_tm_diff {
        let diff = (fwd.tm - rev.tm).abs();
        if diff > max_diff {
            return Err(format!("primer Tm difference {diff} exceeds {max_diff}"));
        }
    }

    Ok(())
}

/// Recompute `tm`/`gc_fraction` from `sequence` using the default ion model,
/// for primers assembled in-process rather than reported by an external tool.
pub fn recompute_metrics(primer: &mut Primer) {
    let ion = IonConcentrations::default();
    if let Some(tm) = duplex_tm(&primer.sequence, &ion) {
        primer.tm = tm;
    }
    let gc = primer
        .sequence
        .iter()
        .filter(|nt| matches!(nt, Nucleotide::C | Nucleotide::G))
        .count();
    primer.gc_fraction = gc as f32 / primer.sequence.len().max(1) as f32;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::seq_from_str;

    fn primer(seq: &str, tm: f32, penalty: f32) -> Primer {
        Primer {
            sequence: seq_from_str(seq),
            direction: PrimerDirection::Forward,
            range: (0, seq.len() - 1),
            tm,
            gc_fraction: 0.5,
            penalty,
            notes: String::new(),
        }
    }

    #[test]
    fn longest_homopolymer_counts_run() {
        let p = primer("ACGTAAAACGT", 60.0, 1.0);
        assert_eq!(p.longest_homopolymer(), 4);
    }

    #[test]
    fn validate_primer_rejects_short_length() {
        let cfg = Config::default();
        let p = primer("ACGT", 60.0, 1.0);
        assert!(validate_primer(&p, &cfg).is_err());
    }

    #[test]
    fn validate_primer_rejects_out_of_range_tm() {
        let cfg = Config::default();
        let p = primer("ACGTACGTACGTACGTACGT", 30.0, 1.0);
        assert!(validate_primer(&p, &cfg).is_err());
    }

    #[test]
    fn validate_pair_rejects_large_tm_difference() {
        let cfg = Config::default();
        let fwd = primer("ACGTACGTACGTACGTACGT", 60.0, 1.0);
        let rev = primer("ACGTACGTACGTACGTACGT", 68.0, 1.0);
        assert!(validate_pair(&fwd, &rev, &cfg).is_err());
    }

    #[test]
    fn validate_pair_accepts_well_matched_primers() {
        let cfg = Config::default();
        let fwd = primer("ACGTACGTACGTACGTACGT", 60.0, 1.0);
        let rev = primer("ACGTACGTACGTACGTACGT", 61.0, 1.0);
        assert!(validate_pair(&fwd, &rev, &cfg).is_ok());
    }
}
