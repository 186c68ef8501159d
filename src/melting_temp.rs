#![allow(non_snake_case)]

//! Primer melting-temperature calculations, following SantaLucia & Hicks
//! (2004) nearest-neighbor thermodynamics with a salt correction.
//!
//! Adapted from BioPython's `Bio.SeqUtils.MeltingTemp` module.

use crate::sequence::{Nucleotide, Nucleotide::A, Nucleotide::C, Nucleotide::G, Nucleotide::T, Seq};

const R: f32 = 1.987; // Universal gas constant (Cal/C * Mol).
pub const MIN_PRIMER_LEN: usize = 10;

/// Monovalent/divalent ion and primer concentrations used for the salt
/// correction term, in millimolar (nanomolar for `primer`).
#[derive(Clone, Copy, Debug)]
pub struct IonConcentrations {
    pub monovalent: f32,
    pub divalent: f32,
    pub dntp: f32,
    /// Primer concentration, in nM.
    pub primer: f32,
}

impl Default for IonConcentrations {
    fn default() -> Self {
        Self {
            monovalent: 50.0,
            divalent: 1.5,
            dntp: 0.6,
            primer: 250.0,
        }
    }
}

fn gc_fraction(seq: &[Nucleotide]) -> f32 {
    if seq.is_empty() {
        return 0.0;
    }
    let gc = seq.iter().filter(|nt| matches!(nt, C | G)).count();
    gc as f32 / seq.len() as f32
}

/// Enthalpy (dH, kcal/mol) and entropy (dS, cal/mol*K) for a nearest-neighbor
/// pair, SantaLucia & Hicks (2004) Table 1.
fn dH_dS_neighbors(neighbors: (Nucleotide, Nucleotide)) -> (f32, f32) {
    match neighbors {
        (A, A) | (T, T) => (-7.6, -21.3),
        (A, T) => (-7.2, -20.4),
        (T, A) => (-7.2, -21.3),
        (C, A) | (T, G) => (-8.5, -22.7),
        (G, T) | (A, C) => (-8.4, -22.4),
        (C, T) | (A, G) => (-7.8, -21.0),
        (G, A) | (T, C) => (-8.2, -22.2),
        (C, G) => (-10.6, -27.2),
        (G, C) => (-9.8, -24.4),
        (G, G) | (C, C) => (-8.0, -19.9),
    }
}

/// Salt-correction term applied to dS (SantaLucia 1998 method 5: oligomer
/// length correction using only monovalent ion concentration).
fn salt_correction(seq: &[Nucleotide], ion: &IonConcentrations) -> Option<f32> {
    if seq.is_empty() {
        return None;
    }
    let mon_molar = ion.monovalent * 1e-3;
    if mon_molar <= 0.0 {
        return None;
    }
    Some(0.368 * (seq.len() as f32 - 1.0) * mon_molar.ln())
}

/// Duplex melting temperature (Celsius) of `seq` against its exact
/// complement, under the given ion/primer concentrations.
pub fn duplex_tm(seq: &[Nucleotide], ion: &IonConcentrations) -> Option<f32> {
    if seq.len() < MIN_PRIMER_LEN {
        return None;
    }

    let mut dH = 0.2;
    let mut dS = -5.7;

    if gc_fraction(seq) < 0.001 {
        dH += 2.2;
        dS += 6.9;
    }

    let mut at_term_count = 0;
    for nt in [seq[0], seq[seq.len() - 1]] {
        if matches!(nt, A | T) {
            at_term_count += 1;
        }
    }
    dH += 2.2 * at_term_count as f32;
    dS += 6.9 * at_term_count as f32;

    for window in seq.windows(2) {
        let (dH_nn, dS_nn) = dH_dS_neighbors((window[0], window[1]));
        dH += dH_nn;
        dS += dS_nn;
    }

    if let Some(sc) = salt_correction(seq, ion) {
        dS += sc;
    }

    let c_t = ion.primer * 1e-9;
    // SantaLucia & Hicks, Equation 3; C_T / 2 (not / 4) for double-stranded
    // concentration with non-self-complementary strands at equal molarity.
    Some((1_000.0 * dH) / (dS + R * (c_t / 2.0).ln()) - 273.15)
}

/// Approximate hairpin melting temperature: the highest duplex Tm among all
/// internal self-complementary stem candidates of at least `min_stem` bases,
/// separated by a loop of at least `min_loop` bases. Returns `None` if no
/// qualifying stem exists.
pub fn hairpin_tm(seq: &[Nucleotide], min_stem: usize, min_loop: usize) -> Option<f32> {
    let n = seq.len();
    if n < 2 * min_stem + min_loop {
        return None;
    }

    let ion = IonConcentrations::default();
    let mut best: Option<f32> = None;

    for stem_len in (min_stem..=n / 2).rev() {
        for start in 0..=(n - 2 * stem_len - min_loop) {
            let left = &seq[start..start + stem_len];
            let right_start = start + stem_len + min_loop;
            if right_start + stem_len > n {
                continue;
            }
            let right = &seq[right_start..right_start + stem_len];
            let right_rc: Seq = right.iter().rev().map(|nt| nt.complement()).collect();
            if left == right_rc.as_slice() {
                if let Some(tm) = duplex_tm(left, &ion) {
                    best = Some(best.map_or(tm, |b: f32| b.max(tm)));
                }
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::seq_from_str;

    #[test]
    fn duplex_tm_increases_with_gc_content() {
        let ion = IonConcentrations::default();
        let at_rich = seq_from_str("AAAAAAAAAAAAAAAAAAAA");
        let gc_rich = seq_from_str("GCGCGCGCGCGCGCGCGCGC");
        let tm_at = duplex_tm(&at_rich, &ion).unwrap();
        let tm_gc = duplex_tm(&gc_rich, &ion).unwrap();
        assert!(tm_gc > tm_at);
    }

    #[test]
    fn duplex_tm_none_below_min_len() {
        let ion = IonConcentrations::default();
        let short = seq_from_str("ACGT");
        assert!(duplex_tm(&short, &ion).is_none());
    }

    #[test]
    fn hairpin_tm_detects_self_complementary_stem() {
        // "AAAAA" ... loop ... "TTTTT" reverse-complements to "AAAAA".
        let seq = seq_from_str("AAAAACCCCCCCCCCTTTTT");
        assert!(hairpin_tm(&seq, 5, 3).is_some());
    }

    #[test]
    fn hairpin_tm_none_without_a_stem() {
        let seq = seq_from_str("ACGTACGTACGTACGTACGT");
        assert!(hairpin_tm(&seq, 8, 3).is_none());
    }
}
