//! Restriction enzymes: recognition literals (with `^`/`_` cut markers),
//! decoding, and site scanning against a sequence.
//!
//! [Wikipedia: List of RE sites](https://en.wikipedia.org/wiki/List_of_restriction_enzyme_cutting_sites:_A)

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::sequence::{recog_regex, seq_to_string};

/// An enzyme's recognition literal, decoded. `site` is the IUPAC recognition
/// sequence with its `^`/`_` cut markers stripped out; `cut_top`/`cut_bottom`
/// are the cut offsets (bases from the 5' end of `site`) on the sense and
/// complement strands respectively.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Enzyme {
    pub name: String,
    pub recognition: String,
    pub site: String,
    pub cut_top: usize,
    pub cut_bottom: usize,
}

impl Enzyme {
    /// Parse a recognition literal such as `"G^AATT_C"`: `^` marks the
    /// top-strand cut, `_` the bottom-strand cut.
    pub fn parse(name: &str, recognition_literal: &str) -> Result<Self, EngineError> {
        let mut site = String::new();
        let mut cut_top = None;
        let mut cut_bottom = None;

        for c in recognition_literal.chars() {
            match c {
                '^' => cut_top = Some(site.len()),
                '_' => cut_bottom = Some(site.len()),
                other => site.push(other.to_ascii_uppercase()),
            }
        }

        let cut_top = cut_top.ok_or_else(|| {
            EngineError::Input(format!(
                "enzyme '{name}' recognition literal '{recognition_literal}' is missing a '^' top-strand cut marker"
            ))
        })?;
        let cut_bottom = cut_bottom.unwrap_or(cut_top);

        Ok(Self {
            name: name.to_owned(),
            recognition: recognition_literal.to_owned(),
            site,
            cut_top,
            cut_bottom,
        })
    }

    pub fn makes_blunt_ends(&self) -> bool {
        self.cut_top == self.cut_bottom
    }

    /// Whether the recognition site reads the same on the complementary
    /// strand (after IUPAC-aware complementing and reversal), in which case
    /// the complement-strand scan is skipped (it would just re-find the
    /// same sites).
    pub fn is_palindromic(&self) -> bool {
        iupac_reverse_complement(&self.site) == self.site
    }

    pub fn site_regex(&self) -> Result<Regex, EngineError> {
        let pattern = recog_regex(&self.site)?;
        Regex::new(&pattern)
            .map_err(|e| EngineError::Input(format!("bad recognition regex for '{}': {e}", self.name)))
    }
}

/// IUPAC-aware complement of a single ambiguity code.
fn iupac_complement_char(c: char) -> char {
    match c.to_ascii_uppercase() {
        'A' => 'T',
        'T' => 'A',
        'C' => 'G',
        'G' => 'C',
        'R' => 'Y',
        'Y' => 'R',
        'W' => 'W',
        'S' => 'S',
        'K' => 'M',
        'M' => 'K',
        'H' => 'D',
        'D' => 'H',
        'B' => 'V',
        'V' => 'B',
        other => other, // N, X pass through.
    }
}

fn iupac_reverse_complement(s: &str) -> String {
    s.chars().rev().map(iupac_complement_char).collect()
}

/// One occurrence of an enzyme's recognition site on the doubled backbone.
#[derive(Clone, Copy, Debug)]
pub struct EnzymeSite {
    /// 0-based start index into the doubled sequence.
    pub start: usize,
    pub len: usize,
    /// True if found scanning the sense strand directly; false if found by
    /// scanning for the site's reverse complement (i.e. it sits on the
    /// complementary strand).
    pub top_strand: bool,
}

impl EnzymeSite {
    /// The index (into the doubled sequence) immediately after the cut,
    /// oriented by which strand the site was found on.
    pub fn cut_index(&self, enzyme: &Enzyme) -> usize {
        if self.top_strand {
            self.start + enzyme.cut_top
        } else {
            self.start + self.len - enzyme.cut_bottom
        }
    }
}

/// Find every occurrence of `enzyme`'s recognition site on both strands of
/// `doubled_seq`, discarding occurrences whose start index is `>= l` (each
/// true site on the circular sequence is kept once). Palindromic
/// recognition sites skip the complement-strand scan.
pub fn find_sites(
    enzyme: &Enzyme,
    doubled_seq: &[crate::sequence::Nucleotide],
    l: usize,
) -> Result<Vec<EnzymeSite>, EngineError> {
    let text = seq_to_string(doubled_seq);
    let re = enzyme.site_regex()?;

    let mut sites: Vec<EnzymeSite> = re
        .find_iter(&text)
        .filter(|m| m.start() < l)
        .map(|m| EnzymeSite {
            start: m.start(),
            len: m.len(),
            top_strand: true,
        })
        .collect();

    if !enzyme.is_palindromic() {
        let rc_pattern = recog_regex(&iupac_reverse_complement(&enzyme.site))?;
        let rc_re = Regex::new(&rc_pattern)
            .map_err(|e| EngineError::Input(format!("bad RC recognition regex: {e}")))?;
        sites.extend(
            rc_re
                .find_iter(&text)
                .filter(|m| m.start() < l)
                .map(|m| EnzymeSite {
                    start: m.start(),
                    len: m.len(),
                    top_strand: false,
                }),
        );
    }

    sites.sort_by_key(|s| s.start);
    Ok(sites)
}

/// A small built-in library of common enzymes, analogous to a caller-loaded
/// key-value enzyme store (out of scope here).
pub fn common_enzymes() -> Vec<Enzyme> {
    [
        ("EcoRI", "G^AATT_C"),
        ("BamHI", "G^GATC_C"),
        ("HindIII", "A^AGCT_T"),
        ("NotI", "GC^GGCC_GC"),
        ("XhoI", "C^TCGA_G"),
        ("SpeI", "A^CTAG_T"),
        ("PstI", "CTGCA^G_"),
        ("SmaI", "CCC^GGG"),
        ("NdeI", "CA^TA_TG"),
        ("KpnI", "GGTAC^_C"),
    ]
    .into_iter()
    .map(|(name, lit)| Enzyme::parse(name, lit).expect("built-in recognition literal is valid"))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::seq_from_str;

    #[test]
    fn parses_cut_offsets_from_markers() {
        let e = Enzyme::parse("EcoRI", "G^AATT_C").unwrap();
        assert_eq!(e.site, "GAATTC");
        assert_eq!(e.cut_top, 1);
        assert_eq!(e.cut_bottom, 5);
    }

    #[test]
    fn ecori_is_palindromic() {
        let e = Enzyme::parse("EcoRI", "G^AATT_C").unwrap();
        assert!(e.is_palindromic());
    }

    #[test]
    fn finds_sense_strand_site() {
        let e = Enzyme::parse("EcoRI", "G^AATT_C").unwrap();
        let seq = seq_from_str("TTTTGAATTCTTTT");
        let sites = find_sites(&e, &seq, seq.len()).unwrap();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].start, 4);
    }

    #[test]
    fn digest_single_site_in_frame_cut_offset() {
        // symmetric cut offsets (3,3).
        let e = Enzyme::parse("Test", "GAA^_TTC").unwrap();
        assert_eq!(e.cut_top, 3);
        assert_eq!(e.cut_bottom, 3);
    }
}
