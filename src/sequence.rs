//! Sequence utilities: reverse complement, IUPAC ambiguity-code decoding, and
//! junction (overlap) search between two sequences.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A DNA nucleotide. Ambiguity codes are never represented here; they only
/// ever appear as `&str` recognition literals fed to [`recog_regex`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Nucleotide {
    A,
    C,
    G,
    T,
}

impl Nucleotide {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'C' => Some(Self::C),
            'G' => Some(Self::G),
            'T' => Some(Self::T),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::C => 'C',
            Self::G => 'G',
            Self::T => 'T',
        }
    }

    pub fn complement(self) -> Self {
        match self {
            Self::A => Self::T,
            Self::T => Self::A,
            Self::C => Self::G,
            Self::G => Self::C,
        }
    }
}

/// Index 0 is the 5' end.
pub type Seq = Vec<Nucleotide>;

/// Parse an uppercase-or-lowercase ACGT string into a [`Seq`], discarding any
/// other character.
pub fn seq_from_str(s: &str) -> Seq {
    s.chars().filter_map(Nucleotide::from_char).collect()
}

pub fn seq_to_string(seq: &[Nucleotide]) -> String {
    seq.iter().map(|nt| nt.to_char()).collect()
}

/// Reverse-complement a pure-ACGT sequence.
pub fn reverse_complement(seq: &[Nucleotide]) -> Seq {
    seq.iter().rev().map(|nt| nt.complement()).collect()
}

/// Reverse-complement a string that may contain `^`/`_` cut-site markers (as
/// used in restriction-enzyme recognition literals). `^` and `_` are swapped
/// along with the bases so that a recognition string round-trips correctly:
/// `revcomp("ATG^_CAT") == "ATG^_CAT"`. Non-ACGT/^/_ characters pass through
/// unchanged in place, then the whole string is reversed.
pub fn reverse_complement_str(s: &str) -> String {
    s.chars()
        .map(|c| match c.to_ascii_uppercase() {
            'A' => 'T',
            'T' => 'A',
            'C' => 'G',
            'G' => 'C',
            '^' => '_',
            '_' => '^',
            other => other,
        })
        .rev()
        .collect()
}

/// Disjunction of bases each IUPAC ambiguity code matches. Exact bases are
/// omitted; callers pass those through unchanged.
fn iupac_disjunction(code: char) -> Option<&'static [char]> {
    match code.to_ascii_uppercase() {
        'M' => Some(&['A', 'C']),
        'R' => Some(&['A', 'G']),
        'W' => Some(&['A', 'T']),
        'Y' => Some(&['C', 'T']),
        'S' => Some(&['G', 'C']),
        'K' => Some(&['G', 'T']),
        'H' => Some(&['A', 'C', 'T']),
        'D' => Some(&['A', 'G', 'T']),
        'V' => Some(&['A', 'C', 'G']),
        'B' => Some(&['C', 'G', 'T']),
        'N' => Some(&['A', 'C', 'G', 'T']),
        'X' => Some(&['A', 'C', 'G', 'T']),
        _ => None,
    }
}

/// Decode an IUPAC-ambiguity recognition literal into a regular-expression
/// source string. Every code is mapped; a character that is neither an exact
/// base nor a recognized ambiguity code is an [`EngineError::Input`].
///
/// `recog_regex("RGGWCCY") == "(A|G)GG(A|T)CC(C|T)"`.
pub fn recog_regex(pattern: &str) -> Result<String, EngineError> {
    let mut out = String::new();
    for c in pattern.chars() {
        match c.to_ascii_uppercase() {
            b @ ('A' | 'C' | 'G' | 'T') => out.push(b),
            other => match iupac_disjunction(other) {
                Some(bases) => {
                    out.push('(');
                    for (i, b) in bases.iter().enumerate() {
                        if i > 0 {
                            out.push('|');
                        }
                        out.push(*b);
                    }
                    out.push(')');
                }
                None => {
                    return Err(EngineError::Input(format!(
                        "unrecognized IUPAC code '{other}' in recognition literal '{pattern}'"
                    )));
                }
            },
        }
    }
    Ok(out)
}

/// The longest exact suffix of `a` that is also a prefix of `b`, with length
/// in `[min, max]`. Empty if none exists in that length range.
pub fn junction(a: &[Nucleotide], b: &[Nucleotide], min: usize, max: usize) -> Seq {
    let upper = max.min(a.len()).min(b.len());
    if upper < min {
        return Vec::new();
    }
    for len in (min..=upper).rev() {
        if a[a.len() - len..] == b[..len] {
            return a[a.len() - len..].to_vec();
        }
    }
    Vec::new()
}

/// Iteratively strips any junction between a sequence and itself from the
/// tail, accumulating the removed overlap. Used to detect a fragment that
/// self-anneals at its own ends (e.g. a terminal repeat).
pub fn self_junction(f: &[Nucleotide], min: usize, max: usize) -> Seq {
    let mut removed = Vec::new();
    let mut remaining = f.to_vec();

    loop {
        if remaining.is_empty() {
            break;
        }
        let j = junction(&remaining, f, min, max);
        if j.is_empty() {
            break;
        }
        let jl = j.len();
        removed.extend(j);
        remaining.truncate(remaining.len() - jl);
    }

    removed
}
