//! The circular design target, represented on a doubled (linearized-around-
//! the-origin) coordinate space so wrap-around matches are handled uniformly
//! rather than by special-casing.

use crate::sequence::{Nucleotide, Seq};

#[derive(Clone, Debug)]
pub struct Target {
    pub id: String,
    seq: Seq,
    doubled: Seq,
}

impl Target {
    pub fn new(id: impl Into<String>, seq: Seq) -> Self {
        let mut doubled = seq.clone();
        doubled.extend(seq.iter().copied());
        Self {
            id: id.into(),
            seq,
            doubled,
        }
    }

    /// True circular length.
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn seq(&self) -> &[Nucleotide] {
        &self.seq
    }

    /// The doubled form (`seq ++ seq`), used for all coordinate arithmetic
    /// during search and assembly.
    pub fn doubled(&self) -> &[Nucleotide] {
        &self.doubled
    }

    /// A quadruple-length form, used when slicing synthetic/PCR pieces that
    /// must stay valid even when they start near the end of the doubled
    /// form and extend past it.
    pub fn quadrupled(&self) -> Seq {
        let mut q = self.doubled.clone();
        q.extend(self.doubled.iter().copied());
        q
    }

    /// Map a doubled-target position to its true circular coordinate.
    pub fn circular_pos(&self, p: usize) -> usize {
        if self.seq.is_empty() {
            0
        } else {
            p % self.seq.len()
        }
    }

    /// Slice `[start, end]` (0-based, inclusive) out of the doubled target.
    pub fn slice_doubled(&self, start: usize, end: usize) -> Seq {
        self.doubled[start..=end].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::seq_from_str;

    #[test]
    fn doubled_form_is_seq_repeated() {
        let t = Target::new("t1", seq_from_str("ACGTACGT"));
        assert_eq!(t.doubled().len(), 16);
        assert_eq!(&t.doubled()[0..8], &t.doubled()[8..16]);
    }

    #[test]
    fn circular_pos_wraps() {
        let t = Target::new("t1", seq_from_str("ACGTACGT"));
        assert_eq!(t.circular_pos(8), 0);
        assert_eq!(t.circular_pos(9), 1);
    }
}
