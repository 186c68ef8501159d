//! The `Frag` model: one piece in a candidate assembly, plus the cost and
//! reach calculations the DAG enumerator walks over.

use strum_macros::Display;

use crate::config::Config;
use crate::matching::Match;
use crate::sequence::Seq;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum FragKind {
    /// Already linear at the source (e.g. a digested backbone), used as-is.
    Linear,
    /// A single source match covering the whole target, circularizing on
    /// its own with no partner fragment.
    Circular,
    /// Sourced from an existing plasmid/fragment database entry via PCR.
    Pcr,
    /// Ordered from a gene-synthesis vendor.
    Synthetic,
}

/// One node in the assembly DAG: a piece of the final construct, anchored at
/// `[qs, qe]` on the doubled target.
#[derive(Clone, Debug)]
pub struct Frag {
    pub kind: FragKind,
    pub id: String,
    /// 0-based inclusive span on the doubled target this fragment covers.
    pub qs: usize,
    pub qe: usize,
    pub seq: Seq,
    /// The match this fragment was sourced from, if any (`None` for pure
    /// synthesis pieces with no template).
    pub source: Option<Match>,
    /// The source database's per-order procurement cost, charged once per
    /// distinct source in an assembly regardless of how many fragments draw
    /// from it (0 for synthetic pieces, which have no separate order step).
    pub procure_cost: f64,
    /// Unpenalized PCR-reaction or synthesis surcharge. `synthetic_penalty`
    /// is applied on top of this only when computing `adjusted_cost`, never
    /// baked in here, so raw and adjusted cost stay reportable separately.
    pub amplify_cost: f64,
    /// In feature mode, this fragment's span on the synthetic
    /// feature-concatenation target (`(featureStart, featureEnd)`). `None`
    /// outside feature mode, where ordinary `qs`/`qe` reach is used instead.
    pub feature_range: Option<(usize, usize)>,
}

impl Frag {
    pub fn query_len(&self) -> usize {
        self.qe - self.qs + 1
    }

    /// The database/entry pair this fragment was sourced from, used to
    /// charge procurement cost exactly once per distinct source within an
    /// assembly. `None` for synthetic pieces.
    pub fn source_key(&self) -> Option<String> {
        self.source.as_ref().map(|m| format!("{}:{}", m.db_id, m.entry_id))
    }

    /// Dollar cost of including this fragment in an assembly, independent of
    /// its neighbors. `procure` is false once a given source has already
    /// been charged earlier in the same assembly.
    pub fn cost(&self, procure: bool) -> f64 {
        self.amplify_cost + if procure { self.procure_cost } else { 0.0 }
    }

    /// Like `cost`, but with `Config::synthetic_penalty` applied to the
    /// synthesis-surcharge component only.
    pub fn adjusted_cost(&self, procure: bool, cfg: &Config) -> f64 {
        let amplify = if matches!(self.kind, FragKind::Synthetic) {
            self.amplify_cost * cfg.synthetic_penalty
        } else {
            self.amplify_cost
        };
        amplify + if procure { self.procure_cost } else { 0.0 }
    }

    /// Marginal cost of extending from this fragment's end through `next`:
    /// a fixed per-junction Gibson-assembly fee plus `next`'s own cost.
    pub fn cost_to(&self, next: &Frag, cfg: &Config, procure_next: bool) -> f64 {
        cfg.gibson_fixed_cost + next.cost(procure_next)
    }

    pub fn adjusted_cost_to(&self, next: &Frag, cfg: &Config, procure_next: bool) -> f64 {
        cfg.gibson_fixed_cost + next.adjusted_cost(procure_next, cfg)
    }

    /// How far (in doubled-target coordinates) this fragment's right end
    /// reaches, accounting for homology or embedded-primer extension.
    pub fn reach(&self) -> usize {
        self.qe
    }

    /// Signed gap from this fragment's end to `next`'s start; negative means
    /// overlap.
    fn dist_to(&self, next: &Frag) -> i64 {
        next.qs as i64 - self.qe as i64
    }

    /// Whether `self` and `next` could be joined by a PCR-primer embed
    /// (their gap is small enough to bridge with added, non-template bases
    /// at up to `max_embed_len` on each primer).
    pub fn could_overlap_via_pcr(&self, next: &Frag, cfg: &Config) -> bool {
        self.dist_to(next) <= 2 * cfg.max_embed_len as i64 - cfg.min_homology as i64
    }

    /// Whether `self` and `next` already share enough natural sequence
    /// homology (without any added bases) to anneal directly.
    pub fn overlaps_via_homology(&self, next: &Frag, cfg: &Config) -> bool {
        self.dist_to(next) <= -(cfg.min_homology as i64)
    }

    /// Number of synthetic pieces needed to bridge the gap between `self`'s
    /// end and `next`'s start; 0 if they're already PCR- or homology-
    /// reachable.
    pub fn synth_dist(&self, next: &Frag, cfg: &Config) -> usize {
        if self.overlaps_via_homology(next, cfg) || self.could_overlap_via_pcr(next, cfg) {
            return 0;
        }
        let dist = self.dist_to(next).max(1) as usize;
        (dist + cfg.max_synthetic_len - 1) / cfg.max_synthetic_len
    }
}
