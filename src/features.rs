//! Feature-mode adapter: locates a caller-specified list of named features,
//! each supplied as its own sequence rather than a span on a pre-existing
//! target, so the planner can be driven by feature identity instead of raw
//! coordinates.
//!
//! Not called from [`crate::plan`] itself (the same reasoning as
//! [`crate::backbone`]: locating features needs the source databases and
//! produces a `Vec<Frag>` the caller feeds into
//! [`crate::assembly::enumerate`] with `features = true`, a different shape
//! than `plan`'s own whole-target search).

use crate::config::Config;
use crate::error::EngineError;
use crate::external::AlignmentTool;
use crate::fragment::{Frag, FragKind};
use crate::homology::{search_all, Database};
use crate::matching::{cull, Match};
use crate::sequence::Seq;
use crate::target::Target;

/// A named feature, given as its own sequence (e.g. "promoter", "ori",
/// "selection marker") rather than a span on some other target.
#[derive(Clone, Debug)]
pub struct Feature {
    pub name: String,
    pub sequence: Seq,
}

impl Feature {
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Each feature's `(name, start, end)` span on the synthetic, in-order
/// concatenation of all features — the coordinate space `Frag::feature_range`
/// lives in for feature-mode planning.
fn feature_spans(features: &[Feature]) -> Vec<(String, usize, usize)> {
    let mut offset = 0usize;
    let mut spans = Vec::with_capacity(features.len());
    for f in features {
        let start = offset;
        let end = offset + f.len().saturating_sub(1);
        spans.push((f.name.clone(), start, end));
        offset += f.len();
    }
    spans
}

/// Locate every feature in `features` against `target`/`databases`: BLAST
/// each feature's sequence on its own, merge adjoining hits from the same
/// source entry into one extended hit, and fall back to an exact substring
/// scan of the target when the alignment tool finds nothing (a feature
/// short enough to fall below the tool's own seed length still needs to be
/// locatable). Each feature keeps at most `cfg.max_fragments` of its best
/// hits, one `Frag` per hit with `feature_range` set to that feature's span.
pub fn locate(
    features: &[Feature],
    target: &Target,
    tool: &(impl AlignmentTool + Sync),
    databases: &[Database],
    cfg: &Config,
) -> Result<Vec<Frag>, EngineError> {
    if features.is_empty() {
        return Err(EngineError::Input("feature mode requires at least one feature".into()));
    }

    let spans = feature_spans(features);
    let mut frags = Vec::new();

    for (feature, (name, fstart, fend)) in features.iter().zip(spans.into_iter()) {
        let mut hits = search_feature(&feature.sequence, tool, databases, cfg)?;
        if hits.is_empty() {
            hits = substring_scan(&feature.sequence, target);
        }
        if hits.is_empty() {
            return Err(EngineError::Search(format!(
                "feature '{name}' not found in target or any source database"
            )));
        }

        for m in cull(hits, cfg.max_fragments) {
            let amplify_cost = cfg.pcr_cost_per_bp * feature.len() as f64 + cfg.pcr_cost_per_reaction;
            let procure_cost = databases
                .iter()
                .find(|db| db.id == m.db_id)
                .map(|db| db.cost_per_order)
                .unwrap_or(0.0);
            frags.push(Frag {
                kind: FragKind::Pcr,
                id: format!("{name}@{}", m.qs),
                qs: m.qs,
                qe: m.qe,
                seq: m.subject_seq.clone(),
                source: Some(m),
                procure_cost,
                amplify_cost,
                feature_range: Some((fstart, fend)),
            });
        }
    }

    Ok(frags)
}

/// One BLAST pass for a single feature's sequence, re-running
/// [`search_all`]'s full database search and merging adjoining hits before
/// returning.
fn search_feature(
    feature_seq: &Seq,
    tool: &(impl AlignmentTool + Sync),
    databases: &[Database],
    cfg: &Config,
) -> Result<Vec<Match>, EngineError> {
    let mut hits = search_all(tool, feature_seq, databases, cfg)?;
    merge_adjoining(&mut hits, cfg);
    Ok(hits)
}

/// Merge hits against the same database entry whose query spans adjoin or
/// overlap (within `min_homology`) into a single extended hit, so a feature
/// split across two alignment-tool seeds doesn't surface as two fragments.
fn merge_adjoining(hits: &mut Vec<Match>, cfg: &Config) {
    hits.sort_by(|a, b| (&a.db_id, &a.entry_id, a.qs).cmp(&(&b.db_id, &b.entry_id, b.qs)));
    let mut merged: Vec<Match> = Vec::new();
    for m in hits.drain(..) {
        if let Some(last) = merged.last_mut() {
            let adjoining = last.db_id == m.db_id
                && last.entry_id == m.entry_id
                && (m.qs as i64 - last.qe as i64) <= cfg.min_homology as i64;
            if adjoining {
                last.qe = last.qe.max(m.qe);
                last.se = last.se.max(m.se);
                last.mismatches_and_gaps += m.mismatches_and_gaps;
                continue;
            }
        }
        merged.push(m);
    }
    *hits = merged;
}

/// Exact substring fallback: scan the doubled target directly for a feature
/// too short for the alignment tool to reliably seed on.
fn substring_scan(feature_seq: &Seq, target: &Target) -> Vec<Match> {
    let doubled = target.doubled();
    let flen = feature_seq.len();
    if flen == 0 || flen > doubled.len() {
        return Vec::new();
    }
    let mut hits = Vec::new();
    for start in 0..=(doubled.len() - flen) {
        if doubled[start..start + flen] == feature_seq[..] {
            hits.push(Match {
                db_id: "target".into(),
                entry_id: target.id.clone(),
                qs: start,
                qe: start + flen - 1,
                ss: 0,
                se: flen - 1,
                subject_seq: feature_seq.clone(),
                mismatches_and_gaps: 0,
                query_is_rc: false,
                subject_is_circular: true,
                tag: "substring-fallback".into(),
            });
        }
    }
    hits
}
