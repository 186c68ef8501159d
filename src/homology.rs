//! Homology search: runs the alignment tool against every configured
//! database, culls engulfed hits, and screens designed primers for
//! off-target binding elsewhere in a source template.

use rayon::prelude::*;

use crate::config::Config;
use crate::error::EngineError;
use crate::external::AlignmentTool;
use crate::matching::{cull, Match};
use crate::melting_temp::{duplex_tm, IonConcentrations};
use crate::primer::Primer;
use crate::sequence::Seq;

/// A named source database: its id, the entries it holds, and the per-order
/// procurement cost charged once per distinct entry used in an assembly.
pub struct Database {
    pub id: String,
    pub entries: Vec<(String, Seq)>,
    pub cost_per_order: f64,
}

/// Search every database for matches against `query`, one call per database
/// dispatched in parallel, then cull engulfed hits and sort the combined
/// result.
pub fn search_all(
    tool: &(impl AlignmentTool + Sync),
    query: &Seq,
    databases: &[Database],
    cfg: &Config,
) -> Result<Vec<Match>, EngineError> {
    let per_db: Vec<Result<Vec<Match>, EngineError>> = databases
        .par_iter()
        .map(|db| tool.search(&db.id, query, &db.entries))
        .collect();

    let mut all_matches = Vec::new();
    for result in per_db {
        all_matches.extend(result?);
    }

    let filtered: Vec<Match> = all_matches
        .into_iter()
        .filter(|m| m.is_valid() && m.match_ratio() >= cfg.min_identity)
        .collect();

    Ok(cull(filtered, cfg.max_fragments))
}

/// Identity-band alignment parameters: (reward, mismatch penalty, gap-open,
/// gap-extend, e-value), selected by how strict the caller's identity floor
/// is. Tighter bands get a stiffer mismatch/gap penalty and a smaller
/// e-value so the tool doesn't waste time on hits that would be filtered out
/// downstream anyway.
pub fn identity_band_params(min_identity: f64) -> (i32, i32, i32, i32, f64) {
    if min_identity >= 0.99 {
        (1, -3, 5, 2, 1e-10)
    } else if min_identity >= 0.98 {
        (1, -2, 4, 2, 1e-8)
    } else if min_identity >= 0.90 {
        (1, -1, 2, 1, 1e-5)
    } else {
        (1, -1, 1, 1, 1e-2)
    }
}

/// Off-target screen (the homology-search driver's "mismatch" check): search
/// `primer`'s sequence against every entry other than its own template, and
/// report any hit whose duplex Tm exceeds `cfg.max_off_target_tm`. One
/// expected binding is always allowed (the primer's own priming site); two
/// are allowed if the template is tagged circular, since a circular search
/// can legitimately report the same site twice across the doubled form.
pub fn off_target_hits(
    primer: &Primer,
    own_entry_id: &str,
    template_is_circular: bool,
    tool: &(impl AlignmentTool + Sync),
    databases: &[Database],
    cfg: &Config,
) -> Result<Vec<Match>, EngineError> {
    let allowed = if template_is_circular { 2 } else { 1 };
    let ion = IonConcentrations::default();

    let mut hot: Vec<Match> = Vec::new();
    for db in databases {
        let others: Vec<(String, Seq)> = db
            .entries
            .iter()
            .filter(|(id, _)| id != own_entry_id)
            .cloned()
            .collect();
        if others.is_empty() {
            continue;
        }
        for m in tool.search(&db.id, &primer.sequence, &others)? {
            if let Some(tm) = duplex_tm(&m.subject_seq, &ion) {
                if tm > cfg.max_off_target_tm {
                    hot.push(m);
                }
            }
        }
    }

    if hot.len() > allowed {
        Ok(hot)
    } else {
        Ok(Vec::new())
    }
}
