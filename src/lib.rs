//! Cost-optimal physical assembly planning for circular plasmids: given a
//! target sequence, a set of source-fragment databases, and a cost model,
//! finds the cheapest set of PCR, backbone, and synthetic pieces that
//! Gibson-assembles into the target.

pub mod assembly;
pub mod backbone;
pub mod cache;
pub mod config;
pub mod cost;
pub mod error;
pub mod external;
pub mod features;
pub mod fill;
pub mod fragment;
pub mod homology;
pub mod matching;
pub mod melting_temp;
pub mod primer;
pub mod restriction_enzyme;
pub mod sequence;
pub mod synthesis;
pub mod target;

pub use config::Config;
pub use error::{EngineError, Result};
pub use target::Target;

use log::{debug, info, warn};

use assembly::{enumerate, Assembly};
use cache::PrimerCache;
use cost::{group_by_count, pareto_frontier};
use external::{AlignmentTool, PrimerTool};
use fill::{fill_assembly, FilledAssembly};
use fragment::{Frag, FragKind};
use homology::{search_all, Database};
use matching::Match;
use synthesis::tile_synthesis;

/// Turn a raw alignment hit into a candidate fragment: a whole-target match
/// is already circular on its own; anything shorter is a PCR candidate,
/// priced per-bp plus a flat reaction fee, with its source's per-order
/// procurement cost attached so it's charged once per assembly regardless
/// of how many fragments draw from the same entry.
fn frag_from_match(m: Match, target: &Target, databases: &[Database], cfg: &Config) -> Frag {
    let kind = if m.query_len() >= target.len() {
        FragKind::Circular
    } else {
        FragKind::Pcr
    };
    let procure_cost = databases
        .iter()
        .find(|db| db.id == m.db_id)
        .map(|db| db.cost_per_order)
        .unwrap_or(0.0);
    let amplify_cost = cfg.pcr_cost_per_bp * m.query_len() as f64 + cfg.pcr_cost_per_reaction;

    Frag {
        kind,
        id: m.unique_id(target.len()),
        qs: m.qs,
        qe: m.qe,
        seq: m.subject_seq.clone(),
        source: Some(m),
        procure_cost,
        amplify_cost,
        feature_range: None,
    }
}

/// Build a pure-synthesis fallback assembly spanning the whole target, used
/// when no combination of source fragments circularizes within
/// `cfg.max_fragments`. Appends its tiled pieces to `frags` and returns an
/// `Assembly` indexing them.
fn synthesis_fallback(frags: &mut Vec<Frag>, target: &Target, cfg: &Config) -> Result<Assembly> {
    let pieces = tile_synthesis(target, 0, target.len() - 1, cfg)?;
    if pieces.len() > cfg.max_fragments {
        return Err(EngineError::Design(format!(
            "pure-synthesis fallback for target '{}' needs {} pieces, over the {}-fragment budget",
            target.id,
            pieces.len(),
            cfg.max_fragments
        )));
    }
    let start = frags.len();
    let indices: Vec<usize> = (start..start + pieces.len()).collect();
    frags.extend(pieces);
    let (cost, adjusted_cost) = assembly::total_cost(frags, &indices, cfg);
    Ok(Assembly {
        frag_indices: indices,
        cost,
        adjusted_cost,
    })
}

/// Plan every Pareto-optimal assembly of `target` from the given source
/// databases and a linearized backbone/synthesis fallback, using `align_tool`
/// for homology search and `primer_tool` for junction-primer design.
pub fn plan(
    target: &Target,
    databases: &[Database],
    align_tool: &(impl AlignmentTool + Sync),
    primer_tool: &impl PrimerTool,
    cfg: &Config,
) -> Result<Vec<FilledAssembly>> {
    info!("searching {} database(s) for target '{}'", databases.len(), target.id);

    let matches = search_all(align_tool, &target.doubled().to_vec(), databases, cfg)?;

    let mut frags: Vec<Frag> = matches
        .into_iter()
        .map(|m| frag_from_match(m, target, databases, cfg))
        .collect();

    debug!("{} candidate fragment(s) before enumeration", frags.len());

    let mut all_assemblies = enumerate(&frags, target.len(), cfg, false);

    if all_assemblies.is_empty() {
        warn!(
            "no assembly circularizes target '{}' from {} candidate(s); falling back to pure synthesis",
            target.id,
            frags.len()
        );
        all_assemblies.push(synthesis_fallback(&mut frags, target, cfg)?);
    }

    let frontier = pareto_frontier(all_assemblies);
    let groups = group_by_count(frontier);

    let mut cache = PrimerCache::new();
    let mut filled: Vec<FilledAssembly> = Vec::new();
    let mut min_cost_so_far = f64::INFINITY;

    for (count, candidates) in groups {
        for assembly in &candidates {
            // Once a cheaper-or-equal assembly at some fragment count has
            // already been realized, a pricier candidate at a higher count
            // can't improve on it: skip the fill (primer design/validation
            // is the expensive step).
            if assembly.adjusted_cost >= min_cost_so_far {
                continue;
            }
            match fill_assembly(assembly, &frags, target, align_tool, primer_tool, databases, &mut cache, cfg) {
                Ok(f) => {
                    min_cost_so_far = min_cost_so_far.min(f.adjusted_cost);
                    filled.push(f);
                }
                Err(e) if e.is_design() => {
                    info!("discarding {count}-fragment assembly candidate: {e}");
                }
                Err(e) => return Err(e),
            }
        }
    }

    if filled.is_empty() {
        return Err(EngineError::Design(format!(
            "every Pareto-optimal assembly for target '{}' failed primer/junction validation",
            target.id
        )));
    }

    // Post-fill re-prune: a candidate whose pre-fill adjusted cost looked
    // competitive may have grown (shrink/embed adjustments, spliced
    // synthesis pieces) once actually filled, so the frontier is
    // re-evaluated against the realized fragment counts and costs.
    filled.sort_by(|a, b| a.frags.len().cmp(&b.frags.len()).then_with(|| a.adjusted_cost.partial_cmp(&b.adjusted_cost).unwrap()));
    let mut best_cost = f64::INFINITY;
    filled.retain(|f| {
        let keep = f.adjusted_cost < best_cost;
        if keep {
            best_cost = f.adjusted_cost;
        }
        keep
    });

    Ok(filled)
}
