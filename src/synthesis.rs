//! De-novo gene synthesis for gaps the fragment search couldn't close:
//! tiles a synthetic piece (or a run of them) across a span, re-checking
//! hairpin stability and pricing it through the configured cost function.

use crate::config::Config;
use crate::error::EngineError;
use crate::fragment::{Frag, FragKind};
use crate::melting_temp::hairpin_tm;
use crate::target::Target;

/// Synthesize the span `[start, end]` (inclusive, on the doubled target) as
/// a standalone fragment, rejecting it if it falls outside the vendor's
/// orderable length range or folds into a stable hairpin. `amplify_cost` is
/// left unpenalized; `Config::synthetic_penalty` applies only when the
/// assembly's adjusted cost is computed.
pub fn synth_to(target: &Target, start: usize, end: usize, cfg: &Config) -> Result<Frag, EngineError> {
    if end < start {
        return Err(EngineError::Design(format!(
            "synthesis span end {end} precedes start {start}"
        )));
    }
    let len = end - start + 1;
    if len < cfg.min_synthetic_len || len > cfg.max_synthetic_len {
        return Err(EngineError::Design(format!(
            "synthetic span of {len} bp outside [{}, {}]",
            cfg.min_synthetic_len, cfg.max_synthetic_len
        )));
    }

    let seq = target.slice_doubled(start, end);

    if let Some(tm) = hairpin_tm(&seq, 6, 3) {
        if tm > cfg.max_hairpin_tm {
            return Err(EngineError::Design(format!(
                "synthetic piece folds into a hairpin with Tm {tm}"
            )));
        }
    }

    Ok(Frag {
        kind: FragKind::Synthetic,
        id: format!("synth:{start}-{end}"),
        qs: start,
        qe: end,
        seq,
        source: None,
        procure_cost: 0.0,
        amplify_cost: (cfg.synth_cost_fn)(len),
        feature_range: None,
    })
}

/// Tile a run of synthetic pieces across `[start, end]`, each no longer than
/// `cfg.max_synthetic_len`, overlapping consecutive pieces by
/// `cfg.min_homology` so they can be Gibson-joined to each other. Used for
/// the whole-target pure-synthesis fallback, where there's no neighboring
/// real fragment to anchor against.
pub fn tile_synthesis(target: &Target, start: usize, end: usize, cfg: &Config) -> Result<Vec<Frag>, EngineError> {
    let total_len = end - start + 1;
    if total_len <= cfg.max_synthetic_len {
        return Ok(vec![synth_to(target, start, end, cfg)?]);
    }

    let step = cfg.max_synthetic_len - cfg.min_homology;
    if step == 0 {
        return Err(EngineError::Design(
            "synthetic tile step is zero; max_synthetic_len too close to min_homology".into(),
        ));
    }

    let mut pieces = Vec::new();
    let mut cursor = start;
    while cursor <= end {
        let piece_end = (cursor + cfg.max_synthetic_len - 1).min(end);
        pieces.push(synth_to(target, cursor, piece_end, cfg)?);
        if piece_end == end {
            break;
        }
        cursor += step;
    }
    Ok(pieces)
}

/// Bridge the gap between two already-placed fragments with a run of
/// synthetic pieces: `N = prev.synth_dist(next, cfg)` pieces, each close to
/// `distTo/N + 2*minHomology` bp (never shorter than `min_synthetic_len`),
/// starting `minHomology` bp before `prev`'s end and tiling rightward with a
/// `2*minHomology` overlap on each flank. Returns an empty run if the two
/// fragments are already PCR- or homology-reachable. Sliced from the
/// quadrupled target so a bridge spanning the origin still slices cleanly.
pub fn bridge_synthesis(prev: &Frag, next: &Frag, target: &Target, cfg: &Config) -> Result<Vec<Frag>, EngineError> {
    let n = prev.synth_dist(next, cfg);
    if n == 0 {
        return Ok(Vec::new());
    }

    let dist_to = (next.qs as i64 - prev.qe as i64).max(1) as f64;
    let ideal_len = (dist_to / n as f64 + 2.0 * cfg.min_homology as f64).round() as usize;
    let piece_len = ideal_len.max(cfg.min_synthetic_len);

    let quad = target.quadrupled();
    let mut pieces = Vec::new();
    let mut cursor = prev.qe.saturating_sub(cfg.min_homology);

    for k in 0..n {
        let mut piece_end = (cursor + piece_len - 1).min(quad.len() - 1);
        let mut seq = quad[cursor..=piece_end].to_vec();

        if hairpin_tm(&seq, 6, 3).map(|tm| tm > cfg.max_hairpin_tm).unwrap_or(false) {
            piece_end = (piece_end + cfg.min_homology / 2).min(quad.len() - 1);
            seq = quad[cursor..=piece_end].to_vec();
            if hairpin_tm(&seq, 6, 3).map(|tm| tm > cfg.max_hairpin_tm).unwrap_or(false) {
                return Err(EngineError::Design(format!(
                    "synthetic bridge piece {k} between '{}' and '{}' folds into a stable hairpin",
                    prev.id, next.id
                )));
            }
        }

        let len = seq.len();
        pieces.push(Frag {
            kind: FragKind::Synthetic,
            id: format!("{}-{}-synthesis-{k}", prev.id, next.id),
            qs: cursor,
            qe: piece_end,
            seq,
            source: None,
            procure_cost: 0.0,
            amplify_cost: (cfg.synth_cost_fn)(len),
            feature_range: None,
        });

        if piece_end >= next.qs + cfg.min_homology || piece_end == quad.len() - 1 {
            break;
        }
        cursor = piece_end.saturating_sub(2 * cfg.min_homology) + 1;
    }

    Ok(pieces)
}
