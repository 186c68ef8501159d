//! Per-assembly fill: turns an ordered list of fragments into primer pairs
//! and synthesis orders, resolving every junction (including the wrap-around
//! one that closes the circle) and rejecting candidates with duplicate
//! junctions, off-target primers, or primer pairs that fail the configured
//! quality gates.

use crate::assembly::{self, Assembly};
use crate::cache::{PrimerCache, PrimerCacheKey};
use crate::config::Config;
use crate::error::EngineError;
use crate::external::{AlignmentTool, PrimerTool};
use crate::fragment::Frag;
use crate::homology::{off_target_hits, Database};
use crate::primer::{validate_pair, Primer};
use crate::sequence::{self, Seq};
use crate::synthesis::bridge_synthesis;
use crate::target::Target;

/// One resolved junction between consecutive fragments in the final, filled
/// path.
#[derive(Debug)]
pub enum Junction {
    /// Natural sequence overlap, no primers needed.
    Homology { overlap_len: usize },
    /// A designed primer pair closes the junction, embedding non-template
    /// bases where the two fragments don't naturally overlap.
    Primers {
        forward: Seq,
        reverse: Seq,
        /// The full amplified product, including any embedded overhang.
        product: Seq,
    },
}

/// A completed plan: the final fragment list (shrunk, primer-extended, and
/// with any synthesis bridge pieces spliced in), its junctions in order, and
/// both cost figures.
#[derive(Debug)]
pub struct FilledAssembly {
    pub frags: Vec<Frag>,
    pub junctions: Vec<Junction>,
    pub cost: f64,
    pub adjusted_cost: f64,
}

fn shifted(f: &Frag, by: usize) -> Frag {
    let mut g = f.clone();
    g.qs += by;
    g.qe += by;
    g
}

/// Fill every junction in `assembly`, including the wrap-around junction
/// between the last and first fragment, validating primer pairs and
/// screening them for off-target binding, and rejecting the assembly
/// outright if any two fragments would anneal at a duplicate junction
/// sequence (ambiguous assembly order).
pub fn fill_assembly(
    assembly: &Assembly,
    frags: &[Frag],
    target: &Target,
    align_tool: &(impl AlignmentTool + Sync),
    primer_tool: &impl PrimerTool,
    databases: &[Database],
    cache: &mut PrimerCache,
    cfg: &Config,
) -> Result<FilledAssembly, EngineError> {
    let mut path: Vec<Frag> = assembly.frag_indices.iter().map(|&i| frags[i].clone()).collect();
    let mut junctions = Vec::new();
    let mut seen_junction_seqs: Vec<Seq> = Vec::new();

    for f in &path {
        let repeat = sequence::self_junction(&f.seq, cfg.min_homology, cfg.max_homology);
        if !repeat.is_empty() {
            check_duplicate(&repeat, &mut seen_junction_seqs)?;
        }
    }

    if path.len() == 1 {
        let (cost, adjusted_cost) = assembly::total_cost_of_path(&path, cfg);
        return Ok(FilledAssembly {
            frags: path,
            junctions,
            cost,
            adjusted_cost,
        });
    }

    let n = path.len();
    let mut bridges: Vec<(usize, Vec<Frag>)> = Vec::new();

    for i in 0..n {
        let is_closing = i + 1 == n;
        let a = path[i].clone();
        let b_orig = if is_closing {
            shifted(&path[0], target.len())
        } else {
            path[i + 1].clone()
        };

        if a.overlaps_via_homology(&b_orig, cfg) {
            // Shrink: cap an excess overlap by pulling back `a`'s end,
            // unless that would leave `a` shorter than a viable PCR product.
            let overlap_len = (a.qe as i64 - b_orig.qs as i64 + 1).max(0) as usize;
            let shrink_by = overlap_len.saturating_sub(cfg.max_homology);
            if shrink_by > 0 && path[i].query_len() > cfg.min_pcr_len + shrink_by {
                path[i].qe -= shrink_by;
                path[i].seq = target.slice_doubled(path[i].qs, path[i].qe);
            }
            let a_qe = path[i].qe;
            let overlap_len = (a_qe as i64 - b_orig.qs as i64 + 1).max(0) as usize;

            let junction_seq = target.slice_doubled(b_orig.qs, a_qe.max(b_orig.qs));
            check_duplicate(&junction_seq, &mut seen_junction_seqs)?;

            junctions.push(Junction::Homology { overlap_len });
        } else if a.could_overlap_via_pcr(&b_orig, cfg) {
            let mut b_mut = b_orig.clone();
            let orig_b_qs = b_mut.qs;

            let (fwd, rev) = design_junction_primers(&a, &mut b_mut, target, primer_tool, cache, cfg)?;

            off_target_guard(&fwd, &a, align_tool, databases, cfg)?;
            off_target_guard(&rev, &b_orig, align_tool, databases, cfg)?;

            let junction_seq = target.slice_doubled(a.qe.saturating_sub(cfg.pcr_buffer_len), orig_b_qs);
            check_duplicate(&junction_seq, &mut seen_junction_seqs)?;

            let product = target.slice_doubled(b_mut.qs, b_mut.qe.max(b_mut.qs));
            junctions.push(Junction::Primers {
                forward: fwd.sequence,
                reverse: rev.sequence,
                product,
            });

            if !is_closing {
                path[i + 1] = b_mut;
            }
        } else {
            let pieces = bridge_synthesis(&a, &b_orig, target, cfg)?;
            if pieces.is_empty() {
                return Err(EngineError::Design(format!(
                    "fragments '{}' and '{}' cannot be joined",
                    a.id, b_orig.id
                )));
            }

            let mut chain = Vec::with_capacity(pieces.len() + 2);
            chain.push(a.clone());
            chain.extend(pieces.iter().cloned());
            chain.push(b_orig.clone());
            for w in chain.windows(2) {
                let overlap_len = (w[0].qe as i64 - w[1].qs as i64 + 1).max(0) as usize;
                let junction_seq = target.slice_doubled(w[1].qs, w[0].qe.max(w[1].qs));
                check_duplicate(&junction_seq, &mut seen_junction_seqs)?;
                junctions.push(Junction::Homology { overlap_len });
            }

            bridges.push((i + 1, pieces));
        }
    }

    for (at, pieces) in bridges.into_iter().rev() {
        let insert_at = at.min(path.len());
        for piece in pieces.into_iter().rev() {
            path.insert(insert_at, piece);
        }
    }

    let (cost, adjusted_cost) = assembly::total_cost_of_path(&path, cfg);
    Ok(FilledAssembly {
        frags: path,
        junctions,
        cost,
        adjusted_cost,
    })
}

/// Design the primer pair that closes a PCR-embeddable gap between `a` and
/// `b`: embed enough non-template sequence on each primer to cover half the
/// required homology plus any outright gap (capped by `max_embed_len`),
/// include a buffer of native sequence around the design region, invoke the
/// primer tool (memoized by template/region), validate the pair, then
/// extend `b`'s stored bounds and sequence to the amplified product.
fn design_junction_primers(
    a: &Frag,
    b: &mut Frag,
    target: &Target,
    primer_tool: &impl PrimerTool,
    cache: &mut PrimerCache,
    cfg: &Config,
) -> Result<(Primer, Primer), EngineError> {
    let half_homology = cfg.min_homology / 2;
    let gap = (b.qs as i64 - a.qe as i64 - 1).max(0) as usize;
    let excess_overlap = a.qe.saturating_sub(b.qs);

    let add_left = (half_homology + gap).min(cfg.max_embed_len);
    let buffer = if gap > 0 { cfg.pcr_buffer_len } else { excess_overlap / 2 };

    let product_start = b.qs.saturating_sub(add_left + buffer);
    let product_end = (b.qe + buffer).min(target.doubled().len().saturating_sub(1));

    let key = PrimerCacheKey {
        template_id: format!("{}:{}", a.id, b.id),
        region: (product_start, product_end),
    };

    let (fwd, rev) = match cache.get(&key) {
        Some(cached) => cached.clone(),
        None => {
            let template = target.slice_doubled(product_start, product_end);
            let pair = primer_tool.design_pair(&template, (0, template.len().saturating_sub(1)))?;
            cache.insert(key, pair.clone());
            pair
        }
    };

    validate_pair(&fwd, &rev, cfg).map_err(EngineError::Design)?;

    b.qs = product_start;
    b.qe = product_end.max(product_start);
    b.seq = target.slice_doubled(b.qs, b.qe);

    Ok((fwd, rev))
}

/// Screen a designed primer for off-target binding elsewhere in its source
/// template's database; a skip (`Ok(())`) for primers designed against a
/// fragment with no tracked source (pure synthesis has nothing to screen).
fn off_target_guard(
    primer: &Primer,
    frag: &Frag,
    align_tool: &(impl AlignmentTool + Sync),
    databases: &[Database],
    cfg: &Config,
) -> Result<(), EngineError> {
    let Some(m) = frag.source.as_ref() else {
        return Ok(());
    };
    let hits = off_target_hits(primer, &m.entry_id, m.subject_is_circular, align_tool, databases, cfg)?;
    if !hits.is_empty() {
        return Err(EngineError::Design(format!(
            "primer for '{}' binds {} off-target site(s)",
            frag.id,
            hits.len()
        )));
    }
    Ok(())
}

fn check_duplicate(junction_seq: &Seq, seen: &mut Vec<Seq>) -> Result<(), EngineError> {
    if seen.iter().any(|s| s == junction_seq) {
        return Err(EngineError::Design(format!(
            "duplicate junction sequence '{}' makes assembly order ambiguous",
            sequence::seq_to_string(junction_seq)
        )));
    }
    seen.push(junction_seq.clone());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::FragKind;
    use crate::matching::Match;
    use crate::primer::PrimerDirection;
    use crate::sequence::seq_from_str;

    struct FakePrimerTool;
    impl PrimerTool for FakePrimerTool {
        fn design_pair(&self, template: &Seq, _region: (usize, usize)) -> Result<(Primer, Primer), EngineError> {
            let len = 20.min(template.len());
            let fwd = Primer {
                sequence: template[..len].to_vec(),
                direction: PrimerDirection::Forward,
                range: (0, len.saturating_sub(1)),
                tm: 60.0,
                gc_fraction: 0.5,
                penalty: 1.0,
                notes: String::new(),
            };
            let rev = fwd.clone();
            Ok((fwd, rev))
        }
    }

    struct FakeAligner;
    impl AlignmentTool for FakeAligner {
        fn search(&self, _db_id: &str, _query: &Seq, _entries: &[(String, Seq)]) -> Result<Vec<Match>, EngineError> {
            Ok(Vec::new())
        }
    }

    fn frag(id: &str, qs: usize, qe: usize, seq: Seq) -> Frag {
        Frag {
            kind: FragKind::Pcr,
            id: id.into(),
            qs,
            qe,
            seq,
            source: None,
            procure_cost: 0.0,
            amplify_cost: 5.0,
            feature_range: None,
        }
    }

    #[test]
    fn duplicate_junction_is_rejected() {
        let cfg = Config::default();
        let seq = seq_from_str(&"CAGATGACGATG".repeat(20));
        let target = Target::new("t", seq);

        // b and c overlap the target at the same phase (mod the 12 bp
        // repeating period) and length as a and b, so the homology junction
        // sequence repeats even though a and c never touch.
        let a = frag("a", 0, 50, target.slice_doubled(0, 50));
        let b = frag("b", 30, 62, target.slice_doubled(30, 62));
        let c = frag("c", 42, 92, target.slice_doubled(42, 92));

        let frags = vec![a, b, c];
        let assembly = Assembly {
            frag_indices: vec![0, 1, 2],
            cost: 15.0,
            adjusted_cost: 15.0,
        };
        let mut cache = PrimerCache::new();
        let databases: Vec<Database> = Vec::new();
        let result = fill_assembly(
            &assembly,
            &frags,
            &target,
            &FakeAligner,
            &FakePrimerTool,
            &databases,
            &mut cache,
            &cfg,
        );
        assert!(result.is_err());
    }

    #[test]
    fn single_fragment_assembly_needs_no_junctions() {
        let cfg = Config::default();
        let target = Target::new("t", seq_from_str(&"ACGTACGTCA".repeat(10)));
        let whole = frag("whole", 0, target.len() - 1, target.seq().to_vec());
        let frags = vec![whole];
        let assembly = Assembly {
            frag_indices: vec![0],
            cost: 20.0,
            adjusted_cost: 20.0,
        };
        let mut cache = PrimerCache::new();
        let databases: Vec<Database> = Vec::new();
        let filled = fill_assembly(
            &assembly,
            &frags,
            &target,
            &FakeAligner,
            &FakePrimerTool,
            &databases,
            &mut cache,
            &cfg,
        )
        .unwrap();
        assert!(filled.junctions.is_empty());
        assert_eq!(filled.frags.len(), 1);
    }

    #[test]
    fn wraps_around_to_close_the_final_junction() {
        let mut cfg = Config::default();
        cfg.min_homology = 12;
        let target = Target::new("t", seq_from_str(&"ACGTACGTCA".repeat(5)));

        // Forward junction a->b and the wrap-around junction b->shifted(a)
        // are both within homology range: dist_to(a,b) = 17-29 = -12, and
        // dist_to(b, shifted(a)) = 50-70 = -20.
        let a = frag("a", 0, 29, target.slice_doubled(0, 29));
        let b = frag("b", 17, 70, target.slice_doubled(17, 70));

        let frags = vec![a, b];
        let assembly = Assembly {
            frag_indices: vec![0, 1],
            cost: 10.0,
            adjusted_cost: 10.0,
        };
        let mut cache = PrimerCache::new();
        let databases: Vec<Database> = Vec::new();
        let filled = fill_assembly(
            &assembly,
            &frags,
            &target,
            &FakeAligner,
            &FakePrimerTool,
            &databases,
            &mut cache,
            &cfg,
        )
        .unwrap();
        // One junction between a and b, plus the wrap-around junction
        // between b and a-shifted.
        assert_eq!(filled.junctions.len(), 2);
    }
}
