//! Combinatorial enumeration of fragment assemblies: an indexed dynamic
//! program over fragments sorted by doubled-target position, extending a
//! partial assembly ending at fragment `i` through every fragment `i` can
//! reach, and emitting every assembly that circularizes back to its start.

use std::collections::HashSet;

use crate::config::Config;
use crate::fragment::Frag;

/// One fully enumerated candidate: the fragments in assembly order (indices
/// into the input slice), its raw dollar cost, and its adjusted cost
/// (synthesis-penalized, used for Pareto ranking).
#[derive(Clone, Debug)]
pub struct Assembly {
    pub frag_indices: Vec<usize>,
    pub cost: f64,
    pub adjusted_cost: f64,
}

/// Candidate successors of fragment `i`: fragments that extend strictly past
/// `i`'s reach, in index order, up to and including the first one whose id
/// equals `i`'s own (the wrap-around copy of `i` itself that closes the
/// cycle). `features` selects feature-span reach over doubled-target reach.
fn reach(frags: &[Frag], i: usize, features: bool) -> Vec<usize> {
    let f = &frags[i];
    let f_end = effective_end(f, features);
    let mut out = Vec::new();
    for (j, cand) in frags.iter().enumerate().skip(i + 1) {
        if effective_end(cand, features) <= f_end {
            continue;
        }
        out.push(j);
        if cand.id == f.id {
            break;
        }
    }
    out
}

fn effective_end(f: &Frag, features: bool) -> usize {
    if features {
        f.feature_range.map(|(_, e)| e).unwrap_or(f.qe)
    } else {
        f.qe
    }
}

/// An assembly circularizes once its last fragment reaches back across the
/// origin far enough to anneal with the first: `last.end >= first.start + L
/// - 1`. No additional bound is imposed here; an excess overlap is trimmed
/// later during fill's shrink step, not rejected at enumeration time.
fn circularizes(last: &Frag, start: &Frag, target_len: usize) -> bool {
    last.reach() >= start.qs + target_len - 1
}

/// Per-assembly (raw cost, adjusted cost), charging each distinct source id
/// exactly once regardless of how many times it recurs along the path.
fn accumulate_cost<'a>(mut path: impl Iterator<Item = &'a Frag>, cfg: &Config) -> (f64, f64) {
    let mut seen: HashSet<String> = HashSet::new();

    let first = path.next().expect("path is non-empty");
    let procure_first = match first.source_key() {
        Some(k) => seen.insert(k),
        None => true,
    };
    let mut cost = first.cost(procure_first);
    let mut adjusted = first.adjusted_cost(procure_first, cfg);
    let mut prev = first;

    for next in path {
        let procure_next = match next.source_key() {
            Some(k) => seen.insert(k),
            None => true,
        };
        cost += prev.cost_to(next, cfg, procure_next);
        adjusted += prev.adjusted_cost_to(next, cfg, procure_next);
        prev = next;
    }

    (cost, adjusted)
}

/// `total_cost` over a path of indices into a shared fragment slice, used by
/// the enumerator.
pub fn total_cost(frags: &[Frag], path: &[usize], cfg: &Config) -> (f64, f64) {
    accumulate_cost(path.iter().map(|&i| &frags[i]), cfg)
}

/// `total_cost` over an already-materialized fragment path, used by fill
/// once synthesis pieces have been spliced in and the path no longer
/// corresponds to indices into the original candidate slice.
pub fn total_cost_of_path(path: &[Frag], cfg: &Config) -> (f64, f64) {
    accumulate_cost(path.iter(), cfg)
}

/// Enumerate every circularizing assembly over `frags`, sorted by doubled-
/// target position, within `cfg.max_fragments` pieces. `features` switches
/// reach to feature-span coordinates for feature-mode planning.
pub fn enumerate(frags: &[Frag], target_len: usize, cfg: &Config, features: bool) -> Vec<Assembly> {
    // Single-fragment short circuit: a source spanning the whole target
    // circularizes on its own without walking the DP at all.
    if let Some(idx) = frags
        .iter()
        .position(|f| effective_end(f, features) >= f.qs + target_len - 1)
    {
        let (cost, adjusted_cost) = total_cost(frags, &[idx], cfg);
        return vec![Assembly {
            frag_indices: vec![idx],
            cost,
            adjusted_cost,
        }];
    }

    let mut indexed: Vec<Vec<Assembly>> = (0..frags.len())
        .map(|i| {
            let (cost, adjusted_cost) = total_cost(frags, &[i], cfg);
            vec![Assembly {
                frag_indices: vec![i],
                cost,
                adjusted_cost,
            }]
        })
        .collect();

    let mut out = Vec::new();

    for i in 0..frags.len() {
        let successors = reach(frags, i, features);
        let assemblies_at_i = std::mem::take(&mut indexed[i]);

        for a in &assemblies_at_i {
            if a.frag_indices.len() >= cfg.max_fragments {
                continue;
            }
            let last = &frags[*a.frag_indices.last().unwrap()];

            for &j in &successors {
                let candidate = &frags[j];
                let synths = last.synth_dist(candidate, cfg);
                let reachable = last.overlaps_via_homology(candidate, cfg)
                    || last.could_overlap_via_pcr(candidate, cfg)
                    || synths > 0;
                if !reachable {
                    continue;
                }
                // Synthetic pieces needed to bridge the gap aren't in `frags`
                // yet (fill splices them in later), but they still count
                // against the budget here, per the gap's piece count.
                if a.frag_indices.len() + synths + 1 > cfg.max_fragments {
                    continue;
                }

                let mut path = a.frag_indices.clone();
                path.push(j);

                let (cost, adjusted_cost) = total_cost(frags, &path, cfg);
                let new_assembly = Assembly {
                    frag_indices: path.clone(),
                    cost,
                    adjusted_cost,
                };

                if circularizes(candidate, &frags[path[0]], target_len) {
                    out.push(new_assembly);
                } else {
                    indexed[j].push(new_assembly);
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::FragKind;
    use crate::sequence::seq_from_str;

    fn frag(id: &str, qs: usize, qe: usize, cost: f64) -> Frag {
        Frag {
            kind: FragKind::Pcr,
            id: id.into(),
            qs,
            qe,
            seq: seq_from_str(&"A".repeat(qe - qs + 1)),
            source: None,
            procure_cost: 0.0,
            amplify_cost: cost,
            feature_range: None,
        }
    }

    #[test]
    fn single_fragment_circularizes_when_it_spans_the_target() {
        let cfg = Config::default();
        let target_len = 100;
        let frags = vec![frag("a", 0, 99, 10.0)];
        let assemblies = enumerate(&frags, target_len, &cfg, false);
        assert_eq!(assemblies.len(), 1);
        assert_eq!(assemblies[0].frag_indices, vec![0]);
    }

    #[test]
    fn two_fragments_circularize_via_homology() {
        let cfg = Config::default();
        let target_len = 100;
        let frags = vec![frag("a", 0, 69, 10.0), frag("b", 50, 99, 8.0)];
        let assemblies = enumerate(&frags, target_len, &cfg, false);
        assert!(assemblies.iter().any(|a| a.frag_indices == vec![0, 1]));
    }

    #[test]
    fn respects_max_fragments_budget() {
        let mut cfg = Config::default();
        cfg.max_fragments = 1;
        let target_len = 100;
        let frags = vec![frag("a", 0, 49, 10.0), frag("b", 40, 99, 8.0)];
        let assemblies = enumerate(&frags, target_len, &cfg, false);
        assert!(assemblies.is_empty());
    }

    #[test]
    fn circularizes_without_an_overhang_cap() {
        // Overlap between last and first is far beyond max_homology, which
        // used to be (wrongly) rejected at enumeration time; it's still a
        // valid candidate here since trimming is fill's job.
        let mut cfg = Config::default();
        cfg.max_homology = 5;
        let target_len = 100;
        let frags = vec![frag("a", 0, 79, 10.0), frag("b", 60, 120, 8.0)];
        let assemblies = enumerate(&frags, target_len, &cfg, false);
        assert!(assemblies.iter().any(|a| a.frag_indices == vec![0, 1]));
    }
}
