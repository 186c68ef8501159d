//! Cost accounting and Pareto-frontier selection across candidate
//! assemblies: groups by fragment count, then keeps only assemblies not
//! dominated by a cheaper-or-equal candidate with fewer-or-equal fragments.

use crate::assembly::Assembly;

/// Group assemblies by fragment count, sort each group by adjusted cost
/// ascending.
pub fn group_by_count(assemblies: Vec<Assembly>) -> Vec<(usize, Vec<Assembly>)> {
    use std::collections::BTreeMap;

    let mut groups: BTreeMap<usize, Vec<Assembly>> = BTreeMap::new();
    for a in assemblies {
        groups.entry(a.frag_indices.len()).or_default().push(a);
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| a.adjusted_cost.partial_cmp(&b.adjusted_cost).unwrap());
    }
    groups.into_iter().collect()
}

/// Keep only the assemblies on the Pareto frontier of (fragment count,
/// adjusted cost): an assembly is dominated if some other assembly has both
/// fewer-or-equal fragments and lower-or-equal adjusted cost, with at least
/// one strictly better.
pub fn pareto_frontier(assemblies: Vec<Assembly>) -> Vec<Assembly> {
    let mut candidates = assemblies;
    candidates.sort_by(|a, b| {
        a.frag_indices
            .len()
            .cmp(&b.frag_indices.len())
            .then_with(|| a.adjusted_cost.partial_cmp(&b.adjusted_cost).unwrap())
    });

    let mut frontier = Vec::new();
    let mut best_cost_so_far = f64::INFINITY;

    for assembly in candidates {
        if assembly.adjusted_cost < best_cost_so_far {
            best_cost_so_far = assembly.adjusted_cost;
            frontier.push(assembly);
        }
    }

    frontier
}
