//! End-to-end scenarios exercised through the public API, using in-process
//! fakes for the external alignment and primer-design tools so no real
//! `blastn`/`primer3_core` binary is needed.

use vectorforge::assembly::{enumerate, Assembly};
use vectorforge::cache::PrimerCache;
use vectorforge::config::Config;
use vectorforge::error::EngineError;
use vectorforge::external::{AlignmentTool, PrimerTool};
use vectorforge::fill::fill_assembly;
use vectorforge::fragment::{Frag, FragKind};
use vectorforge::matching::Match;
use vectorforge::primer::{Primer, PrimerDirection};
use vectorforge::sequence::seq_from_str;
use vectorforge::target::Target;
use vectorforge::Result;

struct FakeAligner {
    matches: Vec<Match>,
}

impl AlignmentTool for FakeAligner {
    fn search(
        &self,
        db_id: &str,
        _query: &vectorforge::sequence::Seq,
        _entries: &[(String, vectorforge::sequence::Seq)],
    ) -> Result<Vec<Match>> {
        Ok(self
            .matches
            .iter()
            .filter(|m| m.db_id == db_id)
            .cloned()
            .collect())
    }
}

struct FakePrimerTool;

impl PrimerTool for FakePrimerTool {
    fn design_pair(
        &self,
        template: &vectorforge::sequence::Seq,
        _region: (usize, usize),
    ) -> Result<(Primer, Primer)> {
        let len = template.len().min(20);
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

fn frag(id: &str, qs: usize, qe: usize, seq: vectorforge::sequence::Seq) -> Frag {
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

/// Scenario 4: three linear fragments sharing 12-bp junctions concatenate
/// (overlap trimmed once per junction) back into the full literal.
#[test]
fn three_fragment_assembly_reconstructs_the_target() {
    let literal = "ACGTGCTAGCTACATCGATCGTAGCTAGCTAGCATCGACTGATCACTAGCATCGACTAGCTAGAACTGATCTAG";
    assert_eq!(literal.len(), 74);
    let target = Target::new("t", seq_from_str(literal));

    let mut cfg = Config::default();
    cfg.min_homology = 12;

    let a = frag("a", 0, 30, target.slice_doubled(0, 30));
    let b = frag("b", 18, 49, target.slice_doubled(18, 49));
    let c = frag("c", 37, 73, target.slice_doubled(37, 73));

    assert!(a.overlaps_via_homology(&b, &cfg));
    assert!(b.overlaps_via_homology(&c, &cfg));

    let assembly = Assembly {
        frag_indices: vec![0, 1, 2],
        cost: 15.0,
        adjusted_cost: 15.0,
    };
    let frags = vec![a.clone(), b.clone(), c.clone()];
    let mut cache = PrimerCache::new();
    let databases = Vec::new();
    let filled = fill_assembly(
        &assembly,
        &frags,
        &target,
        &FakeAligner { matches: Vec::new() },
        &FakePrimerTool,
        &databases,
        &mut cache,
        &cfg,
    )
    .unwrap();
    // Two internal junctions (a-b, b-c) plus the wrap-around junction
    // closing c back to a.
    assert_eq!(filled.junctions.len(), 3);

    let mut reconstructed = vectorforge::sequence::seq_to_string(&a.seq);
    reconstructed.push_str(&vectorforge::sequence::seq_to_string(&b.seq[13..]));
    reconstructed.push_str(&vectorforge::sequence::seq_to_string(&c.seq[13..]));
    assert_eq!(reconstructed, literal);
}

/// Scenario 5: a single source fragment covering the entire target
/// circularizes by itself, producing exactly one one-fragment assembly of
/// kind `Circular`.
#[test]
fn single_fragment_covering_target_short_circuits() {
    let target = Target::new("t", seq_from_str(&"ACGTACGTCA".repeat(10)));
    let cfg = Config::default();

    let whole = Frag {
        kind: FragKind::Circular,
        id: "whole".into(),
        qs: 0,
        qe: target.len() - 1,
        seq: target.seq().to_vec(),
        source: None,
        procure_cost: 0.0,
        amplify_cost: 20.0,
        feature_range: None,
    };

    let frags = vec![whole];
    let assemblies = enumerate(&frags, target.len(), &cfg, false);
    assert_eq!(assemblies.len(), 1);
    assert_eq!(assemblies[0].frag_indices, vec![0]);
}

/// Same single-plasmid scenario driven through the top-level `plan()` entry
/// point, against fake alignment/primer-design tools.
#[test]
fn plan_short_circuits_through_the_public_entry_point() {
    use vectorforge::homology::Database;

    let target = Target::new("t", seq_from_str(&"ACGTACGTCA".repeat(10)));
    let cfg = Config::default();

    let whole_match = Match {
        db_id: "db1".into(),
        entry_id: "whole".into(),
        qs: 0,
        qe: target.len() - 1,
        ss: 0,
        se: target.len() - 1,
        subject_seq: target.seq().to_vec(),
        mismatches_and_gaps: 0,
        query_is_rc: false,
        subject_is_circular: false,
        tag: String::new(),
    };
    let aligner = FakeAligner {
        matches: vec![whole_match],
    };
    let databases = vec![Database {
        id: "db1".into(),
        entries: vec![("whole".into(), target.seq().to_vec())],
        cost_per_order: 8.0,
    }];

    let solutions = vectorforge::plan(&target, &databases, &aligner, &FakePrimerTool, &cfg).unwrap();
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0].frags.len(), 1);
}

/// Scenario 6: a non-adjacent pair of fragments sharing the same junction
/// sequence makes the assembly order ambiguous and fill rejects it.
#[test]
fn duplicate_non_adjacent_junction_is_rejected() {
    let repeating = "CAGATGACGATG".repeat(10);
    let target = Target::new("t", seq_from_str(&repeating));
    let mut cfg = Config::default();
    cfg.min_homology = 12;

    // The a-b and b-c junctions are offset by exactly one 12 bp repeat
    // period, so their overlap content is identical even though fragments a
    // and c never touch.
    let a = frag("a", 0, 24, target.slice_doubled(0, 24));
    let b = frag("b", 11, 36, target.slice_doubled(11, 36));
    let c = frag("c", 23, 83, target.slice_doubled(23, 83));

    let frags = vec![a, b, c];
    let assembly = Assembly {
        frag_indices: vec![0, 1, 2],
        cost: 15.0,
        adjusted_cost: 15.0,
    };
    let mut cache = PrimerCache::new();
    let databases = Vec::new();
    let result = fill_assembly(
        &assembly,
        &frags,
        &target,
        &FakeAligner { matches: Vec::new() },
        &FakePrimerTool,
        &databases,
        &mut cache,
        &cfg,
    );
    match result {
        Err(EngineError::Design(msg)) => assert!(msg.contains("duplicate junction")),
        other => panic!("expected a duplicate-junction design error, got {other:?}"),
    }
}
