//! Global, per-run engine configuration. A plain struct constructed by the
//! caller (parsed from CLI flags or a config file elsewhere) and threaded
//! through the engine by reference.

/// Dollar cost of a synthesized fragment as a function of its length in bp.
pub type SynthCostFn = fn(usize) -> f64;

fn default_synth_cost(len: usize) -> f64 {
    // A flat per-bp rate with a fixed per-order surcharge is a reasonable
    // stand-in for a vendor's pricing tier table; callers with real vendor
    // pricing can substitute their own function.
    0.60 * len as f64 + 15.0
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Minimum exact homology required between adjacent fragments.
    pub min_homology: usize,
    /// Maximum homology tolerated between adjacent fragments before the
    /// right side is shrunk.
    pub max_homology: usize,

    /// Minimum length of a PCR-amplified fragment.
    pub min_pcr_len: usize,
    /// Maximum length a primer may embed (added, non-template bases) at
    /// either end.
    pub max_embed_len: usize,
    pub primer_len_min: usize,
    pub primer_len_opt: usize,
    pub primer_len_max: usize,
    pub primer_tm_min: f32,
    pub primer_tm_max: f32,
    pub max_pair_penalty: f32,

    pub max_homopolymer_len: u8,
    pub max_off_target_tm: f32,
    /// `None` disables the forward/reverse Tm-difference check.
    pub max_primer_tm_diff: Option<f32>,
    pub max_hairpin_tm: f32,
    /// Minimum fraction identity (0.0-1.0) a homology-search hit must clear
    /// to be kept as a fragment boundary; also the band selector for the
    /// alignment tool's own reward/penalty/gap parameters.
    pub min_identity: f64,

    pub min_synthetic_len: usize,
    pub max_synthetic_len: usize,
    pub synth_cost_fn: SynthCostFn,
    /// Multiplies synthesis cost when computing *adjusted* cost, to bias the
    /// Pareto search away from expensive de-novo synthesis.
    pub synthetic_penalty: f64,

    pub pcr_cost_per_bp: f64,
    pub pcr_cost_per_reaction: f64,
    pub gibson_fixed_cost: f64,

    pub max_fragments: usize,
    pub pcr_buffer_len: usize,

    /// Require both primer ends to be tool-determined ("cloning-primers"
    /// task) rather than allowing a generic search region.
    pub strict_primer: bool,
    pub use_ungapped_alignment: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_homology: 15,
            max_homology: 120,

            min_pcr_len: 60,
            max_embed_len: 20,
            primer_len_min: 18,
            primer_len_opt: 22,
            primer_len_max: 30,
            primer_tm_min: 55.0,
            primer_tm_max: 68.0,
            max_pair_penalty: 50.0,

            max_homopolymer_len: 4,
            max_off_target_tm: 40.0,
            max_primer_tm_diff: Some(5.0),
            max_hairpin_tm: 47.0,
            min_identity: 0.90,

            min_synthetic_len: 125,
            max_synthetic_len: 3000,
            synth_cost_fn: default_synth_cost,
            synthetic_penalty: 1.5,

            pcr_cost_per_bp: 0.35,
            pcr_cost_per_reaction: 4.50,
            gibson_fixed_cost: 15.0,

            max_fragments: 6,
            pcr_buffer_len: 15,

            strict_primer: false,
            use_ungapped_alignment: false,
        }
    }
}
