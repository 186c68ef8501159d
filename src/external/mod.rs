//! Subprocess drivers for the three external tools the engine leans on: a
//! local-alignment searcher, a primer-design tool, and a melting-temperature
//! calculator. Each call gets its own scoped temp directory, removed on
//! every exit path, and is run with no timeout; stderr is captured and
//! folded into the error on a non-zero exit.

mod blast;
mod melt;
mod primer3;

pub use blast::BlastDriver;
pub use melt::MeltDriver;
pub use primer3::Primer3Driver;

use crate::error::EngineError;
use crate::matching::Match;
use crate::melting_temp::IonConcentrations;
use crate::primer::Primer;
use crate::sequence::Seq;

/// A local-alignment tool: given a query sequence and a set of named
/// database entries, return every hit above the tool's own internal
/// thresholds (filtering by percent identity/length happens downstream).
pub trait AlignmentTool {
    fn search(&self, db_id: &str, query: &Seq, entries: &[(String, Seq)]) -> Result<Vec<Match>, EngineError>;
}

/// A primer-design tool: given a template and a target priming region,
/// return a forward/reverse pair.
pub trait PrimerTool {
    fn design_pair(
        &self,
        template: &Seq,
        region: (usize, usize),
    ) -> Result<(Primer, Primer), EngineError>;
}

/// A melting-temperature calculator, used as a fallback/cross-check against
/// the in-process nearest-neighbor implementation.
pub trait MeltingTempTool {
    fn melt(&self, seq: &Seq, ion: &IonConcentrations) -> Result<f32, EngineError>;
}

/// Locate an external tool binary: an explicit environment-variable override
/// takes precedence, falling back to a PATH lookup by name.
pub fn locate_binary(env_var: &str, exe_name: &str) -> Result<std::path::PathBuf, EngineError> {
    if let Ok(path) = std::env::var(env_var) {
        return Ok(std::path::PathBuf::from(path));
    }
    which::which(exe_name)
        .map_err(|e| EngineError::Resource(std::io::Error::new(std::io::ErrorKind::NotFound, e)))
}
