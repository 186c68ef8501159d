//! Error taxonomy for the engine.
//!
//! `Design` errors are recoverable at the engine level: the assembly that
//! triggered one is discarded by the cost/Pareto selector and the next
//! candidate is tried. Every other variant propagates to the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Unreadable/unparseable input, no features chosen, unknown enzyme or
    /// database, duplicate conflicting sequences.
    #[error("input error: {0}")]
    Input(String),

    /// The external alignment tool returned non-zero, produced no hits above
    /// threshold, or a named fragment could not be found in any database.
    #[error("search error: {0}")]
    Search(String),

    /// Primer-tool failure, no primer pair, constraint violation (pair
    /// penalty / Tm difference / off-target), PCR product below minimum
    /// length, or a duplicate junction in an assembly. Non-fatal: caught by
    /// the cost/Pareto selector.
    #[error("design error: {0}")]
    Design(String),

    /// Temp-file or other I/O failure.
    #[error("resource error: {0}")]
    Resource(#[from] std::io::Error),
}

impl EngineError {
    pub fn is_design(&self) -> bool {
        matches!(self, Self::Design(_))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
