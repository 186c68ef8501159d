//! Driver for a primer3-like primer-design tool.

use std::io::Write;
use std::process::Command;

use log::warn;
use tempfile::tempdir;

use super::{locate_binary, PrimerTool};
use crate::error::EngineError;
use crate::primer::{recompute_metrics, Primer, PrimerDirection};
use crate::sequence::{seq_to_string, Seq};

pub struct Primer3Driver {
    pub binary: std::path::PathBuf,
}

impl Primer3Driver {
    pub fn discover() -> Result<Self, EngineError> {
        let binary = locate_binary("PRIMER3_HOME", "primer3_core")?;
        Ok(Self { binary })
    }
}

impl PrimerTool for Primer3Driver {
    fn design_pair(&self, template: &Seq, region: (usize, usize)) -> Result<(Primer, Primer), EngineError> {
        let dir = tempdir().map_err(EngineError::Resource)?;
        let input_path = dir.path().join("input.boulder");

        let mut input_file = std::fs::File::create(&input_path).map_err(EngineError::Resource)?;
        writeln!(
            input_file,
            "SEQUENCE_TEMPLATE={}\nSEQUENCE_TARGET={},{}\nPRIMER_TASK=generic\n=",
            seq_to_string(template),
            region.0,
            region.1.saturating_sub(region.0) + 1
        )
        .map_err(EngineError::Resource)?;

        let output = Command::new(&self.binary)
            .arg(&input_path)
            .output()
            .map_err(EngineError::Resource)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("primer-design tool exited non-zero: {stderr}");
            return Err(EngineError::Design(format!(
                "primer-design tool failed: {stderr}"
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_boulder_pair(&stdout)
    }
}

fn parse_boulder_pair(stdout: &str) -> Result<(Primer, Primer), EngineError> {
    let mut fwd_seq = None;
    let mut rev_seq = None;

    for line in stdout.lines() {
        if let Some(v) = line.strip_prefix("PRIMER_LEFT_0_SEQUENCE=") {
            fwd_seq = Some(v.to_string());
        }
        if let Some(v) = line.strip_prefix("PRIMER_RIGHT_0_SEQUENCE=") {
            rev_seq = Some(v.to_string());
        }
    }

    let (fwd_seq, rev_seq) = match (fwd_seq, rev_seq) {
        (Some(f), Some(r)) => (f, r),
        _ => return Err(EngineError::Design("no primer pair returned".into())),
    };

    let mut fwd = Primer {
        sequence: crate::sequence::seq_from_str(&fwd_seq),
        direction: PrimerDirection::Forward,
        range: (0, fwd_seq.len().saturating_sub(1)),
        tm: 0.0,
        gc_fraction: 0.0,
        penalty: 0.0,
        notes: String::new(),
    };
    let mut rev = Primer {
        sequence: crate::sequence::seq_from_str(&rev_seq),
        direction: PrimerDirection::Reverse,
        range: (0, rev_seq.len().saturating_sub(1)),
        tm: 0.0,
        gc_fraction: 0.0,
        penalty: 0.0,
        notes: String::new(),
    };
    recompute_metrics(&mut fwd);
    recompute_metrics(&mut rev);

    Ok((fwd, rev))
}
