//! Driver for an external melting-temperature calculator, used as a
//! cross-check against the in-process nearest-neighbor calculation when the
//! caller opts in.

use std::io::Write;
use std::process::Command;

use tempfile::tempdir;

use super::{locate_binary, MeltingTempTool};
use crate::error::EngineError;
use crate::melting_temp::IonConcentrations;
use crate::sequence::{seq_to_string, Seq};

pub struct MeltDriver {
    pub binary: std::path::PathBuf,
}

impl MeltDriver {
    pub fn discover() -> Result<Self, EngineError> {
        let binary = locate_binary("MELTTOOLS_HOME", "melt")?;
        Ok(Self { binary })
    }
}

impl MeltingTempTool for MeltDriver {
    fn melt(&self, seq: &Seq, ion: &IonConcentrations) -> Result<f32, EngineError> {
        let dir = tempdir().map_err(EngineError::Resource)?;
        let input_path = dir.path().join("seq.txt");

        let mut input_file = std::fs::File::create(&input_path).map_err(EngineError::Resource)?;
        writeln!(input_file, "{}", seq_to_string(seq)).map_err(EngineError::Resource)?;

        let output = Command::new(&self.binary)
            .arg(&input_path)
            .arg("--na")
            .arg(ion.monovalent.to_string())
            .arg("--mg")
            .arg(ion.divalent.to_string())
            .arg("--primer")
            .arg(ion.primer.to_string())
            .output()
            .map_err(EngineError::Resource)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::Design(format!(
                "melting-temp tool failed: {stderr}"
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .trim()
            .parse::<f32>()
            .map_err(|e| EngineError::Design(format!("could not parse melting-temp output: {e}")))
    }
}
