//! Driver for a BLAST-like local-alignment tool, invoked once per source
//! database.

use std::io::Write;
use std::process::Command;

use log::warn;
use tempfile::tempdir;

use super::{locate_binary, AlignmentTool};
use crate::error::EngineError;
use crate::homology::identity_band_params;
use crate::matching::Match;
use crate::sequence::{seq_to_string, Seq};

pub struct BlastDriver {
    pub binary: std::path::PathBuf,
    pub min_identity: f64,
}

impl BlastDriver {
    pub fn discover(min_identity: f64) -> Result<Self, EngineError> {
        let binary = locate_binary("NCBITOOLS_HOME", "blastn")?;
        Ok(Self { binary, min_identity })
    }
}

impl AlignmentTool for BlastDriver {
    fn search(&self, db_id: &str, query: &Seq, entries: &[(String, Seq)]) -> Result<Vec<Match>, EngineError> {
        let dir = tempdir().map_err(EngineError::Resource)?;
        let query_path = dir.path().join("query.fa");
        let db_path = dir.path().join("subject.fa");

        let mut query_file = std::fs::File::create(&query_path).map_err(EngineError::Resource)?;
        writeln!(query_file, ">query\n{}", seq_to_string(query)).map_err(EngineError::Resource)?;

        let mut db_file = std::fs::File::create(&db_path).map_err(EngineError::Resource)?;
        for (entry_id, seq) in entries {
            writeln!(db_file, ">{entry_id}\n{}", seq_to_string(seq)).map_err(EngineError::Resource)?;
        }

        let (reward, penalty, gapopen, gapextend, evalue) = identity_band_params(self.min_identity);

        let output = Command::new(&self.binary)
            .arg("-query")
            .arg(&query_path)
            .arg("-subject")
            .arg(&db_path)
            .arg("-outfmt")
            .arg("6 qseqid sseqid qstart qend sstart send mismatch gapopen")
            .arg("-perc_identity")
            .arg(format!("{}", (self.min_identity * 100.0).clamp(0.0, 100.0)))
            .arg("-reward")
            .arg(reward.to_string())
            .arg("-penalty")
            .arg(penalty.to_string())
            .arg("-gapopen")
            .arg(gapopen.to_string())
            .arg("-gapextend")
            .arg(gapextend.to_string())
            .arg("-evalue")
            .arg(evalue.to_string())
            .output()
            .map_err(EngineError::Resource)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("alignment tool exited non-zero for db '{db_id}': {stderr}");
            return Err(EngineError::Search(format!(
                "alignment tool failed for db '{db_id}': {stderr}"
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_tabular_hits(db_id, &stdout, entries)
    }
}

fn parse_tabular_hits(db_id: &str, stdout: &str, entries: &[(String, Seq)]) -> Result<Vec<Match>, EngineError> {
    let mut matches = Vec::new();
    for line in stdout.lines() {
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() < 8 {
            continue;
        }
        let entry_id = cols[1].to_string();
        let qs: usize = cols[2].parse().unwrap_or(0);
        let qe: usize = cols[3].parse().unwrap_or(0);
        let ss: usize = cols[4].parse().unwrap_or(0);
        let se: usize = cols[5].parse().unwrap_or(0);
        let mismatches: usize = cols[6].parse().unwrap_or(0);
        let gaps: usize = cols[7].parse().unwrap_or(0);

        let subject_seq = entries
            .iter()
            .find(|(id, _)| id == &entry_id)
            .map(|(_, seq)| seq[ss.min(se)..=ss.max(se)].to_vec())
            .unwrap_or_default();

        matches.push(Match {
            db_id: db_id.to_string(),
            entry_id,
            qs: qs.min(qe),
            qe: qs.max(qe),
            ss: ss.min(se),
            se: ss.max(se),
            subject_seq,
            mismatches_and_gaps: mismatches + gaps,
            query_is_rc: qs > qe,
            subject_is_circular: false,
            tag: String::new(),
        });
    }
    Ok(matches)
}
