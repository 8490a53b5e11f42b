//! JSON-lines trace of every turn, for offline inspection and replays.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Result;
use serde_json::json;

use crate::core::TurnOutcome;
use crate::types::Pos;

pub struct TraceWriter<W: Write> {
    out: W,
    turn: u32,
}

impl TraceWriter<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> TraceWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, turn: 0 }
    }

    /// Append one line describing a swap request and everything it produced.
    pub fn record(&mut self, level: u32, a: Pos, b: Pos, outcome: &TurnOutcome) -> Result<()> {
        self.turn += 1;
        let (kind, detail) = match outcome {
            TurnOutcome::Ignored => ("ignored", json!(null)),
            TurnOutcome::Rejected(reason) => ("rejected", json!(reason.to_string())),
            TurnOutcome::Reverted(_) => ("reverted", json!(null)),
            TurnOutcome::Resolved(report) => (
                "resolved",
                json!({
                    "score_gained": report.score_gained,
                    "combos": report.combos,
                    "golden": report.golden,
                    "reshuffles": report.reshuffles,
                    "level_complete": report.level_complete,
                }),
            ),
            TurnOutcome::Aborted(err) => ("aborted", json!(err.to_string())),
        };
        let line = json!({
            "turn": self.turn,
            "level": level,
            "swap": [a, b],
            "outcome": kind,
            "detail": detail,
            "events": outcome.events(),
        });
        serde_json::to_writer(&mut self.out, &line)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
