// system-tests/tests/helpers/artifacts.rs
// ============================================================================
// Module: Test Artifacts
// Description: Per-scenario output directory and summary reporting.
// Purpose: Leave a canonical record of each live scenario, pass or fail.
// Dependencies: system-tests, crudcheck-client, serde, serde_jcs
// ============================================================================

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use crudcheck_client::ExchangeRecord;
use serde::Serialize;
use system_tests::config::SystemTestConfig;

/// File names written into every scenario directory.
const SUMMARY_JSON: &str = "summary.json";
/// Human-readable summary.
const SUMMARY_MD: &str = "summary.md";
/// HTTP exchanges made by the scenario's client.
const TRANSCRIPT_JSON: &str = "transcript.json";
/// Lifecycle events appended by the file sink.
const LIFECYCLE_JSONL: &str = "lifecycle.jsonl";

#[derive(Debug, Serialize)]
struct ScenarioSummary {
    scenario: String,
    outcome: String,
    target: String,
    started_at_ms: u128,
    duration_ms: u128,
    exchanges: usize,
    notes: Vec<String>,
    artifacts: Vec<String>,
}

fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

/// Output directory for one scenario.
#[derive(Debug, Clone)]
pub struct TestArtifacts {
    dir: PathBuf,
}

impl TestArtifacts {
    /// Creates `<run root>/<scenario>`, defaulting the run root under `target/`.
    pub fn new(scenario: &str, config: &SystemTestConfig) -> io::Result<Self> {
        let run_root = config.run_root.clone().unwrap_or_else(|| {
            PathBuf::from("target/system-tests").join(format!("run_{}", now_millis()))
        });
        let dir = run_root.join(scenario);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
        })
    }

    /// Path the lifecycle file sink appends to.
    pub fn lifecycle_log(&self) -> PathBuf {
        self.dir.join(LIFECYCLE_JSONL)
    }

    /// Writes `value` as canonical JSON.
    fn write_canonical<T: Serialize>(&self, name: &str, value: &T) -> io::Result<()> {
        let bytes = serde_jcs::to_vec(value).map_err(|err| io::Error::other(err.to_string()))?;
        fs::write(self.dir.join(name), bytes)
    }

    /// Names of the known artifacts present on disk.
    fn present(&self) -> Vec<String> {
        [SUMMARY_JSON, SUMMARY_MD, TRANSCRIPT_JSON, LIFECYCLE_JSONL]
            .into_iter()
            .filter(|name| *name == SUMMARY_JSON || *name == SUMMARY_MD || self.dir.join(name).exists())
            .map(str::to_string)
            .collect()
    }
}

/// Writes a scenario summary exactly once, from `finish` or on drop.
pub struct TestReporter {
    artifacts: TestArtifacts,
    scenario: String,
    target: String,
    started_at_ms: u128,
    finalized: bool,
}

impl TestReporter {
    /// Creates a reporter for the named scenario against the configured target.
    pub fn new(scenario: &str, config: &SystemTestConfig) -> io::Result<Self> {
        Ok(Self {
            artifacts: TestArtifacts::new(scenario, config)?,
            scenario: scenario.to_string(),
            target: config.harness.base_url.to_string(),
            started_at_ms: now_millis(),
            finalized: false,
        })
    }

    /// Returns the scenario's output directory.
    pub fn artifacts(&self) -> &TestArtifacts {
        &self.artifacts
    }

    /// Writes the transcript and both summaries.
    pub fn finish(
        &mut self,
        outcome: &str,
        notes: Vec<String>,
        transcript: &[ExchangeRecord],
    ) -> io::Result<()> {
        self.finalized = true;
        self.artifacts.write_canonical(TRANSCRIPT_JSON, &transcript)?;
        let summary = ScenarioSummary {
            scenario: self.scenario.clone(),
            outcome: outcome.to_string(),
            target: self.target.clone(),
            started_at_ms: self.started_at_ms,
            duration_ms: now_millis().saturating_sub(self.started_at_ms),
            exchanges: transcript.len(),
            notes,
            artifacts: self.artifacts.present(),
        };
        self.artifacts.write_canonical(SUMMARY_JSON, &summary)?;
        fs::write(self.artifacts.dir.join(SUMMARY_MD), render_markdown(&summary))
    }
}

impl Drop for TestReporter {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }
        let outcome = if std::thread::panicking() { "panic" } else { "fail" };
        let _ = self.finish(outcome, vec!["scenario ended before writing a summary".to_string()], &[]);
    }
}

fn render_markdown(summary: &ScenarioSummary) -> String {
    let mut out = format!("# {}\n\n", summary.scenario);
    let _ = writeln!(out, "- Outcome: {}", summary.outcome);
    let _ = writeln!(out, "- Target: {}", summary.target);
    let _ = writeln!(out, "- Exchanges: {}", summary.exchanges);
    let _ = writeln!(out, "- Duration (ms): {}", summary.duration_ms);
    out.push_str("\n## Notes\n\n");
    for note in &summary.notes {
        let _ = writeln!(out, "- {note}");
    }
    out.push_str("\n## Artifacts\n\n");
    for artifact in &summary.artifacts {
        let _ = writeln!(out, "- {artifact}");
    }
    out
}
