mod invariants;
mod summary;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use toep_core::game::{Action, ActionError, GameError, MatchState, Turn};
use toep_core::model::player::Seat;
use tracing::{Level, event};

use crate::config::{ResolvedOutputs, SimConfig};
use invariants::InvariantTracker;
pub use summary::SummaryStats;

/// Separates the policy stream from the deal stream of the same match seed.
const POLICY_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Plays seeded random-legal matches and streams one JSONL row per match.
pub struct SelfPlayRunner {
    config: SimConfig,
    outputs: ResolvedOutputs,
    logging_enabled: bool,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub matches_played: usize,
    pub truncated: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
}

/// One finished (or truncated) match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRow {
    pub run_id: String,
    pub match_index: usize,
    pub match_seed: u64,
    pub seats: usize,
    pub rounds: u32,
    pub actions: usize,
    pub toeps: usize,
    pub folds: usize,
    pub vuile_was_calls: usize,
    pub final_scores: Vec<u32>,
    pub losers: Vec<Seat>,
    pub truncated: bool,
}

#[derive(Debug, Default)]
struct ActionCounts {
    actions: usize,
    toeps: usize,
    folds: usize,
    vuile_was_calls: usize,
}

impl ActionCounts {
    fn note(&mut self, action: Action) {
        self.actions += 1;
        match action {
            Action::Toep => self.toeps += 1,
            Action::Fold => self.folds += 1,
            Action::CallVuileWas => self.vuile_was_calls += 1,
            _ => {}
        }
    }
}

impl SelfPlayRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: SimConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        // Rejects table sizes the engine cannot seat before any file is touched.
        MatchState::with_seed(config.table.seats, 0)?;

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
        })
    }

    /// Execute every configured match, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.table.seed.unwrap_or(0));
        let mut stats = SummaryStats::new(self.config.table.seats);
        let mut rows_written = 0usize;

        for match_index in 0..self.config.table.matches {
            let match_seed = rng.next_u64();
            let row = self.play_match(match_index, match_seed)?;

            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
            rows_written += 1;
            stats.record(&row);
        }

        writer.flush()?;
        stats.write_markdown(&self.outputs.summary_md, &self.config.run_id)?;

        Ok(RunSummary {
            matches_played: stats.matches(),
            truncated: stats.truncated(),
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
        })
    }

    /// Plays until the match closes or the action budget runs out.
    pub fn play_match(&self, match_index: usize, match_seed: u64) -> Result<MatchRow, RunnerError> {
        let table = &self.config.table;
        let mut game = MatchState::with_seed(table.seats, match_seed)?;
        let mut policy = StdRng::seed_from_u64(match_seed ^ POLICY_SALT);
        let mut tracker = InvariantTracker::new(&game);
        let mut counts = ActionCounts::default();
        let opening_match = game.match_number();

        let mut turn = game.start_round();
        let mut finished = false;
        while counts.actions < table.max_actions {
            let action = *game
                .legal_actions()
                .choose(&mut policy)
                .ok_or(RunnerError::Stalled { match_index, turn })?;
            turn = game
                .apply(turn.seat, action)
                .map_err(|source| RunnerError::Rejected {
                    match_index,
                    action,
                    source,
                })?;
            counts.note(action);

            tracker
                .check(&game)
                .map_err(|message| RunnerError::InvariantViolated {
                    match_index,
                    action_index: counts.actions,
                    message,
                })?;

            if game.match_number() != opening_match {
                finished = true;
                break;
            }
        }

        let row = match game.last_result().filter(|_| finished) {
            Some(result) => MatchRow {
                run_id: self.config.run_id.clone(),
                match_index,
                match_seed,
                seats: table.seats,
                rounds: result.rounds_played,
                actions: counts.actions,
                toeps: counts.toeps,
                folds: counts.folds,
                vuile_was_calls: counts.vuile_was_calls,
                final_scores: result.final_scores.clone(),
                losers: result.losers.clone(),
                truncated: false,
            },
            None => MatchRow {
                run_id: self.config.run_id.clone(),
                match_index,
                match_seed,
                seats: table.seats,
                rounds: game.round_number(),
                actions: counts.actions,
                toeps: counts.toeps,
                folds: counts.folds,
                vuile_was_calls: counts.vuile_was_calls,
                final_scores: game.players().iter().map(|p| p.score()).collect(),
                losers: Vec::new(),
                truncated: true,
            },
        };

        if self.logging_enabled && tracing::enabled!(Level::INFO) {
            event!(
                target: "toep_sim::match",
                Level::INFO,
                run_id = %self.config.run_id,
                match_index = match_index as u32,
                match_seed,
                rounds = row.rounds,
                actions = row.actions as u64,
                truncated = row.truncated
            );
        }

        Ok(row)
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize match row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("table setup failed: {0}")]
    Setup(#[from] GameError),
    #[error("match {match_index}: no legal action for {turn}")]
    Stalled { match_index: usize, turn: Turn },
    #[error("match {match_index}: engine rejected {action}: {source}")]
    Rejected {
        match_index: usize,
        action: Action,
        #[source]
        source: ActionError,
    },
    #[error("match {match_index}, action {action_index}: invariant violated: {message}")]
    InvariantViolated {
        match_index: usize,
        action_index: usize,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LoggingConfig, OutputsConfig, TableConfig};

    fn config(seats: usize, max_actions: usize) -> SimConfig {
        SimConfig {
            run_id: "unit".to_string(),
            table: TableConfig {
                seats,
                seed: Some(5),
                matches: 1,
                max_actions,
            },
            outputs: OutputsConfig {
                jsonl: "unused.jsonl".to_string(),
                summary_md: "unused.md".to_string(),
            },
            logging: LoggingConfig::default(),
        }
    }

    fn runner(seats: usize, max_actions: usize) -> SelfPlayRunner {
        let cfg = config(seats, max_actions);
        let outputs = cfg.resolved_outputs();
        SelfPlayRunner::new(cfg, outputs).expect("runner created")
    }

    #[test]
    fn rejects_unseatable_tables() {
        let cfg = config(9, 10);
        let outputs = cfg.resolved_outputs();
        let err = SelfPlayRunner::new(cfg, outputs).err().expect("nine seats fail");
        assert!(matches!(err, RunnerError::Setup(GameError::TooManyPlayers { .. })));
    }

    #[test]
    fn exhausted_budget_marks_row_truncated() {
        let row = runner(4, 3).play_match(0, 17).expect("match runs");
        assert!(row.truncated);
        assert_eq!(row.actions, 3);
        assert!(row.losers.is_empty());
        assert_eq!(row.rounds, 1);
        assert_eq!(row.final_scores.len(), 4);
    }

    #[test]
    fn completed_match_reports_losers() {
        let row = runner(3, 50_000).play_match(0, 23).expect("match runs");
        assert!(!row.truncated);
        assert!(!row.losers.is_empty());
        assert!(row.final_scores.iter().any(|score| *score >= 15));
        for seat in &row.losers {
            assert!(row.final_scores[seat.index()] >= 15);
        }
        assert!(row.rounds >= 1);
    }

    #[test]
    fn same_seed_replays_identically() {
        let runner = runner(5, 50_000);
        let a = runner.play_match(0, 99).unwrap();
        let b = runner.play_match(0, 99).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn counts_track_the_verbs_played() {
        let mut counts = ActionCounts::default();
        for action in [Action::Toep, Action::GoOn, Action::Fold, Action::CallVuileWas] {
            counts.note(action);
        }
        assert_eq!(counts.actions, 4);
        assert_eq!(counts.toeps, 1);
        assert_eq!(counts.folds, 1);
        assert_eq!(counts.vuile_was_calls, 1);
    }
}
