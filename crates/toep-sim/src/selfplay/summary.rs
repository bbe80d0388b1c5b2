use std::fs;
use std::path::Path;

use super::MatchRow;

/// Aggregates match rows into the Markdown run summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    seats: usize,
    matches: usize,
    truncated: usize,
    rounds: u64,
    actions: u64,
    toeps: u64,
    folds: u64,
    vuile_was_calls: u64,
    losses: Vec<u32>,
    score_totals: Vec<u64>,
}

impl SummaryStats {
    pub fn new(seats: usize) -> Self {
        Self {
            seats,
            matches: 0,
            truncated: 0,
            rounds: 0,
            actions: 0,
            toeps: 0,
            folds: 0,
            vuile_was_calls: 0,
            losses: vec![0; seats],
            score_totals: vec![0; seats],
        }
    }

    pub fn record(&mut self, row: &MatchRow) {
        self.matches += 1;
        if row.truncated {
            self.truncated += 1;
        }
        self.rounds += u64::from(row.rounds);
        self.actions += row.actions as u64;
        self.toeps += row.toeps as u64;
        self.folds += row.folds as u64;
        self.vuile_was_calls += row.vuile_was_calls as u64;
        for seat in &row.losers {
            if let Some(count) = self.losses.get_mut(seat.index()) {
                *count += 1;
            }
        }
        for (total, score) in self.score_totals.iter_mut().zip(&row.final_scores) {
            *total += u64::from(*score);
        }
    }

    pub fn matches(&self) -> usize {
        self.matches
    }

    pub fn truncated(&self) -> usize {
        self.truncated
    }

    fn per_match(&self, total: u64) -> f64 {
        if self.matches == 0 {
            0.0
        } else {
            total as f64 / self.matches as f64
        }
    }

    pub fn render_markdown(&self, run_id: &str) -> String {
        let mut out = String::new();
        out.push_str("# Self-play Summary\n\n");
        out.push_str(&format!(
            "Run `{run_id}`: {} matches at {} seats, {} truncated\n\n",
            self.matches, self.seats, self.truncated
        ));
        out.push_str("| Metric | Total | Per match |\n");
        out.push_str("|--------|-------|-----------|\n");
        for (label, total) in [
            ("Rounds", self.rounds),
            ("Actions", self.actions),
            ("Toeps", self.toeps),
            ("Folds", self.folds),
            ("Vuile was calls", self.vuile_was_calls),
        ] {
            out.push_str(&format!(
                "| {label} | {total} | {avg:.2} |\n",
                avg = self.per_match(total)
            ));
        }

        out.push_str("\n| Seat | Losses | Loss % | Avg final score |\n");
        out.push_str("|------|--------|--------|-----------------|\n");
        for (index, (losses, total)) in self.losses.iter().zip(&self.score_totals).enumerate() {
            let loss_rate = self.per_match(u64::from(*losses)) * 100.0;
            out.push_str(&format!(
                "| player_{seat} | {losses} | {loss_rate:.1}% | {avg:.2} |\n",
                seat = index + 1,
                avg = self.per_match(*total)
            ));
        }
        out
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>, run_id: &str) -> std::io::Result<()> {
        fs::write(path, self.render_markdown(run_id))
    }
}

#[cfg(test)]
mod tests {
    use super::SummaryStats;
    use crate::selfplay::MatchRow;
    use toep_core::model::player::Seat;

    fn row(losers: Vec<Seat>, final_scores: Vec<u32>, truncated: bool) -> MatchRow {
        MatchRow {
            run_id: "t".to_string(),
            match_index: 0,
            match_seed: 1,
            seats: 2,
            rounds: 6,
            actions: 40,
            toeps: 3,
            folds: 1,
            vuile_was_calls: 2,
            final_scores,
            losers,
            truncated,
        }
    }

    #[test]
    fn aggregates_counts_and_losses() {
        let mut stats = SummaryStats::new(2);
        stats.record(&row(vec![Seat::new(0)], vec![15, 4], false));
        stats.record(&row(vec![Seat::new(1)], vec![3, 16], false));
        stats.record(&row(Vec::new(), vec![2, 2], true));

        assert_eq!(stats.matches(), 3);
        assert_eq!(stats.truncated(), 1);

        let md = stats.render_markdown("t");
        assert!(md.contains("3 matches at 2 seats, 1 truncated"));
        assert!(md.contains("| Rounds | 18 | 6.00 |"));
        assert!(md.contains("| Toeps | 9 | 3.00 |"));
        assert!(md.contains("| player_1 | 1 | 33.3% | 6.67 |"));
        assert!(md.contains("| player_2 | 1 | 33.3% | 7.33 |"));
    }

    #[test]
    fn empty_summary_has_no_division_by_zero() {
        let md = SummaryStats::new(3).render_markdown("empty");
        assert!(md.contains("| Actions | 0 | 0.00 |"));
        assert!(md.contains("| player_3 | 0 | 0.0% | 0.00 |"));
    }
}
