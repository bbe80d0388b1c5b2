use std::collections::HashSet;

use toep_core::game::MatchState;
use toep_core::model::DECK_SIZE;
use toep_core::model::card::Card;

/// Tracks what must hold between two consecutive engine transitions.
pub(crate) struct InvariantTracker {
    match_number: u32,
    scores: Vec<u32>,
}

impl InvariantTracker {
    pub(crate) fn new(game: &MatchState) -> Self {
        Self {
            match_number: game.match_number(),
            scores: scores_of(game),
        }
    }

    pub(crate) fn check(&mut self, game: &MatchState) -> Result<(), String> {
        check_conservation(table_cards(game))?;

        let scores = scores_of(game);
        if game.match_number() == self.match_number {
            check_monotonic(&self.scores, &scores)?;
        } else {
            self.match_number = game.match_number();
        }
        self.scores = scores;

        if game.stake() == 0 {
            return Err("stake dropped to zero".to_string());
        }
        Ok(())
    }
}

fn scores_of(game: &MatchState) -> Vec<u32> {
    game.players().iter().map(|player| player.score()).collect()
}

fn table_cards(game: &MatchState) -> impl Iterator<Item = Card> + '_ {
    game.deck().cards().iter().copied().chain(
        game.players()
            .iter()
            .flat_map(|player| player.hand().iter().chain(player.pile()).copied()),
    )
}

/// Stock, hands and piles together hold every card exactly once.
pub(crate) fn check_conservation(cards: impl Iterator<Item = Card>) -> Result<(), String> {
    let mut seen = HashSet::with_capacity(DECK_SIZE);
    let mut total = 0usize;
    for card in cards {
        total += 1;
        if !seen.insert(card) {
            return Err(format!("card {card} appears more than once"));
        }
    }
    if total != DECK_SIZE {
        return Err(format!("expected {DECK_SIZE} cards on the table, found {total}"));
    }
    Ok(())
}

pub(crate) fn check_monotonic(before: &[u32], after: &[u32]) -> Result<(), String> {
    for (seat, (old, new)) in before.iter().zip(after).enumerate() {
        if new < old {
            return Err(format!(
                "score of seat {seat} fell from {old} to {new} within a match"
            ));
        }
    }
    Ok(())
}
