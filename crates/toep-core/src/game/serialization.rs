use super::match_state::MatchState;
use crate::game::action::Turn;
use crate::model::card::Card;
use crate::model::player::Seat;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};

/// What one seat may see of the table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableSnapshot {
    pub viewer: Seat,
    pub match_number: u32,
    pub round_number: u32,
    pub current_turn: Option<Turn>,
    pub turn: u32,
    pub sub_round: u32,
    pub stake: u32,
    pub leading_suit: Option<Suit>,
    pub dealer: Seat,
    pub max_score: u32,
    pub armoe: bool,
    pub ended_game: bool,
    pub players_that_lost: Vec<Seat>,
    pub seats: Vec<SeatSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeatSnapshot {
    pub seat: Seat,
    pub name: String,
    pub score: u32,
    pub alive: bool,
    pub play_open: bool,
    pub hand_size: usize,
    /// Present for the viewer's own seat and for seats playing open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hand: Option<Vec<Card>>,
    pub pile: Vec<Card>,
}

impl TableSnapshot {
    pub fn capture(state: &MatchState, viewer: Seat) -> Self {
        let seats = state
            .seats()
            .map(|seat| {
                let player = state.player(seat);
                let visible = seat == viewer || player.play_open();
                SeatSnapshot {
                    seat,
                    name: player.name().to_string(),
                    score: player.score(),
                    alive: state.is_alive(seat),
                    play_open: player.play_open(),
                    hand_size: player.hand().len(),
                    hand: visible.then(|| player.hand().cards().to_vec()),
                    pile: player.pile().to_vec(),
                }
            })
            .collect();

        TableSnapshot {
            viewer,
            match_number: state.match_number(),
            round_number: state.round_number(),
            current_turn: state.current_turn(),
            turn: state.turn(),
            sub_round: state.sub_round(),
            stake: state.stake(),
            leading_suit: state.leading_suit(),
            dealer: state.dealer(),
            max_score: state.max_score(),
            armoe: state.armoe(),
            ended_game: state.ended_game(),
            players_that_lost: state.players_that_lost().to_vec(),
            seats,
        }
    }

    pub fn to_json(state: &MatchState, viewer: Seat) -> serde_json::Result<String> {
        let snapshot = Self::capture(state, viewer);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::TableSnapshot;
    use crate::game::action::Action;
    use crate::game::match_state::MatchState;
    use crate::game::match_state::tests::stacked;
    use crate::model::player::Seat;

    #[test]
    fn snapshot_hides_other_hands() {
        let mut state = MatchState::with_seed(3, 99).unwrap();
        state.start_round();
        let snapshot = TableSnapshot::capture(&state, Seat::new(1));

        assert_eq!(snapshot.seats.len(), 3);
        assert!(snapshot.seats[1].hand.is_some());
        assert!(snapshot.seats[0].hand.is_none());
        assert!(snapshot.seats[2].hand.is_none());
        assert_eq!(snapshot.seats[2].hand_size, 4);
        assert_eq!(snapshot.stake, 1);
    }

    #[test]
    fn open_hand_is_visible_to_everyone() {
        let mut state = MatchState::with_seed(3, 0).unwrap();
        state.start_round_with_deck(stacked(&[
            ["8H", "9H", "10H", "8D"],
            ["JH", "QD", "KS", "8C"],
            ["9D", "10D", "8S", "9S"],
        ]));
        state.apply(Seat::new(1), Action::CallVuileWas).unwrap();
        state.apply(Seat::new(2), Action::Trust).unwrap();
        state.apply(Seat::new(0), Action::Trust).unwrap();

        let snapshot = TableSnapshot::capture(&state, Seat::new(2));
        assert!(snapshot.seats[1].play_open);
        assert_eq!(snapshot.seats[1].hand.as_ref().map(Vec::len), Some(4));
        assert!(snapshot.seats[0].hand.is_none());
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let mut state = MatchState::with_seed(4, 5).unwrap();
        state.start_round();
        let json = TableSnapshot::to_json(&state, Seat::new(0)).unwrap();
        assert!(json.contains("\"stake\": 1"));
        assert!(json.contains("\"action_type\": \"CallBluff\""));

        let parsed = TableSnapshot::from_json(&json).unwrap();
        assert_eq!(parsed, TableSnapshot::capture(&state, Seat::new(0)));
    }
}
