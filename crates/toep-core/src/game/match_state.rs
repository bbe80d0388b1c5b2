use crate::game::action::{Action, ActionType, Turn};
use crate::game::error::{ActionError, GameError};
use crate::game::turn_order::TurnOrder;
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::player::{Player, Seat};
use crate::model::suit::Suit;
use crate::model::{CARDS_PER_PLAYER, DECK_SIZE};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Reaching this many penalty points loses the match.
pub const MAX_SCORE: u32 = 15;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = DECK_SIZE / CARDS_PER_PLAYER;

/// Outcome of a finished match, kept until the next one finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_number: u32,
    pub rounds_played: u32,
    pub final_scores: Vec<u32>,
    pub losers: Vec<Seat>,
}

#[derive(Debug, Clone, Copy)]
struct VuileWasClaim {
    claimant: Seat,
    last_to_respond: Seat,
}

#[derive(Debug, Clone, Copy)]
struct RoundEnd {
    winner: Seat,
    /// `None` when everybody else folded.
    winning_card: Option<Card>,
}

/// Internal transitions folded by [`MatchState::advance`] until a seat has to act.
#[derive(Debug, Clone, Copy)]
enum Step {
    Await(Turn),
    EndSubRound,
    EndRound(RoundEnd),
    StartRound,
}

/// Canonical state of a Toep match and the phase machine that drives it.
#[derive(Debug, Clone)]
pub struct MatchState {
    players: Vec<Player>,
    deck: Deck,
    order: TurnOrder,
    dealer: Seat,
    current: Option<Turn>,
    turn: u32,
    sub_round: u32,
    sub_round_leader: Seat,
    last_of_sub_round: Seat,
    leading_suit: Option<Suit>,
    stake: u32,
    vuile_was: Option<VuileWasClaim>,
    players_that_looked: Vec<Seat>,
    toeper: Option<Seat>,
    last_toeper: Option<Seat>,
    players_that_lost: Vec<Seat>,
    clear_losers_on_start: bool,
    match_concluded: bool,
    last_result: Option<MatchResult>,
    stacked_deck: Option<Deck>,
    round_number: u32,
    match_number: u32,
    rng: StdRng,
    seed: u64,
}

impl MatchState {
    pub fn new(seat_count: usize) -> Result<Self, GameError> {
        let seed: u64 = rand::random();
        Self::with_seed(seat_count, seed)
    }

    pub fn with_seed(seat_count: usize, seed: u64) -> Result<Self, GameError> {
        if seat_count < MIN_PLAYERS {
            return Err(GameError::TooFewPlayers {
                requested: seat_count,
                min: MIN_PLAYERS,
            });
        }
        if seat_count > MAX_PLAYERS {
            return Err(GameError::TooManyPlayers {
                requested: seat_count,
                max: MAX_PLAYERS,
            });
        }

        let players: Vec<Player> = (0..seat_count).map(|i| Player::new(Seat::new(i))).collect();
        let order = TurnOrder::new(seat_count, (0..seat_count).map(Seat::new).collect());

        Ok(Self {
            players,
            deck: Deck::standard(),
            order,
            dealer: Seat::new(0),
            current: None,
            turn: 0,
            sub_round: 0,
            sub_round_leader: Seat::new(0),
            last_of_sub_round: Seat::new(0),
            leading_suit: None,
            stake: 1,
            vuile_was: None,
            players_that_looked: Vec::new(),
            toeper: None,
            last_toeper: None,
            players_that_lost: Vec::new(),
            clear_losers_on_start: false,
            match_concluded: false,
            last_result: None,
            stacked_deck: None,
            round_number: 0,
            match_number: 1,
            rng: StdRng::seed_from_u64(seed),
            seed,
        })
    }

    /// Collects every card, reshuffles and deals a new round. Also used to
    /// begin the very first round after construction.
    pub fn start_round(&mut self) -> Turn {
        self.match_concluded = false;
        self.advance(Step::StartRound)
    }

    /// Like [`start_round`](Self::start_round) but deals from `deck` as given,
    /// without shuffling.
    pub fn start_round_with_deck(&mut self, deck: Deck) -> Turn {
        self.stacked_deck = Some(deck);
        self.start_round()
    }

    /// Performs one seat verb and returns who acts next.
    pub fn apply(&mut self, seat: Seat, action: Action) -> Result<Turn, ActionError> {
        self.validate(seat, action)?;
        self.match_concluded = false;
        debug!(seat = %seat, action = %action, "seat acted");

        let step = match action {
            Action::CallVuileWas => self.handle_called_vuile_was(seat),
            Action::PassVuileWas => self.handle_passed_vuile_was(seat),
            Action::Inspect => self.handle_vuile_was_response(seat, true),
            Action::Trust => self.handle_vuile_was_response(seat, false),
            Action::Toep => self.handle_toep(seat),
            Action::GoOn => self.handle_go_on(seat),
            Action::Fold => self.handle_fold(seat),
            Action::Play(card) => self.handle_played_card(seat, card),
        };
        Ok(self.advance(step))
    }

    fn validate(&self, seat: Seat, action: Action) -> Result<(), ActionError> {
        let current = self.current.ok_or(ActionError::NoRoundInProgress)?;
        if current.seat != seat {
            return Err(ActionError::OutOfTurn {
                expected: current.seat,
                actual: seat,
            });
        }
        if action.action_type() != current.action_type {
            return Err(ActionError::WrongPhase {
                expected: current.action_type,
                actual: action.action_type(),
            });
        }
        match action {
            Action::Play(card) if !self.players[seat.index()].hand.contains(card) => {
                Err(ActionError::CardNotInHand { seat, card })
            }
            Action::Toep if !self.can_toep(seat) => Err(ActionError::ToepNotAllowed { seat }),
            _ => Ok(()),
        }
    }

    fn advance(&mut self, mut step: Step) -> Turn {
        loop {
            step = match step {
                Step::Await(turn) => {
                    self.current = Some(turn);
                    return turn;
                }
                Step::EndSubRound => self.end_sub_round(),
                Step::EndRound(end) => self.end_round(end),
                Step::StartRound => self.begin_round(),
            };
        }
    }

    fn begin_round(&mut self) -> Step {
        if self.clear_losers_on_start {
            self.players_that_lost.clear();
            self.clear_losers_on_start = false;
        }
        if self.max_score() >= MAX_SCORE {
            self.finish_match();
        }

        self.round_number += 1;
        for player in self.players.iter_mut() {
            self.deck.replenish(player.reset_cards());
        }
        match self.stacked_deck.take() {
            Some(deck) => self.deck = deck,
            None => self.deck.shuffle_in_place(&mut self.rng),
        }
        self.deck.distribute(&mut self.players, CARDS_PER_PLAYER);

        self.sub_round = 0;
        self.turn = 0;
        self.leading_suit = None;
        self.stake = 1;
        self.vuile_was = None;
        self.players_that_looked.clear();
        self.toeper = None;
        self.last_toeper = None;
        self.order = TurnOrder::new(self.players.len(), self.seats().collect());

        let opener = self.order.next(self.dealer);
        info!(
            match_number = self.match_number,
            round = self.round_number,
            dealer = %self.dealer,
            armoe = self.armoe(),
            "round started"
        );

        if self.armoe() {
            self.start_sub_round(opener)
        } else {
            Step::Await(Turn::new(opener, ActionType::CallBluff))
        }
    }

    fn finish_match(&mut self) {
        let losers: Vec<Seat> = self
            .seats()
            .filter(|seat| self.players[seat.index()].score >= MAX_SCORE)
            .collect();
        let result = MatchResult {
            match_number: self.match_number,
            rounds_played: self.round_number,
            final_scores: self.players.iter().map(Player::score).collect(),
            losers: losers.clone(),
        };
        info!(
            match_number = self.match_number,
            rounds = self.round_number,
            losers = ?losers,
            "match finished"
        );

        for player in self.players.iter_mut() {
            player.reset_match();
        }
        self.players_that_lost = losers;
        self.clear_losers_on_start = true;
        self.match_concluded = true;
        self.last_result = Some(result);
        self.dealer = Seat::new(0);
        self.last_toeper = None;
        self.match_number += 1;
        self.round_number = 0;
    }

    fn handle_passed_vuile_was(&mut self, seat: Seat) -> Step {
        if seat == self.dealer {
            self.start_sub_round(self.order.next(self.dealer))
        } else {
            Step::Await(Turn::new(self.order.next(seat), ActionType::CallBluff))
        }
    }

    fn handle_called_vuile_was(&mut self, seat: Seat) -> Step {
        info!(seat = %seat, "vuile was called");
        self.vuile_was = Some(VuileWasClaim {
            claimant: seat,
            last_to_respond: self.order.previous(seat),
        });
        self.players_that_looked.clear();
        Step::Await(Turn::new(self.order.next(seat), ActionType::CheckOrTrust))
    }

    fn handle_vuile_was_response(&mut self, seat: Seat, inspected: bool) -> Step {
        if inspected {
            self.players_that_looked.push(seat);
        }
        let claim = self
            .vuile_was
            .expect("check-or-trust is only asked after a vuile was call");

        if seat == claim.last_to_respond {
            self.resolve_vuile_was(claim.claimant, seat)
        } else {
            Step::Await(Turn::new(self.order.next(seat), ActionType::CheckOrTrust))
        }
    }

    fn resolve_vuile_was(&mut self, claimant: Seat, resolver: Seat) -> Step {
        let genuine = self.players[claimant.index()].hand.is_vuile_was();
        if genuine {
            for inspector in self.players_that_looked.clone() {
                self.players[inspector.index()].add_score(1);
            }
            self.replace_hand(claimant);
        } else {
            let player = &mut self.players[claimant.index()];
            player.add_score(1);
            player.play_open = true;
        }
        info!(
            claimant = %claimant,
            genuine,
            inspectors = self.players_that_looked.len(),
            "vuile was resolved"
        );

        if resolver == self.dealer {
            self.start_sub_round(self.order.next(self.dealer))
        } else {
            Step::Await(Turn::new(self.order.next(resolver), ActionType::CallBluff))
        }
    }

    /// Swaps the seat's hand for fresh cards. Fresh cards come from the undealt
    /// stock; with the stock exhausted the old hand is shuffled back in first.
    fn replace_hand(&mut self, seat: Seat) {
        let old = self.players[seat.index()].hand.take_all();
        let size = old.len();
        if self.deck.len() >= size {
            let fresh: Vec<Card> = (0..size).filter_map(|_| self.deck.draw()).collect();
            self.deck.replenish(old);
            for card in fresh {
                self.players[seat.index()].hand.add(card);
            }
        } else {
            self.deck.replenish(old);
            self.deck.shuffle_in_place(&mut self.rng);
            for _ in 0..size {
                if let Some(card) = self.deck.draw() {
                    self.players[seat.index()].hand.add(card);
                }
            }
        }
    }

    fn handle_toep(&mut self, seat: Seat) -> Step {
        info!(seat = %seat, stake = self.stake, "toep");
        self.toeper = Some(seat);
        Step::Await(Turn::new(self.order.next(seat), ActionType::GoOrFold))
    }

    fn handle_go_on(&mut self, seat: Seat) -> Step {
        let raiser = self.toeper.expect("go-or-fold is only asked after a toep");
        if seat == self.order.previous(raiser) {
            self.settle_toep(raiser)
        } else {
            Step::Await(Turn::new(self.order.next(seat), ActionType::GoOrFold))
        }
    }

    fn handle_fold(&mut self, seat: Seat) -> Step {
        let raiser = self.toeper.expect("go-or-fold is only asked after a toep");
        let stake = self.stake;
        let first_raise = self.last_toeper.is_none();
        {
            let player = &mut self.players[seat.index()];
            player.add_score(stake);
            if first_raise {
                player.pussy_points += 1;
            }
        }

        // Neighbours are read before the seat leaves the rotation.
        let closes_circuit = seat == self.order.previous(raiser);
        let next = self.order.next(seat);
        if seat == self.last_of_sub_round {
            self.last_of_sub_round = self.order.previous(seat);
        }
        if seat == self.sub_round_leader {
            self.sub_round_leader = next;
        }
        self.order.remove(seat);
        info!(seat = %seat, stake, alive = self.order.len(), "fold");

        if self.order.len() == 1 {
            let winner = self.order.alive()[0];
            return Step::EndRound(RoundEnd {
                winner,
                winning_card: None,
            });
        }

        if closes_circuit {
            self.settle_toep(raiser)
        } else {
            Step::Await(Turn::new(next, ActionType::GoOrFold))
        }
    }

    fn settle_toep(&mut self, raiser: Seat) -> Step {
        self.stake += 1;
        self.last_toeper = Some(raiser);
        self.toeper = None;
        debug!(raiser = %raiser, stake = self.stake, "toep accepted");
        Step::Await(Turn::new(raiser, ActionType::PlayCard))
    }

    fn handle_played_card(&mut self, seat: Seat, card: Card) -> Step {
        let player = &mut self.players[seat.index()];
        player.hand.remove(card);
        player.pile.push(card);

        if self.leading_suit.is_none() {
            self.leading_suit = Some(card.suit);
        }
        self.turn += 1;

        if seat == self.last_of_sub_round {
            Step::EndSubRound
        } else {
            Step::Await(Turn::new(self.order.next(seat), ActionType::PlayCard))
        }
    }

    fn start_sub_round(&mut self, leader: Seat) -> Step {
        self.sub_round += 1;
        self.turn = 1;
        self.leading_suit = None;
        self.sub_round_leader = leader;
        self.last_of_sub_round = self.order.previous(leader);
        debug!(sub_round = self.sub_round, leader = %leader, "sub-round started");
        Step::Await(Turn::new(leader, ActionType::PlayCard))
    }

    /// Highest value among the last cards that follow the leading suit. When
    /// nobody still in the round followed, the sub-round leader takes it.
    fn sub_round_winner(&self) -> (Seat, Card) {
        let mut best: Option<(Seat, Card)> = None;
        for &seat in self.order.alive() {
            let Some(card) = self.players[seat.index()].last_played() else {
                continue;
            };
            if Some(card.suit) != self.leading_suit {
                continue;
            }
            if best.is_none_or(|(_, top)| card.value() > top.value()) {
                best = Some((seat, card));
            }
        }

        best.unwrap_or_else(|| {
            let leader = self.sub_round_leader;
            let card = self.players[leader.index()]
                .last_played()
                .expect("every seat in the round has played when a sub-round closes");
            (leader, card)
        })
    }

    fn end_sub_round(&mut self) -> Step {
        let (winner, card) = self.sub_round_winner();
        self.dealer = winner;
        debug!(sub_round = self.sub_round, winner = %winner, card = %card, "sub-round won");

        if self.sub_round as usize == CARDS_PER_PLAYER {
            Step::EndRound(RoundEnd {
                winner,
                winning_card: Some(card),
            })
        } else {
            self.start_sub_round(winner)
        }
    }

    fn end_round(&mut self, end: RoundEnd) -> Step {
        if end.winning_card.is_some_and(Card::is_jack) {
            self.stake *= 2;
        }
        let stake = self.stake;
        let losers: Vec<Seat> = self
            .order
            .alive()
            .iter()
            .copied()
            .filter(|seat| *seat != end.winner)
            .collect();
        for seat in &losers {
            self.players[seat.index()].add_score(stake);
        }
        self.dealer = end.winner;
        self.current = None;
        info!(
            round = self.round_number,
            winner = %end.winner,
            stake,
            losers = losers.len(),
            "round finished"
        );
        Step::StartRound
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// # Panics
    /// Panics if `seat` is not one of [`seats`](Self::seats).
    pub fn player(&self, seat: Seat) -> &Player {
        &self.players[seat.index()]
    }

    pub fn seat_count(&self) -> usize {
        self.players.len()
    }

    pub fn seats(&self) -> impl Iterator<Item = Seat> + use<> {
        (0..self.players.len()).map(Seat::new)
    }

    /// Seats still contesting the round, in seat order.
    pub fn alive_seats(&self) -> &[Seat] {
        self.order.alive()
    }

    pub fn is_alive(&self, seat: Seat) -> bool {
        self.order.contains(seat)
    }

    /// The seat after `seat` among those still in the round.
    ///
    /// # Panics
    /// Panics if `seat` has folded or is not at the table; check
    /// [`is_alive`](Self::is_alive) first.
    pub fn next_seat(&self, seat: Seat) -> Seat {
        self.order.next(seat)
    }

    /// # Panics
    /// Same contract as [`next_seat`](Self::next_seat).
    pub fn previous_seat(&self, seat: Seat) -> Seat {
        self.order.previous(seat)
    }

    pub fn dealer(&self) -> Seat {
        self.dealer
    }

    /// The pending `(next_actor, next_phase)`; `None` before the first round.
    pub fn current_turn(&self) -> Option<Turn> {
        self.current
    }

    pub fn active_player(&self) -> Option<Seat> {
        self.current.map(|turn| turn.seat)
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn sub_round(&self) -> u32 {
        self.sub_round
    }

    pub fn stake(&self) -> u32 {
        self.stake
    }

    pub fn leading_suit(&self) -> Option<Suit> {
        self.leading_suit
    }

    pub fn last_toeper(&self) -> Option<Seat> {
        self.last_toeper
    }

    pub fn vuile_was_caller(&self) -> Option<Seat> {
        self.vuile_was.map(|claim| claim.claimant)
    }

    pub fn players_that_looked(&self) -> &[Seat] {
        &self.players_that_looked
    }

    pub fn max_score(&self) -> u32 {
        self.players.iter().map(Player::score).max().unwrap_or(0)
    }

    /// One point from losing: no vuile was round and no toeps.
    pub fn armoe(&self) -> bool {
        self.max_score() == MAX_SCORE - 1
    }

    /// True while a seat sits at the losing score, and right after the
    /// transition that closed a match (until the next accepted action).
    pub fn ended_game(&self) -> bool {
        self.max_score() >= MAX_SCORE || self.match_concluded
    }

    /// Losers of the match that just ended. Cleared by the next round start
    /// after the one that began the new match.
    pub fn players_that_lost(&self) -> &[Seat] {
        &self.players_that_lost
    }

    pub fn last_result(&self) -> Option<&MatchResult> {
        self.last_result.as_ref()
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn match_number(&self) -> u32 {
        self.match_number
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Cards across the stock, every hand and every pile.
    pub fn card_count(&self) -> usize {
        self.deck.len()
            + self
                .players
                .iter()
                .map(|p| p.hand().len() + p.pile().len())
                .sum::<usize>()
    }

    pub fn can_toep(&self, seat: Seat) -> bool {
        self.last_toeper != Some(seat) && self.max_score() + 1 < MAX_SCORE
    }

    /// Cards of `seat` that follow the leading suit, or the whole hand when
    /// it cannot follow.
    ///
    /// # Panics
    /// Panics if `seat` is not one of [`seats`](Self::seats).
    pub fn legal_cards(&self, seat: Seat) -> Vec<Card> {
        self.players[seat.index()].hand.legal_cards(self.leading_suit)
    }

    /// Verbs open to the seat whose turn it is.
    pub fn legal_actions(&self) -> Vec<Action> {
        let Some(turn) = self.current else {
            return Vec::new();
        };
        match turn.action_type {
            ActionType::CallBluff => vec![Action::CallVuileWas, Action::PassVuileWas],
            ActionType::CheckOrTrust => vec![Action::Inspect, Action::Trust],
            ActionType::GoOrFold => vec![Action::GoOn, Action::Fold],
            ActionType::PlayCard => {
                let mut actions = Vec::with_capacity(CARDS_PER_PLAYER + 1);
                if self.can_toep(turn.seat) {
                    actions.push(Action::Toep);
                }
                actions.extend(self.legal_cards(turn.seat).into_iter().map(Action::Play));
                actions
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, seat: Seat, score: u32) {
        self.players[seat.index()].score = score;
    }
}
