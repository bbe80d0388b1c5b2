use crate::model::player::Seat;

/// Circular successor/predecessor tables over the seats still in the round.
///
/// Rebuilt from scratch whenever the alive set changes, so every lookup made
/// during one transition sees the same ordering.
#[derive(Debug, Clone, Default)]
pub struct TurnOrder {
    alive: Vec<Seat>,
    slots: Vec<Option<usize>>,
    next: Vec<usize>,
    prev: Vec<usize>,
}

impl TurnOrder {
    pub fn new(seat_count: usize, alive: Vec<Seat>) -> Self {
        let mut order = Self {
            alive: Vec::new(),
            slots: vec![None; seat_count],
            next: Vec::new(),
            prev: Vec::new(),
        };
        order.rebuild(alive);
        order
    }

    fn rebuild(&mut self, alive: Vec<Seat>) {
        let len = alive.len();
        self.slots.iter_mut().for_each(|slot| *slot = None);
        for (slot, seat) in alive.iter().enumerate() {
            self.slots[seat.index()] = Some(slot);
        }
        self.next = (0..len).map(|slot| (slot + 1) % len).collect();
        self.prev = (0..len).map(|slot| (slot + len - 1) % len).collect();
        self.alive = alive;
    }

    /// Drops `seat` from the rotation. Returns false when it was not alive.
    pub fn remove(&mut self, seat: Seat) -> bool {
        if !self.contains(seat) {
            return false;
        }
        let remaining: Vec<Seat> = self.alive.iter().copied().filter(|s| *s != seat).collect();
        self.rebuild(remaining);
        true
    }

    pub fn contains(&self, seat: Seat) -> bool {
        self.slot(seat).is_some()
    }

    fn slot(&self, seat: Seat) -> Option<usize> {
        self.slots.get(seat.index()).copied().flatten()
    }

    /// The alive seat after `seat`, wrapping to the first.
    ///
    /// Panics if `seat` is not alive.
    pub fn next(&self, seat: Seat) -> Seat {
        let slot = self.slot(seat).expect("turn order queried for a seat outside the round");
        self.alive[self.next[slot]]
    }

    /// The alive seat before `seat`, wrapping to the last.
    ///
    /// Panics if `seat` is not alive.
    pub fn previous(&self, seat: Seat) -> Seat {
        let slot = self.slot(seat).expect("turn order queried for a seat outside the round");
        self.alive[self.prev[slot]]
    }

    pub fn alive(&self) -> &[Seat] {
        &self.alive
    }

    pub fn len(&self) -> usize {
        self.alive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }
}
