use crate::index::{new_index, IndexedVec};
use crate::Set;

new_index!(pub index NodeId);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    P0,
    P1,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::P0 => Player::P1,
            Player::P1 => Player::P0,
        }
    }

    /// The player favoured by a priority: even priorities favour P0.
    pub fn from_priority(priority: usize) -> Player {
        match priority % 2 {
            0 => Player::P0,
            _ => Player::P1,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Player::P0 => 0,
            Player::P1 => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WinState {
    Unknown,
    Win0,
    Win1,
}

impl WinState {
    pub fn of(player: Player) -> WinState {
        match player {
            Player::P0 => WinState::Win0,
            Player::P1 => WinState::Win1,
        }
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            WinState::Unknown => None,
            WinState::Win0 => Some(Player::P0),
            WinState::Win1 => Some(Player::P1),
        }
    }
}

/// A parity game over dense vertex indices, together with its solution.
///
/// The graph part is fixed once built (except for self-loop removal by the
/// driver); the solution part only ever grows: once a vertex is won it stays
/// won by the same player with the same witness.
pub struct Game {
    pub priority: IndexedVec<NodeId, usize>,
    pub owner: IndexedVec<NodeId, Player>,
    pub succs: IndexedVec<NodeId, Vec<NodeId>>,
    pub preds: IndexedVec<NodeId, Vec<NodeId>>,

    pub win: IndexedVec<NodeId, WinState>,
    pub strategy: IndexedVec<NodeId, Option<NodeId>>,
}

impl Game {
    pub fn new() -> Game {
        Game {
            priority: IndexedVec::new(),
            owner: IndexedVec::new(),
            succs: IndexedVec::new(),
            preds: IndexedVec::new(),
            win: IndexedVec::new(),
            strategy: IndexedVec::new(),
        }
    }

    pub fn add_node(&mut self, owner: Player, priority: usize) -> NodeId {
        let n = self.priority.push(priority);
        self.owner.push(owner);
        self.succs.push(Vec::new());
        self.preds.push(Vec::new());
        self.win.push(WinState::Unknown);
        self.strategy.push(None);
        n
    }

    pub fn add_edge(&mut self, u: NodeId, v: NodeId) {
        self.succs[u].push(v);
        self.preds[v].push(u);
    }

    pub fn node_count(&self) -> usize {
        self.priority.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + DoubleEndedIterator {
        self.priority.indices()
    }

    pub fn edge_count(&self) -> usize {
        self.succs.iter().map(|succs| succs.len()).sum()
    }

    pub fn is_solved(&self, n: NodeId) -> bool {
        self.win[n] != WinState::Unknown
    }

    pub fn game_solved(&self) -> bool {
        self.win.iter().all(|&w| w != WinState::Unknown)
    }

    pub fn count_unsolved(&self) -> usize {
        self.win.iter().filter(|&&w| w == WinState::Unknown).count()
    }

    /// Give every vertex its own priority, preserving order and parity.
    pub fn inflate(&mut self) -> usize {
        self.remap(|p, _, new| match p % 2 == new % 2 {
            true => new + 2,
            false => new + 1,
        })
    }

    /// Remove unused priorities, keeping distinct priorities distinct.
    pub fn renumber(&mut self) -> usize {
        self.remap(|p, last, new| match () {
            _ if p == last => new,
            _ if p % 2 == new % 2 => new + 2,
            _ => new + 1,
        })
    }

    /// Collapse runs of same-parity priorities into a single priority.
    pub fn compress(&mut self) -> usize {
        self.remap(|p, _, new| match p % 2 == new % 2 {
            true => new,
            false => new + 1,
        })
    }

    // Walks the vertices in priority order and lets `step` pick the next
    // priority from (old priority, previous old priority, previous new
    // priority). Returns the number of distinct priorities afterwards.
    fn remap(&mut self, step: impl Fn(usize, usize, usize) -> usize) -> usize {
        let mut order = self.nodes().collect::<Vec<_>>();
        order.sort_by_key(|&v| self.priority[v]);

        let mut last = None;
        let mut current = 0;
        for v in order {
            let p = self.priority[v];
            current = match last {
                None => p % 2,
                Some(last) => step(p, last, current),
            };
            last = Some(p);
            self.priority[v] = current;
        }

        self.priority.iter().copied().collect::<Set<_>>().len()
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new()
    }
}
