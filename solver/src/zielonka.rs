use log::debug;

use crate::game::{Game, NodeId, Player};
use crate::index::IndexedVec;
use crate::registry::Solver;
use crate::Map;

pub const ZIELONKA: u32 = 1;
pub const MEMOIZE: u32 = 2;
pub const QUICK_PRIORITY: u32 = 4;
pub const AUTO_REDUCE: u32 = 8;

/// Per-vertex outcome of a recursion frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Not decided yet in this frame.
    Unknown,
    /// The owner loses this vertex.
    Losing,
    /// The owner wins no matter which edge it takes.
    WinningAnywhere,
    /// The owner wins by moving to this successor.
    WinningTo(NodeId),
}

impl Verdict {
    pub fn is_win(self) -> bool {
        matches!(self, Verdict::WinningAnywhere | Verdict::WinningTo(_))
    }
}

// Tag marking the role of a vertex in a recursion frame. Fresh tags come from
// a counter on the solver so sibling frames never collide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Category(usize);

// The four recursion modes: the bounded-precision algorithm visits a frame up
// to three times (shrunk budget, full budget, shrunk budget again), while
// Classic runs the plain Zielonka recursion and ignores the budgets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Pass {
    First,
    Second,
    Third,
    Classic,
}

/// Recursive attractor-based solver, either classic Zielonka or the
/// bounded-precision variant, selected by the flag bits above.
pub struct ZielonkaSolver {
    flags: u32,
    iterations: usize,
}

impl ZielonkaSolver {
    pub fn new(flags: u32) -> ZielonkaSolver {
        ZielonkaSolver { flags, iterations: 0 }
    }
}

impl Solver for ZielonkaSolver {
    fn run(&mut self, game: &Game, disabled: &IndexedVec<NodeId, bool>) -> IndexedVec<NodeId, Verdict> {
        let mut zielonka = Zielonka::new(game, self.flags);

        let cat_base = zielonka.new_category();
        let mut vset = Vec::new();
        for v in game.nodes() {
            if !disabled[v] {
                zielonka.vtype[v] = cat_base;
                vset.push(v);
            }
        }

        if vset.is_empty() {
            return zielonka.strategy;
        }

        let mut precision = 0;
        while (1usize << precision) < game.node_count() {
            precision += 1;
        }

        let maxprio = vset.iter().map(|&v| game.priority[v]).max().unwrap();

        debug!(
            "solving {} vertices, initial precision {precision}, max priority {maxprio}",
            vset.len()
        );

        let pass = match self.flags & ZIELONKA {
            0 => Pass::First,
            _ => Pass::Classic,
        };
        let mprio = match self.flags & QUICK_PRIORITY {
            0 => Some(maxprio),
            _ => None,
        };
        zielonka.solve(&vset, cat_base, [precision, precision], pass, mprio);

        debug!("solved in {} iterations", zielonka.iterations);

        self.iterations = zielonka.iterations;
        zielonka.strategy
    }

    fn iterations(&self) -> usize {
        self.iterations
    }
}

pub(crate) struct Zielonka<'a> {
    game: &'a Game,
    flags: u32,
    pub(crate) iterations: usize,

    pub(crate) vtype: IndexedVec<NodeId, Category>,
    pub(crate) strategy: IndexedVec<NodeId, Verdict>,
    // Residual degrees during an attractor computation; None outside of it.
    degs: IndexedVec<NodeId, Option<usize>>,

    next_category: usize,
    memo: Map<([usize; 2], Vec<NodeId>), Vec<Verdict>>,
}

impl<'a> Zielonka<'a> {
    pub(crate) fn new(game: &'a Game, flags: u32) -> Zielonka<'a> {
        let n = game.node_count();
        Zielonka {
            game,
            flags,
            iterations: 0,
            vtype: IndexedVec::from(vec![Category(0); n]),
            strategy: IndexedVec::from(vec![Verdict::Unknown; n]),
            degs: IndexedVec::from(vec![None; n]),
            next_category: 1,
            memo: Map::default(),
        }
    }

    pub(crate) fn new_category(&mut self) -> Category {
        self.next_category += 1;
        Category(self.next_category - 1)
    }

    /// Compute `player`'s attractor to the `cat_yes` vertices inside the
    /// subgame `vs`.
    ///
    /// Precondition: `vtype[v]` is `cat_no` or `cat_yes` iff `v` is in `vs`.
    /// Every vertex of `vs` from which `player` can force the play into the
    /// initial `cat_yes` set without leaving `vs` is relabeled `cat_yes`, and
    /// its strategy is set to a witness edge into the growing attractor if
    /// `player` owns it, `Losing` otherwise. Vertices outside `vs` are
    /// untouched.
    pub(crate) fn attractor(
        &mut self,
        vs: &[NodeId],
        player: Player,
        cat_no: Category,
        cat_yes: Category,
    ) {
        let mut queue = Vec::new();
        for &v in vs {
            if self.vtype[v] == cat_yes {
                queue.push(v);
            } else if self.game.owner[v] == player {
                // One edge into the attractor suffices for the player.
                self.degs[v] = Some(1);
            } else {
                // The opponent must be unable to stay out, so every in-subgame
                // successor has to lead into the attractor.
                let count = self.game.succs[v]
                    .iter()
                    .filter(|&&w| self.vtype[w] == cat_no || self.vtype[w] == cat_yes)
                    .count();
                self.degs[v] = Some(count);
            }
        }

        // Invariant: degs[v] counts the successors of v that still need to be
        // proven to lead into the attractor before v joins it as well.
        let mut i = 0;
        while i < queue.len() {
            let v = queue[i];
            i += 1;
            for k in 0..self.game.preds[v].len() {
                let u = self.game.preds[v][k];
                match self.degs[u] {
                    Some(1) => {
                        self.degs[u] = None;
                        self.vtype[u] = cat_yes;
                        self.strategy[u] = match self.game.owner[u] == player {
                            true => Verdict::WinningTo(v),
                            false => Verdict::Losing,
                        };
                        queue.push(u);
                    }
                    Some(deg) if deg > 1 => self.degs[u] = Some(deg - 1),
                    _ => {}
                }
            }
        }

        for &v in vs {
            self.degs[v] = None;
        }
    }

    /// Solve the subgame `vs`.
    ///
    /// Precondition: `vtype[v]` is `cat_base` iff `v` is in `vs`. On return
    /// `strategy[v]` holds a winning verdict for every `v` in `vs`; `vtype`
    /// and `strategy` outside of `vs` are unchanged. `mprio` is the maximum
    /// priority of the frame if already known, otherwise `vs` is scanned.
    pub(crate) fn solve(
        &mut self,
        vs: &[NodeId],
        cat_base: Category,
        precision: [usize; 2],
        pass: Pass,
        mprio: Option<usize>,
    ) {
        let memoize = self.flags & MEMOIZE != 0;
        if memoize {
            if let Some(memoed) = self.memo.get(&(precision, vs.to_vec())) {
                for (i, &v) in vs.iter().enumerate() {
                    self.strategy[v] = memoed[i];
                }
                return;
            }
        }

        self.iterations += 1;
        if vs.is_empty() {
            return;
        }

        let maxprio = match mprio {
            Some(p) => p,
            None => vs.iter().map(|&v| self.game.priority[v]).max().unwrap(),
        };
        let us = Player::from_priority(maxprio);
        let opponent = us.opponent();

        // Out of budget for us: concede the whole frame to the opponent.
        if pass != Pass::Classic && precision[us.index()] == 0 {
            for &v in vs {
                self.strategy[v] = match self.game.owner[v] == us {
                    true => Verdict::Losing,
                    false => Verdict::WinningAnywhere,
                };
            }
            return;
        }

        let cat_hiprio = self.new_category();
        for &v in vs {
            if self.game.priority[v] == maxprio {
                self.vtype[v] = cat_hiprio;
                self.strategy[v] = Verdict::Unknown;
            }
        }

        self.attractor(vs, us, cat_base, cat_hiprio);

        let mut subprecision = precision;
        if let Pass::First | Pass::Third = pass {
            subprecision[opponent.index()] -= 1;
        }

        let subgame = vs.iter().copied().filter(|&v| self.vtype[v] == cat_base).collect::<Vec<_>>();

        if pass != Pass::Classic && subprecision[opponent.index()] == 0 {
            // The opponent's budget is exhausted: assume we win the subgame.
            for &v in vs {
                self.strategy[v] = match self.game.owner[v] == us {
                    true => Verdict::WinningAnywhere,
                    false => Verdict::Losing,
                };
            }
        } else {
            let subpass = match pass {
                Pass::Classic => Pass::Classic,
                _ => Pass::First,
            };
            self.solve(&subgame, cat_base, subprecision, subpass, maxprio.checked_sub(1));
        }

        // Partition the subgame by the recursive verdict.
        let cat_opponent = self.new_category();
        let mut subgame_won = true;
        for &v in &subgame {
            let opponent_won = match self.game.owner[v] == us {
                true => self.strategy[v] == Verdict::Losing,
                false => self.strategy[v].is_win(),
            };
            if opponent_won {
                self.vtype[v] = cat_opponent;
                subgame_won = false;
            } else {
                self.vtype[v] = cat_hiprio;
            }
        }

        if subgame_won {
            if pass == Pass::First {
                // Revisit the frame with the full budget.
                self.solve(vs, cat_hiprio, precision, Pass::Second, mprio);
                return;
            }

            // The high-priority layer has no strategy yet: any edge that
            // stays in the frame will do for us, the opponent loses.
            for &v in vs {
                if self.game.priority[v] != maxprio {
                    continue;
                }
                if self.game.owner[v] == us {
                    for &e in &self.game.succs[v] {
                        if self.vtype[e] == cat_hiprio {
                            self.strategy[v] = Verdict::WinningTo(e);
                        }
                    }
                } else {
                    self.strategy[v] = Verdict::Losing;
                }
            }

            if memoize {
                self.record(precision, vs);
            }
            return;
        }

        // The opponent's foothold extends to its attractor; solve what is
        // left of the frame without them.
        self.attractor(vs, opponent, cat_hiprio, cat_opponent);

        let subgame = vs.iter().copied().filter(|&v| self.vtype[v] == cat_hiprio).collect::<Vec<_>>();
        let subpass = match pass {
            Pass::Second => Pass::Third,
            _ => pass,
        };
        self.solve(&subgame, cat_hiprio, precision, subpass, mprio);

        if memoize {
            self.record(precision, vs);
        }
    }

    fn record(&mut self, precision: [usize; 2], vs: &[NodeId]) {
        let strategies = vs.iter().map(|&v| self.strategy[v]).collect();
        self.memo.insert((precision, vs.to_vec()), strategies);
    }
}
