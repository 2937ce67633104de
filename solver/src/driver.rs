mod reduce;
mod scc;

use std::collections::VecDeque;

use log::{debug, info};

use crate::game::{Game, NodeId, Player, WinState};
use crate::index::IndexedVec;
use crate::registry::Solvers;
use crate::zielonka::Verdict;

/// Optional priority remapping applied before solving.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reindex {
    Inflate,
    Compress,
    Renumber,
}

/// Drives a game to a full solution: applies the one-shot reductions, then
/// repeatedly runs the configured solver on the remaining subgame and
/// propagates its verdicts through the attractor closure.
pub struct Driver<'a> {
    pub(crate) game: &'a mut Game,

    // Mask hiding solved vertices from the solver; synced to the solution at
    // the top of every iteration, then possibly narrowed to a bottom SCC.
    pub(crate) disabled: IndexedVec<NodeId, bool>,
    // Number of still-enabled outgoing edges per vertex; when it drops to
    // zero for a loser the vertex is forced into the winning region.
    pub(crate) outcount: IndexedVec<NodeId, usize>,
    pub(crate) flushed: IndexedVec<NodeId, bool>,
    pub(crate) todo: VecDeque<NodeId>,

    /// Label of the solver to run, looked up in the registry.
    pub solver: Option<String>,
    pub reindex: Option<Reindex>,
    pub solve_single: bool,
    pub remove_loops: bool,
    pub remove_cycles: bool,
    pub bottom_scc: bool,
}

impl<'a> Driver<'a> {
    pub fn new(game: &'a mut Game) -> Driver<'a> {
        let n = game.node_count();
        let outcount = game.succs.iter().map(|succs| succs.len()).collect();
        Driver {
            game,
            disabled: IndexedVec::from(vec![false; n]),
            outcount,
            flushed: IndexedVec::from(vec![false; n]),
            todo: VecDeque::new(),
            solver: None,
            reindex: None,
            solve_single: true,
            remove_loops: true,
            remove_cycles: true,
            bottom_scc: false,
        }
    }

    /// Solve the whole game. On return every vertex is won by one of the two
    /// players, with a witness edge wherever the owner is the winner, unless
    /// no solver is configured (then only the reductions run).
    pub fn run(&mut self) {
        match self.reindex {
            Some(Reindex::Inflate) => {
                let d = self.game.inflate();
                info!("parity game inflated ({d} priorities)");
            }
            Some(Reindex::Compress) => {
                let d = self.game.compress();
                info!("parity game compressed ({d} priorities)");
            }
            Some(Reindex::Renumber) => {
                let d = self.game.renumber();
                info!("parity game renumbered ({d} priorities)");
            }
            None => {}
        }

        if self.solve_single && self.solve_single_parity() {
            return;
        }

        if self.remove_loops {
            match self.solve_self_loops() {
                0 => info!("no self-loops removed"),
                1 => info!("1 self-loop removed"),
                n => info!("{n} self-loops removed"),
            }
        }

        if self.remove_cycles {
            match self.solve_trivial_cycles() {
                0 => info!("no trivial cycles removed"),
                1 => info!("1 trivial cycle removed"),
                n => info!("{n} trivial cycles removed"),
            }
        }

        let Some(label) = self.solver.clone() else {
            info!("no solver selected");
            return;
        };
        self.solve_loop(&label);
    }

    fn solve_loop(&mut self, label: &str) {
        let solvers = Solvers::new();
        let Some(entry) = solvers.get(label) else {
            info!("unknown solver {label:?}");
            return;
        };

        info!("solving using {}", entry.description);
        if entry.parallel {
            debug!("solver is parallel-capable, running it sequentially");
        }

        while !self.game.game_solved() {
            // Hide all solved vertices from the solver.
            for i in 0..self.game.node_count() {
                self.disabled[NodeId(i)] = self.game.is_solved(NodeId(i));
            }

            if self.bottom_scc {
                let scc = self.bottom_scc();
                info!(
                    "solving bottom SCC of {} nodes ({} nodes left)",
                    scc.len(),
                    self.game.count_unsolved()
                );
                for i in 0..self.game.node_count() {
                    self.disabled[NodeId(i)] = true;
                }
                for &v in &scc {
                    self.disabled[v] = false;
                }
            }

            let unsolved = self.game.count_unsolved();

            let mut solver = entry.construct();
            let verdicts = solver.run(self.game, &self.disabled);
            self.absorb(&verdicts);

            self.flush();

            if self.game.count_unsolved() == unsolved {
                // Every verdict was a witness-less concession, so neither the
                // absorption nor the flush made progress. Fall back to
                // arbitrary witnesses to keep the loop moving.
                self.absorb_conceded(&verdicts);
                self.flush();
            }

            if !self.bottom_scc {
                info!("{} nodes left", self.game.count_unsolved());
            }
        }
    }

    // Turn the solver's verdicts into solved vertices. Vertices that are
    // winning without a concrete witness are skipped here: the flush pulls
    // them in behind the solved part of their region with a real edge.
    fn absorb(&mut self, verdicts: &IndexedVec<NodeId, Verdict>) {
        for i in 0..self.game.node_count() {
            let v = NodeId(i);
            if self.game.is_solved(v) || self.disabled[v] {
                continue;
            }
            let owner = self.game.owner[v];
            match verdicts[v] {
                Verdict::WinningTo(to) => self.solve(v, owner, Some(to)),
                Verdict::WinningAnywhere => {}
                Verdict::Losing | Verdict::Unknown => self.solve(v, owner.opponent(), None),
            }
        }
    }

    fn absorb_conceded(&mut self, verdicts: &IndexedVec<NodeId, Verdict>) {
        for i in 0..self.game.node_count() {
            let v = NodeId(i);
            if self.game.is_solved(v) || self.disabled[v] {
                continue;
            }
            if verdicts[v] == Verdict::WinningAnywhere {
                let to = self.game.succs[v].iter().copied().find(|&to| !self.disabled[to]);
                self.solve(v, self.game.owner[v], to);
            }
        }
    }

    /// Mark a vertex as won by `winner`, with the witness edge `strategy` if
    /// the winner owns it. Solving a vertex twice is a logic error.
    pub(crate) fn solve(&mut self, node: NodeId, winner: Player, strategy: Option<NodeId>) {
        if self.game.is_solved(node) || self.disabled[node] {
            panic!("vertex {node:?} is already solved");
        }

        self.game.win[node] = WinState::of(winner);
        self.game.strategy[node] = match winner == self.game.owner[node] {
            true => strategy,
            false => None,
        };
        self.disabled[node] = true;
        self.todo.push_back(node);
    }

    /// Propagate solved vertices backwards: a predecessor owned by the winner
    /// follows the edge in, a predecessor of the loser is absorbed once its
    /// last enabled edge is gone.
    pub(crate) fn flush(&mut self) {
        while let Some(v) = self.todo.pop_front() {
            if self.flushed[v] {
                continue;
            }
            self.flushed[v] = true;

            let winner = self.game.win[v].winner().expect("flushing an unsolved vertex");

            for k in 0..self.game.preds[v].len() {
                let u = self.game.preds[v][k];
                if self.game.is_solved(u) {
                    continue;
                }
                if self.game.owner[u] == winner {
                    self.game.strategy[u] = Some(v);
                    self.game.win[u] = WinState::of(winner);
                    self.disabled[u] = true;
                    self.todo.push_back(u);
                } else {
                    self.outcount[u] -= 1;
                    if self.outcount[u] == 0 {
                        self.game.win[u] = WinState::of(winner);
                        self.disabled[u] = true;
                        self.todo.push_back(u);
                    }
                }
            }
        }
    }
}
