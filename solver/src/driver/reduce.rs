use std::collections::VecDeque;

use log::{info, trace};

use crate::game::{NodeId, Player};
use crate::index::IndexedVec;

use super::Driver;

// Visit state of a vertex across the trivial-cycle searches. `Seen` carries
// the root priority of the search that visited the vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
    Fresh,
    Skip,
    Seen(usize),
}

impl<'a> Driver<'a> {
    /// If every enabled vertex has the same priority parity, the favoured
    /// player wins everywhere with an arbitrary strategy. Returns whether the
    /// reduction applied.
    pub(crate) fn solve_single_parity(&mut self) -> bool {
        let mut parity = None;
        for i in 0..self.game.node_count() {
            let v = NodeId(i);
            if self.disabled[v] {
                continue;
            }
            let p = Player::from_priority(self.game.priority[v]);
            match parity {
                None => parity = Some(p),
                Some(q) if q == p => {}
                Some(_) => return false,
            }
        }
        let Some(winner) = parity else {
            // All vertices disabled.
            return false;
        };

        info!(
            "parity game only has parity {}",
            match winner {
                Player::P0 => "even",
                Player::P1 => "odd",
            }
        );

        for i in 0..self.game.node_count() {
            let v = NodeId(i);
            if self.disabled[v] {
                continue;
            }
            if self.game.owner[v] == winner {
                let to = self.game.succs[v].iter().copied().find(|&to| !self.disabled[to]);
                if let Some(to) = to {
                    self.solve(v, winner, Some(to));
                }
            } else {
                self.solve(v, winner, None);
            }
        }
        self.flush();
        true
    }

    /// Settle self-loops: a loop of the right parity wins for its owner, a
    /// lone loop of the wrong parity loses, any other wrong-parity loop is
    /// simply deleted. Returns the number of self-loops handled.
    pub(crate) fn solve_self_loops(&mut self) -> usize {
        let mut count = 0;
        for i in 0..self.game.node_count() {
            let v = NodeId(i);
            if self.disabled[v] {
                continue;
            }
            let Some(pos) = self.game.succs[v].iter().position(|&to| to == v) else {
                continue;
            };

            if self.game.owner[v] == Player::from_priority(self.game.priority[v]) {
                trace!("winning self-loop with priority {}", self.game.priority[v]);
                self.solve(v, self.game.owner[v], Some(v));
            } else if self.game.succs[v].len() == 1 {
                // The owner is stuck in a losing loop.
                self.solve(v, self.game.owner[v].opponent(), None);
            } else {
                self.game.succs[v].remove(pos);
                self.game.preds[v].retain(|&from| from != v);
                self.outcount[v] -= 1;
            }

            count += 1;
        }

        self.flush();
        count
    }

    /// Find all winner-controlled winning cycles: SCCs fully owned by one
    /// player whose highest priority favours that player. Each search is
    /// rooted at a vertex in descending index order and restricted to
    /// lower-indexed vertices of priority at most the root's. Returns the
    /// number of cycles settled.
    pub(crate) fn solve_trivial_cycles(&mut self) -> usize {
        let n = self.game.node_count();
        let mut count = 0;

        let mut done = IndexedVec::from(vec![Mark::Fresh; n]);
        for i in 0..n {
            if self.disabled[NodeId(i)] {
                done[NodeId(i)] = Mark::Skip;
            }
        }
        let mut low = IndexedVec::from(vec![0i64; n]);
        let mut pre = 0i64;

        let mut res: Vec<NodeId> = Vec::new();
        let mut scc: Vec<NodeId> = Vec::new();
        let mut st: Vec<NodeId> = Vec::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();

        for i in (0..n).rev().map(NodeId) {
            if self.disabled[i] {
                continue;
            }
            if done[i] == Mark::Skip {
                continue;
            }

            let pr = self.game.priority[i];
            let pl = Player::from_priority(pr);

            if self.game.owner[i] != pl {
                // Highest priority of any cycle through i, but not
                // winner-controlled: no point starting here ever again.
                done[i] = Mark::Skip;
                continue;
            }
            if done[i] == Mark::Seen(pr) {
                continue;
            }

            let bot = pre;
            st.push(i);
            while let Some(&idx) = st.last() {
                if low[idx] <= bot {
                    pre = pre.checked_add(1).expect("preorder counter overflow");
                    low[idx] = pre;
                    res.push(idx);
                }

                // Descend along enabled edges to lower-indexed vertices still
                // controlled by pl and not ruled out for this root.
                let mut min = low[idx];
                let mut pushed = false;
                for k in 0..self.game.succs[idx].len() {
                    let to = self.game.succs[idx][k];
                    if self.disabled[to] {
                        continue;
                    }
                    if to > i
                        || done[to] == Mark::Skip
                        || done[to] == Mark::Seen(pr)
                        || self.game.owner[to] != pl
                    {
                        continue;
                    }
                    if low[to] <= bot {
                        st.push(to);
                        pushed = true;
                        break;
                    }
                    min = min.min(low[to]);
                }
                if pushed {
                    continue;
                }

                if min < low[idx] {
                    // Not the root of an SCC.
                    low[idx] = min;
                    st.pop();
                    continue;
                }

                // idx roots an SCC: move it from res to scc, recording the
                // highest priority and the highest vertex of parity pl.
                let mut max_pr = 0;
                let mut best: Option<(usize, NodeId)> = None;
                loop {
                    let node = res.pop().expect("SCC root not on the preorder stack");
                    scc.push(node);
                    done[node] = Mark::Seen(pr);
                    low[node] = min;
                    let d = self.game.priority[node];
                    max_pr = max_pr.max(d);
                    if Player::from_priority(d) == pl && best.map_or(true, |(b, _)| d > b) {
                        best = Some((d, node));
                    }
                    if node == idx {
                        break;
                    }
                }

                // A singleton without a self-loop is no cycle at all.
                if scc.len() == 1 && !self.game.succs[idx].contains(&idx) {
                    done[idx] = Mark::Skip;
                    scc.clear();
                    st.pop();
                    continue;
                }

                if Player::from_priority(max_pr) != pl {
                    // The SCC will come up again in later searches, without
                    // the offending higher vertices.
                    for k in 0..scc.len() {
                        let node = scc[k];
                        if best.map_or(true, |(b, _)| self.game.priority[node] > b) {
                            done[node] = Mark::Skip;
                        }
                    }
                    scc.clear();
                    st.pop();
                    continue;
                }

                let (_, top) = best.expect("winning SCC has a vertex of the winning parity");
                trace!("winner-controlled scc with win priority {max_pr}");

                // Backward sweep within the SCC: everything reaching the top
                // vertex is won by pl with the edge it came in through.
                queue.push_back(top);
                while let Some(cur) = queue.pop_front() {
                    for k in 0..self.game.preds[cur].len() {
                        let from = self.game.preds[cur][k];
                        if low[from] != min || self.disabled[from] {
                            continue;
                        }
                        self.solve(from, pl, Some(cur));
                        queue.push_back(from);
                    }
                }
                self.flush();

                st.clear();
                res.clear();
                scc.clear();
                count += 1;
            }
        }

        count
    }
}
