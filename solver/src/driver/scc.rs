use crate::game::NodeId;
use crate::index::IndexedVec;

use super::Driver;

impl<'a> Driver<'a> {
    /// Find a bottom SCC of the unsolved subgame: the first SCC completed by
    /// a depth-first search has no edges into other unfinished components, so
    /// it is a sink of the component graph.
    pub(crate) fn bottom_scc(&self) -> Vec<NodeId> {
        let game = &*self.game;
        let mut low = IndexedVec::from(vec![0i64; game.node_count()]);
        let mut pre = 0i64;

        let mut res: Vec<NodeId> = Vec::new();
        let mut st: Vec<NodeId> = Vec::new();

        let start = game
            .nodes()
            .find(|&v| !self.disabled[v])
            .expect("no unsolved vertex left");
        st.push(start);

        while let Some(&idx) = st.last() {
            if low[idx] == 0 {
                pre = pre.checked_add(1).expect("preorder counter overflow");
                low[idx] = pre;
                res.push(idx);
            }

            let mut min = low[idx];
            let mut pushed = false;
            for &to in &game.succs[idx] {
                if self.disabled[to] {
                    continue;
                }
                if low[to] == 0 {
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
                low[idx] = min;
                st.pop();
                continue;
            }

            // idx roots the first completed SCC.
            let at = res.iter().rposition(|&v| v == idx).expect("SCC root not on the preorder stack");
            return res.split_off(at);
        }

        unreachable!("a total subgame always contains a cycle")
    }
}
