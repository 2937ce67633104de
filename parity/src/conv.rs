use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use solver::game::{Game, NodeId};

use crate::ParityGame;

/// Build the dense solver game out of a parsed parity game, rejecting games
/// that are not total. Returns the game together with the mapping from the
/// file's vertex identifiers to the dense indices.
pub fn build_game(pg: &ParityGame) -> Result<(Game, HashMap<usize, NodeId>)> {
    let mut game = Game::new();

    let mut ids = HashMap::new();
    for node in &pg.nodes {
        let n = game.add_node(node.owner, node.priority);
        if ids.insert(node.id, n).is_some() {
            bail!("vertex {} is declared twice", node.id);
        }
    }

    for node in &pg.nodes {
        if node.successors.is_empty() {
            bail!("vertex {} has no outgoing edges", node.id);
        }
        let u = ids[&node.id];
        for &id in &node.successors {
            let &v = ids
                .get(&id)
                .with_context(|| format!("vertex {} has unknown successor {id}", node.id))?;
            game.add_edge(u, v);
        }
    }

    Ok((game, ids))
}
