use log::info;

use crate::game::{Game, NodeId};
use crate::index::IndexedVec;
use crate::zielonka::{Verdict, ZielonkaSolver, AUTO_REDUCE, MEMOIZE, QUICK_PRIORITY, ZIELONKA};

/// A solver takes the game restricted to the enabled vertices and returns a
/// verdict for every enabled vertex. Absorbing the verdicts into the game
/// solution is the driver's job.
pub trait Solver {
    fn run(&mut self, game: &Game, disabled: &IndexedVec<NodeId, bool>) -> IndexedVec<NodeId, Verdict>;

    /// Number of recursion frames visited by the last `run`.
    fn iterations(&self) -> usize;
}

pub struct SolverEntry {
    pub label: &'static str,
    pub description: &'static str,
    pub parallel: bool,
    constructor: Box<dyn Fn() -> Box<dyn Solver>>,
}

impl SolverEntry {
    pub fn construct(&self) -> Box<dyn Solver> {
        (self.constructor)()
    }
}

/// The registry of available solvers, selectable by label.
pub struct Solvers {
    entries: Vec<SolverEntry>,
}

impl Solvers {
    pub fn new() -> Solvers {
        let mut solvers = Solvers { entries: Vec::new() };
        solvers.add("ez", "Zielonka, quick priority", true, || {
            ZielonkaSolver::new(ZIELONKA | QUICK_PRIORITY)
        });
        solvers.add("ezm", "Zielonka, quick priority, memoization", true, || {
            ZielonkaSolver::new(ZIELONKA | QUICK_PRIORITY | MEMOIZE)
        });
        solvers.add("ep", "bounded precision", true, || ZielonkaSolver::new(0));
        solvers.add("epq", "bounded precision, quick priority", true, || {
            ZielonkaSolver::new(QUICK_PRIORITY)
        });
        solvers.add("epqm", "bounded precision, quick priority, memoization", true, || {
            ZielonkaSolver::new(QUICK_PRIORITY | MEMOIZE)
        });
        solvers.add("epm", "bounded precision, memoization", true, || {
            ZielonkaSolver::new(MEMOIZE)
        });
        solvers.add("epqa", "bounded precision, quick priority, auto reduce", true, || {
            ZielonkaSolver::new(QUICK_PRIORITY | AUTO_REDUCE)
        });
        solvers.add("epqma", "bounded precision, quick priority, memoization, auto reduce", true, || {
            ZielonkaSolver::new(QUICK_PRIORITY | MEMOIZE | AUTO_REDUCE)
        });
        solvers
    }

    pub fn add<S, F>(&mut self, label: &'static str, description: &'static str, parallel: bool, construct: F)
    where
        S: Solver + 'static,
        F: Fn() -> S + 'static,
    {
        self.entries.push(SolverEntry {
            label,
            description,
            parallel,
            constructor: Box::new(move || Box::new(construct())),
        });
    }

    pub fn get(&self, label: &str) -> Option<&SolverEntry> {
        self.entries.iter().find(|entry| entry.label == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SolverEntry> {
        self.entries.iter()
    }

    pub fn list(&self) {
        info!("List of solvers:");
        for entry in &self.entries {
            info!("* {}: {}", entry.label, entry.description);
        }
    }
}

impl Default for Solvers {
    fn default() -> Solvers {
        Solvers::new()
    }
}
