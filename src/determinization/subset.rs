use std::{collections::VecDeque, fmt::Debug};

use tracing::{debug, trace};

use crate::{
    automaton::{Automaton, Label, StateSet},
    math::{Bijection, OrderedMap, OrderedSet},
    Dfa, Nfa, Show, StateIndex, Symbol,
};

use super::EpsilonClosures;

/// Represents the subset construction applied to an [`Nfa`]. Each state of the resulting [`Dfa`]
/// stands for a set of states of the `Nfa` that is closed under epsilon transitions. Sets are
/// discovered in breadth-first order starting from the epsilon closure of the initial state, which
/// becomes state `0`, and every newly discovered set receives the next free identifier.
///
/// If reading a symbol from some set leads nowhere, the move goes to [`StateSet::trap`]. This set
/// is numbered like every other one, it is non-accepting and all of its transitions loop back to
/// it. Consequently the constructed automaton is always complete.
pub struct SubsetConstruction<'a, S> {
    nfa: &'a Nfa<S>,
    closures: EpsilonClosures<'a, S>,
    subsets: Bijection<StateSet, StateIndex>,
    queue: VecDeque<StateIndex>,
    transitions: OrderedMap<StateIndex, OrderedMap<S, StateIndex>>,
    finals: OrderedSet<StateIndex>,
}

impl<'a, S: Symbol> SubsetConstruction<'a, S> {
    /// Prepares the subset construction for `nfa`.
    pub fn new(nfa: &'a Nfa<S>) -> Self {
        Self {
            nfa,
            closures: EpsilonClosures::new(nfa),
            subsets: Bijection::new(),
            queue: VecDeque::new(),
            transitions: OrderedMap::default(),
            finals: OrderedSet::default(),
        }
    }

    /// Explores all reachable sets of states and assembles the resulting [`Dfa`].
    pub fn run(mut self) -> Determinized<S> {
        let nfa = self.nfa;
        let start = self.closures.closure_of(nfa.initial());
        let initial = self.id_of(start);

        while let Some(id) = self.queue.pop_front() {
            let Some(set) = self.subsets.get_by_right(&id).cloned() else {
                unreachable!("every queued identifier belongs to a discovered set");
            };
            for symbol in nfa.alphabet() {
                let successor = self.successor_set(&set, symbol);
                let target = self.id_of(successor);
                self.transitions
                    .entry(id)
                    .or_default()
                    .insert(symbol.clone(), target);
            }
        }

        let size = self.subsets.len() as StateIndex;
        debug!(
            "subset construction turned NFA with {} states into DFA with {size} states",
            self.nfa.size()
        );

        let dfa = Dfa::from_model(Automaton::new_unchecked(
            (0..size).collect(),
            self.nfa.alphabet().to_vec(),
            self.transitions,
            initial,
            self.finals,
        ));
        Determinized {
            dfa,
            subsets: self.subsets,
        }
    }

    /// The epsilon closure of all states that can be reached from `set` by reading `symbol`. If
    /// there are none, or `set` is the trap set itself, this is the trap set.
    fn successor_set(&mut self, set: &StateSet, symbol: &S) -> StateSet {
        if set.is_trap() {
            return StateSet::trap();
        }
        let label = Label::Symbol(symbol.clone());
        let moved = set
            .iter()
            .filter_map(|q| self.nfa.successors(q, &label))
            .flat_map(|targets| targets.iter())
            .collect::<Vec<_>>();
        if moved.is_empty() {
            return StateSet::trap();
        }
        self.closures.closure_of_set(moved)
    }

    /// Returns the identifier of `set`, assigning a fresh one and queueing the set for
    /// exploration if it has not been seen before.
    fn id_of(&mut self, set: StateSet) -> StateIndex {
        if let Some(&id) = self.subsets.get_by_left(&set) {
            return id;
        }
        let id = self.subsets.len() as StateIndex;
        trace!("discovered subset {} as state {id}", set.show());
        if !set.is_trap() && set.intersects(self.nfa.finals()) {
            self.finals.insert(id);
        }
        self.subsets.insert(set, id);
        self.queue.push_back(id);
        id
    }
}

/// The outcome of the subset construction: a [`Dfa`] together with the set of states of the
/// original [`Nfa`] that each of its states stands for.
#[derive(Clone)]
pub struct Determinized<S> {
    dfa: Dfa<S>,
    subsets: Bijection<StateSet, StateIndex>,
}

impl<S: Symbol> Determinized<S> {
    /// The constructed automaton.
    pub fn dfa(&self) -> &Dfa<S> {
        &self.dfa
    }

    /// Consumes `self` and returns the constructed automaton.
    pub fn into_dfa(self) -> Dfa<S> {
        self.dfa
    }

    /// The set of states that `state` stands for.
    pub fn subset(&self, state: StateIndex) -> Option<&StateSet> {
        self.subsets.get_by_right(&state)
    }

    /// The state that stands for `set`, if the set was discovered.
    pub fn state_of(&self, set: &StateSet) -> Option<StateIndex> {
        self.subsets.get_by_left(set).copied()
    }

    /// The state that stands for the trap set, if it was reached.
    pub fn trap_state(&self) -> Option<StateIndex> {
        self.state_of(&StateSet::trap())
    }
}

impl<S: Symbol> Debug for Determinized<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Subset construction")?;
        for id in self.subsets.right_values() {
            if let Some(set) = self.subsets.get_by_right(id) {
                writeln!(f, "{} = {}", id.show(), set.show())?;
            }
        }
        write!(f, "{}", self.dfa)
    }
}
