use std::collections::VecDeque;

use crate::{
    automaton::{Label, StateSet},
    math::Map,
    Nfa, StateIndex, Symbol,
};

/// Computes epsilon closures of states in an [`Nfa`]. The closure of a state is the set of all
/// states which can be reached from it by taking zero or more epsilon transitions, so it always
/// contains the state itself. Closures of individual states are memoized, which makes repeated
/// queries (as they occur in the subset construction) cheap.
#[derive(Clone)]
pub struct EpsilonClosures<'a, S> {
    nfa: &'a Nfa<S>,
    cache: Map<StateIndex, StateSet>,
}

impl<'a, S: Symbol> EpsilonClosures<'a, S> {
    /// Creates an empty cache of closures for `nfa`.
    pub fn new(nfa: &'a Nfa<S>) -> Self {
        Self {
            nfa,
            cache: Map::default(),
        }
    }

    /// Returns the epsilon closure of `state`.
    pub fn closure_of(&mut self, state: StateIndex) -> StateSet {
        if let Some(closure) = self.cache.get(&state) {
            return closure.clone();
        }
        let closure = self.explore(state);
        self.cache.insert(state, closure.clone());
        closure
    }

    /// Returns the union of the epsilon closures of all given states.
    pub fn closure_of_set<I: IntoIterator<Item = StateIndex>>(&mut self, states: I) -> StateSet {
        let mut closure = StateSet::new();
        for q in states {
            closure.extend(self.closure_of(q));
        }
        closure
    }

    /// Breadth-first search along epsilon transitions, every state enters the queue at most once.
    fn explore(&self, state: StateIndex) -> StateSet {
        let mut closure = StateSet::singleton(state);
        if self.nfa.successors(state, &Label::Epsilon).is_none() {
            return closure;
        }

        let mut queue = VecDeque::from([state]);
        while let Some(q) = queue.pop_front() {
            let Some(targets) = self.nfa.successors(q, &Label::Epsilon) else {
                continue;
            };
            for p in targets.iter() {
                if closure.insert(p) {
                    queue.push_back(p);
                }
            }
        }
        closure
    }
}
