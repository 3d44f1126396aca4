use std::{borrow::Borrow, collections::VecDeque, fmt::Debug};

use tracing::trace;

use crate::{
    automaton::{Automaton, FiniteAutomaton},
    builder::DfaBuilder,
    error::AutomatonError,
    export::Export,
    math::{OrderedMap, Set},
    StateIndex, Symbol, TRAP,
};

/// A deterministic finite automaton. Every pair of state and symbol has at most one successor,
/// a missing successor is interpreted as a move into the (non-accepting) trap state. Automata
/// produced by the subset construction are always complete, i.e. every state has a transition
/// on every symbol.
#[derive(Clone, PartialEq, Eq)]
pub struct Dfa<S = char> {
    model: Automaton<S, S, StateIndex>,
}

impl<S: Symbol> Dfa<S> {
    /// Returns a builder for assembling a `Dfa`.
    pub fn builder() -> DfaBuilder<S> {
        DfaBuilder::default()
    }

    pub(crate) fn from_model(model: Automaton<S, S, StateIndex>) -> Self {
        Self { model }
    }

    /// Reconstructs a `Dfa` from an [`Export`], verifying it on the way.
    pub fn from_export(export: Export<S, S, StateIndex>) -> Result<Self, AutomatonError> {
        Automaton::new(
            export.states,
            export.alphabet,
            export.transitions,
            export.initial,
            export.finals,
            |a| Some(a),
        )
        .map(Self::from_model)
    }

    /// The successor of `state` on `symbol`, if there is an explicit transition.
    pub fn successor(&self, state: StateIndex, symbol: &S) -> Option<StateIndex> {
        self.model.target(state, symbol).copied()
    }

    /// Returns the first pair of state and symbol (in declaration order) that has no transition,
    /// or `None` if the transition function is total.
    pub fn missing_transition(&self) -> Option<(StateIndex, &S)> {
        self.model.states().iter().find_map(|&q| {
            self.model
                .alphabet()
                .iter()
                .find(|&a| self.successor(q, a).is_none())
                .map(|a| (q, a))
        })
    }

    /// Returns true if every state has a transition on every symbol.
    pub fn is_complete(&self) -> bool {
        self.missing_transition().is_none()
    }

    /// Returns an equivalent complete `Dfa`. If `self` is already complete, this is just a copy,
    /// otherwise a new non-accepting state is added which loops on every symbol, and all missing
    /// transitions are redirected to it. The new state receives the smallest identifier that is
    /// not yet in use.
    pub fn complete(&self) -> Self {
        if self.is_complete() {
            return self.clone();
        }

        let used: Set<StateIndex> = self.model.states().iter().copied().collect();
        let sink = (0..TRAP).find(|q| !used.contains(q)).unwrap_or(TRAP);
        trace!("completing DFA with sink state {sink}");

        let mut states = self.model.states().to_vec();
        states.push(sink);
        let mut transitions = self.model.transitions().clone();
        for &q in &states {
            let edges = transitions.entry(q).or_insert_with(OrderedMap::default);
            for a in self.model.alphabet() {
                edges.entry(a.clone()).or_insert(sink);
            }
        }

        Self::from_model(Automaton::new_unchecked(
            states,
            self.model.alphabet().to_vec(),
            transitions,
            self.model.initial(),
            self.model.finals().clone(),
        ))
    }

    /// Returns the states that are reachable from the initial state, in breadth-first order.
    pub fn reachable_states(&self) -> Vec<StateIndex> {
        let mut seen = Set::from_iter([self.model.initial()]);
        let mut order = vec![self.model.initial()];
        let mut queue = VecDeque::from([self.model.initial()]);
        while let Some(q) = queue.pop_front() {
            for a in self.model.alphabet() {
                if let Some(p) = self.successor(q, a) {
                    if seen.insert(p) {
                        order.push(p);
                        queue.push_back(p);
                    }
                }
            }
        }
        order
    }

    /// Removes all states that are not reachable from the initial state. The remaining states
    /// keep their identifiers and declaration order.
    pub fn trim(&self) -> Self {
        let reachable: Set<StateIndex> = self.reachable_states().into_iter().collect();
        let states = self
            .model
            .states()
            .iter()
            .copied()
            .filter(|q| reachable.contains(q))
            .collect();
        let transitions = self
            .model
            .transitions()
            .iter()
            .filter(|(q, _)| reachable.contains(*q))
            .map(|(q, edges)| (*q, edges.clone()))
            .collect();
        let finals = self
            .model
            .finals()
            .iter()
            .copied()
            .filter(|q| reachable.contains(q))
            .collect();

        Self::from_model(Automaton::new_unchecked(
            states,
            self.model.alphabet().to_vec(),
            transitions,
            self.model.initial(),
            finals,
        ))
    }
}

impl<S: Symbol> FiniteAutomaton for Dfa<S> {
    type Symbol = S;
    type Label = S;
    type Target = StateIndex;

    const DETERMINISTIC: bool = true;

    fn model(&self) -> &Automaton<S, S, StateIndex> {
        &self.model
    }

    /// Runs `word` from the initial state. The word is rejected as soon as a transition is
    /// missing, otherwise it is accepted if and only if the reached state is final.
    fn accepts<W, B>(&self, word: W) -> bool
    where
        W: IntoIterator<Item = B>,
        B: Borrow<S>,
    {
        self.run(word).is_accepting()
    }
}

impl<S> std::ops::Deref for Dfa<S> {
    type Target = Automaton<S, S, StateIndex>;
    fn deref(&self) -> &Self::Target {
        &self.model
    }
}

impl<S: Symbol> Debug for Dfa<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DFA\n{}", self)
    }
}

impl<S: Symbol> std::fmt::Display for Dfa<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.model.transition_table(self.model.alphabet().iter().cloned())
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    /// Accepts the words over {0, 1} that end with 1.
    fn ends_with_one() -> Dfa {
        Dfa::builder()
            .with_states([0, 1])
            .with_alphabet(['0', '1'])
            .with_transitions([(0, '0', 0), (0, '1', 1), (1, '0', 0), (1, '1', 1)])
            .with_initial(0)
            .with_finals([1])
            .build()
            .unwrap()
    }

    fn partial() -> Dfa {
        Dfa::builder()
            .with_states([0, 1])
            .with_alphabet(['a', 'b'])
            .with_transitions([(0, 'a', 1), (1, 'b', 0)])
            .with_initial(0)
            .with_finals([1])
            .build()
            .unwrap()
    }

    #[test]
    fn acceptance() {
        let dfa = ends_with_one();
        assert!(dfa.is_deterministic());
        assert!(dfa.accepts("1".chars()));
        assert!(dfa.accepts("0101".chars()));
        assert!(!dfa.accepts("".chars()));
        assert!(!dfa.accepts("10".chars()));
        // symbols outside of the alphabet have no transition
        assert!(!dfa.accepts("12".chars()));
    }

    #[test]
    fn missing_transitions_reject() {
        let dfa = partial();
        assert!(!dfa.is_complete());
        assert_eq!(dfa.missing_transition(), Some((0, &'b')));
        assert!(dfa.accepts("a".chars()));
        assert!(dfa.accepts("aba".chars()));
        assert!(!dfa.accepts("b".chars()));
        assert!(!dfa.accepts("aa".chars()));
    }

    #[test]
    fn completion_preserves_language() {
        let dfa = partial();
        let complete = dfa.complete();
        assert!(complete.is_complete());
        assert_eq!(complete.size(), 3);
        assert_eq!(complete.successor(0, &'b'), Some(2));
        assert_eq!(complete.successor(2, &'a'), Some(2));
        assert!(!complete.is_final(2));
        for word in words_up_to(dfa.alphabet(), 5) {
            assert_eq!(dfa.accepts(&word), complete.accepts(&word));
        }
        assert_eq!(ends_with_one().complete(), ends_with_one());
    }

    #[test]
    fn trimming_removes_unreachable_states() {
        let dfa = Dfa::builder()
            .with_states([3, 0, 1, 2])
            .with_alphabet(['a'])
            .with_transitions([(0, 'a', 1), (1, 'a', 0), (2, 'a', 0), (3, 'a', 2)])
            .with_initial(0)
            .with_finals([1, 2])
            .build()
            .unwrap();
        assert_eq!(dfa.reachable_states(), vec![0, 1]);
        let trimmed = dfa.trim();
        assert_eq!(trimmed.states(), &[0, 1]);
        assert_eq!(trimmed.finals().len(), 1);
        assert!(trimmed.edges_from(2).is_none());
    }
}
