use crate::{
    automaton::{Automaton, Label, StateSet},
    error::AutomatonError,
    math::{OrderedMap, OrderedSet},
    Dfa, Nfa, StateIndex, Symbol,
};

/// Helper struct for the construction of an [`Nfa`] from the data an external loader provides:
/// a list of states, an alphabet, transition triples, an initial state and final states.
/// Nothing is checked until [`NfaBuilder::build`] is called. If no initial state is given, state
/// `0` is used.
///
/// # Example
///
/// We want to create an NFA over the alphabet `['a', 'b']` which accepts all words that end
/// with `ab`. It guesses the position of the final `a` and then verifies the suffix.
/// ```
/// use determinize::prelude::*;
///
/// let nfa = Nfa::builder()
///     .with_states([0, 1, 2])
///     .with_alphabet(['a', 'b'])
///     .with_transitions([(0, 'a', 0), (0, 'b', 0), (0, 'a', 1), (1, 'b', 2)])
///     .with_initial(0)
///     .with_finals([2])
///     .build()
///     .unwrap();
/// assert!(nfa.accepts("abab".chars()));
/// assert!(!nfa.accepts("aba".chars()));
/// ```
#[derive(Debug, Clone)]
pub struct NfaBuilder<S> {
    states: Vec<StateIndex>,
    alphabet: Vec<S>,
    transitions: OrderedMap<StateIndex, OrderedMap<Label<S>, StateSet>>,
    initial: StateIndex,
    finals: OrderedSet<StateIndex>,
}

impl<S: Symbol> Default for NfaBuilder<S> {
    fn default() -> Self {
        Self {
            states: vec![],
            alphabet: vec![],
            transitions: OrderedMap::default(),
            initial: 0,
            finals: OrderedSet::default(),
        }
    }
}

impl<S: Symbol> NfaBuilder<S> {
    /// Declares the given states in addition to the ones declared before.
    pub fn with_states<I: IntoIterator<Item = StateIndex>>(mut self, states: I) -> Self {
        self.states.extend(states);
        self
    }

    /// Declares the given symbols in addition to the ones declared before.
    pub fn with_alphabet<I: IntoIterator<Item = S>>(mut self, symbols: I) -> Self {
        self.alphabet.extend(symbols);
        self
    }

    /// Adds transitions given as triples of origin, symbol and target.
    pub fn with_transitions<I: IntoIterator<Item = (StateIndex, S, StateIndex)>>(
        self,
        transitions: I,
    ) -> Self {
        self.with_moves(
            transitions
                .into_iter()
                .map(|(q, a, p)| (q, Label::Symbol(a), [p])),
        )
    }

    /// Adds an epsilon transition from `origin` to `target`.
    pub fn with_epsilon(self, origin: StateIndex, target: StateIndex) -> Self {
        self.with_moves([(origin, Label::Epsilon, [target])])
    }

    /// Adds transitions given as triples of origin, label and a collection of targets. Targets for
    /// the same origin and label accumulate.
    pub fn with_moves<I, T>(mut self, moves: I) -> Self
    where
        I: IntoIterator<Item = (StateIndex, Label<S>, T)>,
        T: IntoIterator<Item = StateIndex>,
    {
        for (q, label, targets) in moves {
            self.transitions
                .entry(q)
                .or_default()
                .entry(label)
                .or_default()
                .extend(targets);
        }
        self
    }

    /// Sets the initial state.
    pub fn with_initial(mut self, initial: StateIndex) -> Self {
        self.initial = initial;
        self
    }

    /// Marks the given states as final.
    pub fn with_finals<I: IntoIterator<Item = StateIndex>>(mut self, finals: I) -> Self {
        self.finals.extend(finals);
        self
    }

    /// Verifies the collected data and builds the [`Nfa`].
    pub fn build(self) -> Result<Nfa<S>, AutomatonError> {
        Automaton::new(
            self.states,
            self.alphabet,
            self.transitions,
            self.initial,
            self.finals,
            Label::symbol,
        )
        .map(Nfa::from_model)
    }
}

/// Helper struct for the construction of a [`Dfa`], see [`NfaBuilder`]. A transition that is
/// added for a state and symbol which already have one replaces the earlier transition. Missing
/// transitions are allowed, they implicitly lead to the trap state.
#[derive(Debug, Clone)]
pub struct DfaBuilder<S> {
    states: Vec<StateIndex>,
    alphabet: Vec<S>,
    transitions: OrderedMap<StateIndex, OrderedMap<S, StateIndex>>,
    initial: StateIndex,
    finals: OrderedSet<StateIndex>,
}

impl<S: Symbol> Default for DfaBuilder<S> {
    fn default() -> Self {
        Self {
            states: vec![],
            alphabet: vec![],
            transitions: OrderedMap::default(),
            initial: 0,
            finals: OrderedSet::default(),
        }
    }
}

impl<S: Symbol> DfaBuilder<S> {
    /// Declares the given states in addition to the ones declared before.
    pub fn with_states<I: IntoIterator<Item = StateIndex>>(mut self, states: I) -> Self {
        self.states.extend(states);
        self
    }

    /// Declares the given symbols in addition to the ones declared before.
    pub fn with_alphabet<I: IntoIterator<Item = S>>(mut self, symbols: I) -> Self {
        self.alphabet.extend(symbols);
        self
    }

    /// Adds transitions given as triples of origin, symbol and target.
    pub fn with_transitions<I: IntoIterator<Item = (StateIndex, S, StateIndex)>>(
        mut self,
        transitions: I,
    ) -> Self {
        for (q, a, p) in transitions {
            self.transitions.entry(q).or_default().insert(a, p);
        }
        self
    }

    /// Sets the initial state.
    pub fn with_initial(mut self, initial: StateIndex) -> Self {
        self.initial = initial;
        self
    }

    /// Marks the given states as final.
    pub fn with_finals<I: IntoIterator<Item = StateIndex>>(mut self, finals: I) -> Self {
        self.finals.extend(finals);
        self
    }

    /// Verifies the collected data and builds the [`Dfa`].
    pub fn build(self) -> Result<Dfa<S>, AutomatonError> {
        Automaton::new(
            self.states,
            self.alphabet,
            self.transitions,
            self.initial,
            self.finals,
            |a| Some(a),
        )
        .map(Dfa::from_model)
    }
}
