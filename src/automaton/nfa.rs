use std::{borrow::Borrow, fmt::Debug, sync::OnceLock};

use tracing::debug;

use crate::{
    automaton::{Automaton, FiniteAutomaton, Label, StateSet},
    builder::NfaBuilder,
    determinization::{Determinized, EpsilonClosures, SubsetConstruction},
    error::AutomatonError,
    export::Export,
    Dfa, StateIndex, Symbol,
};

/// A nondeterministic finite automaton. Transitions lead to a [`StateSet`] and may be labeled
/// with [`Label::Epsilon`]. A missing transition simply means that there is no such move.
///
/// An `Nfa` is immutable once it is built. The only exception is the equivalent [`Dfa`], which is
/// computed through the subset construction the first time it is needed (e.g. by
/// [`FiniteAutomaton::accepts`]) and reused afterwards. The cache is filled at most once, even if
/// several threads query the same `Nfa` concurrently.
#[derive(Clone)]
pub struct Nfa<S = char> {
    model: Automaton<S, Label<S>, StateSet>,
    dfa: OnceLock<Dfa<S>>,
}

impl<S: Symbol> Nfa<S> {
    /// Returns a builder for assembling an `Nfa`.
    pub fn builder() -> NfaBuilder<S> {
        NfaBuilder::default()
    }

    pub(crate) fn from_model(model: Automaton<S, Label<S>, StateSet>) -> Self {
        Self {
            model,
            dfa: OnceLock::new(),
        }
    }

    /// Reconstructs an `Nfa` from an [`Export`], verifying it on the way.
    pub fn from_export(export: Export<S, Label<S>, StateSet>) -> Result<Self, AutomatonError> {
        Automaton::new(
            export.states,
            export.alphabet,
            export.transitions,
            export.initial,
            export.finals,
            Label::symbol,
        )
        .map(Self::from_model)
    }

    /// The states that are reached from `state` by following a transition labeled `label`,
    /// without taking epsilon closures into account.
    pub fn successors(&self, state: StateIndex, label: &Label<S>) -> Option<&StateSet> {
        self.model.target(state, label)
    }

    /// Computes the epsilon closure of `state`, i.e. all states that are reachable from `state`
    /// by taking zero or more epsilon transitions. The result always contains `state`.
    pub fn epsilon_closure(&self, state: StateIndex) -> StateSet {
        EpsilonClosures::new(self).closure_of(state)
    }

    /// Computes the union of the epsilon closures of all `states`.
    pub fn epsilon_closure_of<I: IntoIterator<Item = StateIndex>>(&self, states: I) -> StateSet {
        EpsilonClosures::new(self).closure_of_set(states)
    }

    /// Runs the subset construction, returning the resulting [`Dfa`] together with the set of
    /// states of `self` that each of its states stands for. This does not use or fill the cache.
    pub fn determinize(&self) -> Determinized<S> {
        SubsetConstruction::new(self).run()
    }

    /// Builds an equivalent [`Dfa`] through the subset construction. The result is independent
    /// of the cached automaton that [`Nfa::dfa`] returns.
    pub fn to_dfa(&self) -> Dfa<S> {
        self.determinize().into_dfa()
    }

    /// Returns the equivalent [`Dfa`], computing it on first use.
    pub fn dfa(&self) -> &Dfa<S> {
        self.dfa.get_or_init(|| {
            debug!(
                "filling DFA cache of NFA with {} states",
                self.model.size()
            );
            self.to_dfa()
        })
    }
}

impl<S: Symbol> FiniteAutomaton for Nfa<S> {
    type Symbol = S;
    type Label = Label<S>;
    type Target = StateSet;

    const DETERMINISTIC: bool = false;

    fn model(&self) -> &Automaton<S, Label<S>, StateSet> {
        &self.model
    }

    /// An `Nfa` accepts exactly the words that its (cached) equivalent [`Dfa`] accepts.
    fn accepts<W, B>(&self, word: W) -> bool
    where
        W: IntoIterator<Item = B>,
        B: Borrow<S>,
    {
        self.dfa().accepts(word)
    }
}

impl<S> std::ops::Deref for Nfa<S> {
    type Target = Automaton<S, Label<S>, StateSet>;
    fn deref(&self) -> &Self::Target {
        &self.model
    }
}

impl<S: PartialEq> PartialEq for Nfa<S> {
    fn eq(&self, other: &Self) -> bool {
        self.model == other.model
    }
}
impl<S: Eq> Eq for Nfa<S> {}

impl<S: Symbol> Debug for Nfa<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NFA\n{}", self)
    }
}

impl<S: Symbol> std::fmt::Display for Nfa<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let columns = std::iter::once(Label::Epsilon)
            .chain(self.model.alphabet().iter().cloned().map(Label::Symbol));
        write!(f, "{}", self.model.transition_table(columns))
    }
}
