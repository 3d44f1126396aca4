use std::{borrow::Borrow, fmt::Debug};

use itertools::Itertools;

use crate::{
    diagram::Diagram,
    error::{AutomatonError, Malformation},
    export::Export,
    math::{OrderedMap, OrderedSet, Set},
    Show, StateIndex, Symbol, TRAP,
};

mod nfa;
pub use nfa::Nfa;

mod dfa;
pub use dfa::Dfa;

/// Labels the transitions of an [`Nfa`]. Besides ordinary symbols, a transition may be labeled
/// with epsilon, which means that it can be taken without consuming any input. As epsilon is a
/// separate variant, it can never be confused with a symbol of the alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label<S> {
    /// The empty word, a transition that does not consume input.
    Epsilon,
    /// A transition that consumes the given symbol.
    Symbol(S),
}

impl<S> Label<S> {
    /// Returns true if and only if `self` is [`Label::Epsilon`].
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Label::Epsilon)
    }

    /// Returns the symbol that is consumed, or `None` for epsilon.
    pub fn symbol(&self) -> Option<&S> {
        match self {
            Label::Epsilon => None,
            Label::Symbol(sym) => Some(sym),
        }
    }
}

impl<S> From<S> for Label<S> {
    fn from(value: S) -> Self {
        Label::Symbol(value)
    }
}

impl<S: Show> Show for Label<S> {
    fn show(&self) -> String {
        match self {
            Label::Epsilon => "ε".to_string(),
            Label::Symbol(sym) => sym.show(),
        }
    }
}

/// A set of states, which is ordered so that it can be hashed and compared. This is the target of
/// a nondeterministic transition and the kind of object that a state of a determinized automaton
/// stands for.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateSet(OrderedSet<StateIndex>);

impl StateSet {
    /// Creates an empty set of states.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set that contains only `q`.
    pub fn singleton(q: StateIndex) -> Self {
        Self(OrderedSet::from_iter([q]))
    }

    /// The set that stands in for "no state at all" during the subset construction. It contains
    /// only the [`TRAP`] sentinel.
    pub fn trap() -> Self {
        Self::singleton(TRAP)
    }

    /// Returns true if `self` is the set produced by [`StateSet::trap`].
    pub fn is_trap(&self) -> bool {
        self.0.len() == 1 && self.0.contains(&TRAP)
    }

    /// Inserts `q`, returning whether it was newly inserted.
    pub fn insert(&mut self, q: StateIndex) -> bool {
        self.0.insert(q)
    }

    /// Returns true if `q` is an element of `self`.
    pub fn contains(&self, q: StateIndex) -> bool {
        self.0.contains(&q)
    }

    /// Returns true if `self` shares at least one element with `other`.
    pub fn intersects(&self, other: &OrderedSet<StateIndex>) -> bool {
        !self.0.is_disjoint(other)
    }

    /// Iterates over the states in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.0.iter().copied()
    }

    /// The number of states in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set contains no state.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Extend<StateIndex> for StateSet {
    fn extend<T: IntoIterator<Item = StateIndex>>(&mut self, iter: T) {
        self.0.extend(iter)
    }
}

impl FromIterator<StateIndex> for StateSet {
    fn from_iter<T: IntoIterator<Item = StateIndex>>(iter: T) -> Self {
        Self(OrderedSet::from_iter(iter))
    }
}

impl IntoIterator for StateSet {
    type Item = StateIndex;
    type IntoIter = std::collections::btree_set::IntoIter<StateIndex>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Show for StateSet {
    fn show(&self) -> String {
        if self.0.is_empty() {
            "∅".to_string()
        } else {
            StateIndex::show_collection(self.0.iter())
        }
    }
}

impl Debug for StateSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.show())
    }
}

/// Abstracts over the targets of a transition, which is a single state for a [`Dfa`] and a
/// [`StateSet`] for an [`Nfa`].
pub trait Targets: Clone + Debug + Eq + Show {
    /// Iterates over the states that the transition may lead to.
    fn targets(&self) -> impl Iterator<Item = StateIndex> + '_;
}

impl Targets for StateIndex {
    fn targets(&self) -> impl Iterator<Item = StateIndex> + '_ {
        std::iter::once(*self)
    }
}

impl Targets for StateSet {
    fn targets(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.iter()
    }
}

/// The representation that is shared by nondeterministic and deterministic automata. It stores
/// the declared states and alphabet (both in the order in which they were declared), the
/// transitions as a map from states to a map from labels of type `K` to targets of type `T`,
/// the initial state and the set of final states.
///
/// For an [`Nfa`], `K` is [`Label<S>`] and `T` is [`StateSet`], for a [`Dfa`] `K` is just the
/// symbol type `S` and `T` is a single [`StateIndex`].
#[derive(Clone, PartialEq, Eq)]
pub struct Automaton<S, K, T> {
    states: Vec<StateIndex>,
    alphabet: Vec<S>,
    transitions: OrderedMap<StateIndex, OrderedMap<K, T>>,
    initial: StateIndex,
    finals: OrderedSet<StateIndex>,
}

impl<S: Symbol, K: Symbol, T: Targets> Automaton<S, K, T> {
    /// Assembles an automaton after verifying that it is well-formed: states are unique and do
    /// not collide with [`TRAP`], and the initial state, the final states as well as all origins
    /// and targets of transitions are declared. Every label for which `consumed` returns a symbol
    /// must use a symbol of the alphabet. Duplicate symbols in the alphabet are dropped.
    pub(crate) fn new<F>(
        states: Vec<StateIndex>,
        alphabet: Vec<S>,
        transitions: OrderedMap<StateIndex, OrderedMap<K, T>>,
        initial: StateIndex,
        finals: OrderedSet<StateIndex>,
        consumed: F,
    ) -> Result<Self, AutomatonError>
    where
        F: Fn(&K) -> Option<&S>,
    {
        let mut declared = Set::default();
        for &q in &states {
            if q == TRAP {
                return Err(Malformation::ReservedTrapState(q).into());
            }
            if !declared.insert(q) {
                return Err(Malformation::DuplicateState(q).into());
            }
        }
        if !declared.contains(&initial) {
            return Err(Malformation::UndeclaredInitial(initial).into());
        }
        if let Some(&q) = finals.iter().find(|q| !declared.contains(q)) {
            return Err(Malformation::UndeclaredFinal(q).into());
        }
        let symbols: Set<&S> = alphabet.iter().collect();
        for (&origin, edges) in &transitions {
            for (label, targets) in edges {
                if !declared.contains(&origin) {
                    return Err(Malformation::UndeclaredSource {
                        origin,
                        symbol: label.show(),
                    }
                    .into());
                }
                if consumed(label).is_some_and(|a| !symbols.contains(&a)) {
                    return Err(Malformation::UndeclaredSymbol {
                        origin,
                        symbol: label.show(),
                    }
                    .into());
                }
                if let Some(target) = targets.targets().find(|p| !declared.contains(p)) {
                    return Err(Malformation::UndeclaredTarget {
                        origin,
                        symbol: label.show(),
                        target,
                    }
                    .into());
                }
            }
        }

        Ok(Self::new_unchecked(
            states,
            alphabet.into_iter().unique().collect(),
            transitions,
            initial,
            finals,
        ))
    }

    /// Assembles an automaton from parts that are known to be well-formed, for example because
    /// they were produced by one of the algorithms of this crate.
    pub(crate) fn new_unchecked(
        states: Vec<StateIndex>,
        alphabet: Vec<S>,
        transitions: OrderedMap<StateIndex, OrderedMap<K, T>>,
        initial: StateIndex,
        finals: OrderedSet<StateIndex>,
    ) -> Self {
        Self {
            states,
            alphabet,
            transitions,
            initial,
            finals,
        }
    }

    /// The declared states, in declaration order.
    pub fn states(&self) -> &[StateIndex] {
        &self.states
    }

    /// The number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// The alphabet, in declaration order. It never contains epsilon.
    pub fn alphabet(&self) -> &[S] {
        &self.alphabet
    }

    /// The initial state.
    pub fn initial(&self) -> StateIndex {
        self.initial
    }

    /// The set of final (accepting) states.
    pub fn finals(&self) -> &OrderedSet<StateIndex> {
        &self.finals
    }

    /// Returns true if `q` is a final state.
    pub fn is_final(&self, q: StateIndex) -> bool {
        self.finals.contains(&q)
    }

    /// The complete transition map.
    pub fn transitions(&self) -> &OrderedMap<StateIndex, OrderedMap<K, T>> {
        &self.transitions
    }

    /// The outgoing transitions of `q`, if it has any.
    pub fn edges_from(&self, q: StateIndex) -> Option<&OrderedMap<K, T>> {
        self.transitions.get(&q)
    }

    /// The target of the transition from `q` on `label`, if it exists.
    pub fn target(&self, q: StateIndex, label: &K) -> Option<&T> {
        self.transitions.get(&q).and_then(|edges| edges.get(label))
    }

    /// Iterates over all transitions as triples of origin, label and targets.
    pub fn triples(&self) -> impl Iterator<Item = (StateIndex, &K, &T)> + '_ {
        self.transitions
            .iter()
            .flat_map(|(&q, edges)| edges.iter().map(move |(k, t)| (q, k, t)))
    }

    /// Produces the structural export of `self`.
    pub fn export(&self) -> Export<S, K, T> {
        Export {
            states: self.states.clone(),
            alphabet: self.alphabet.clone(),
            transitions: self.transitions.clone(),
            initial: self.initial,
            finals: self.finals.clone(),
        }
    }

    /// Returns a string representation of the transition table, with one row per state and one
    /// column per label in `columns`. The initial state is prefixed with an arrow and final states
    /// are marked with a star.
    pub fn transition_table<I: IntoIterator<Item = K>>(&self, columns: I) -> String {
        let columns = columns.into_iter().collect_vec();
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(columns.iter().map(|k| k.show())),
        );
        for &q in &self.states {
            let mut row = vec![format!(
                "{}{}{}",
                if q == self.initial { "→ " } else { "" },
                q.show(),
                if self.is_final(q) { " *" } else { "" }
            )];
            for k in &columns {
                row.push(
                    self.target(q, k)
                        .map(|t| t.show())
                        .unwrap_or_else(|| "-".to_string()),
                );
            }
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

/// The interface that is shared by [`Nfa`] and [`Dfa`]. Implementors only need to provide
/// access to their underlying [`Automaton`] and decide how words are accepted, everything else
/// is derived from the model.
pub trait FiniteAutomaton {
    /// The type of the symbols of the alphabet.
    type Symbol: Symbol;
    /// The type that labels transitions.
    type Label: Symbol;
    /// The type of transition targets.
    type Target: Targets;

    /// Whether transitions are single-target and epsilon-free.
    const DETERMINISTIC: bool;

    /// Gives access to the shared representation.
    fn model(&self) -> &Automaton<Self::Symbol, Self::Label, Self::Target>;

    /// Decides whether `word` is accepted.
    fn accepts<W, B>(&self, word: W) -> bool
    where
        W: IntoIterator<Item = B>,
        B: Borrow<Self::Symbol>;

    /// Returns true if `self` is deterministic.
    fn is_deterministic(&self) -> bool {
        Self::DETERMINISTIC
    }

    /// The declared states.
    fn states(&self) -> &[StateIndex] {
        self.model().states()
    }

    /// The number of states.
    fn size(&self) -> usize {
        self.model().size()
    }

    /// The alphabet, which never contains epsilon.
    fn alphabet(&self) -> &[Self::Symbol] {
        self.model().alphabet()
    }

    /// The initial state.
    fn initial(&self) -> StateIndex {
        self.model().initial()
    }

    /// Returns true if `q` is accepting.
    fn is_final(&self, q: StateIndex) -> bool {
        self.model().is_final(q)
    }

    /// Produces the structural export of the five components.
    fn export(&self) -> Export<Self::Symbol, Self::Label, Self::Target> {
        self.model().export()
    }

    /// Produces the node/edge description used for rendering.
    fn diagram(&self) -> Diagram<Self::Label> {
        Diagram::from_automaton(self.model())
    }
}
