//! Library for determinizing and minimizing finite automata over finite words.
//!
//! An automaton consists of a finite set of states, a finite alphabet, a transition function, one
//! designated initial state and a set of accepting (final) states. The crate distinguishes two
//! variants which share this representation (see [`automaton::Automaton`]):
//! - [`Nfa`], a nondeterministic automaton whose transitions lead to a set of states and which may
//!   contain epsilon transitions, i.e. moves that do not consume an input symbol.
//! - [`Dfa`], a deterministic automaton where every pair of state and symbol has at most one
//!   successor. A missing successor is interpreted as a move to the trap state [`TRAP`].
//!
//! The interesting algorithms are
//! - the computation of epsilon closures, see [`determinization::EpsilonClosures`],
//! - the subset (or powerset) construction which turns an [`Nfa`] into an equivalent [`Dfa`], see
//!   [`determinization::SubsetConstruction`],
//! - Hopcroft's partition refinement algorithm for computing the minimal [`Dfa`] that recognizes
//!   the same language as a given one, see [`Dfa::minimize`]. This is feature gated behind the
//!   `minimize` feature, which is enabled by default.
//!
//! Automata are usually created through [`builder::NfaBuilder`] and [`builder::DfaBuilder`], which
//! validate the structure of the automaton when it is built:
//! ```
//! use determinize::prelude::*;
//!
//! let nfa = Nfa::builder()
//!     .with_states([0, 1])
//!     .with_alphabet(['a'])
//!     .with_epsilon(0, 1)
//!     .with_transitions([(1, 'a', 1)])
//!     .with_initial(0)
//!     .with_finals([1])
//!     .build()
//!     .unwrap();
//!
//! assert!(nfa.accepts("".chars()));
//! assert!(nfa.accepts("aa".chars()));
//! ```
//!
//! Exporting an automaton (see [`export::Export`]) and describing it for rendering (see
//! [`diagram::Diagram`]) produce plain data, the crate does not depend on any serialization or
//! rendering library.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::{fmt::Debug, hash::Hash};

use itertools::Itertools;

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use determinize::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        automaton::{Automaton, FiniteAutomaton, Label, StateSet},
        builder::{DfaBuilder, NfaBuilder},
        determinization::{Determinized, EpsilonClosures, SubsetConstruction},
        diagram::{Diagram, DiagramEdge, DiagramNode},
        error::{AutomatonError, Malformation},
        export::Export,
        math,
        run::Run,
        word::words_up_to,
        Dfa, Nfa, Show, StateIndex, Symbol, TRAP,
    };
}

/// This module contains some definitions of mathematical objects which are used throughout the crate and
/// do not really fit to the top level.
pub mod math;

/// Errors that can occur when constructing or minimizing automata.
pub mod error;

/// Defines the shared automaton model and its two variants.
#[allow(clippy::upper_case_acronyms)]
pub mod automaton;
pub use automaton::{Dfa, Nfa};

/// Builders for assembling automata from transition triples.
pub mod builder;

/// Epsilon closures and the subset construction.
pub mod determinization;

/// Contains the partition refinement algorithm for minimizing [`Dfa`]s. This is feature gated
/// behind the `minimize` feature.
#[cfg(feature = "minimize")]
pub mod minimization;

/// Runs of deterministic automata on finite words.
pub mod run;

/// Structural exports of automata.
pub mod export;

/// Node/edge descriptions of automata for rendering.
pub mod diagram;

/// Helpers for dealing with finite words.
pub mod word;

/// Implements the generation of random automata and words.
#[cfg(feature = "random")]
pub mod random;

/// Type of the identifiers used for states.
pub type StateIndex = u32;

/// The reserved identifier of the synthetic trap state. It is non-accepting, and every symbol
/// leads from it back to itself. Caller supplied states may never use this identifier.
pub const TRAP: StateIndex = StateIndex::MAX;

/// A symbol of an alphabet, which is also the type of the symbols in a word. Typical symbol
/// types are `char` and `String`.
pub trait Symbol: PartialEq + Eq + Debug + Clone + Ord + PartialOrd + Hash + Show {}
impl<S: PartialEq + Eq + Debug + Clone + Ord + PartialOrd + Hash + Show> Symbol for S {}

/// Helper trait which can be used to display states, symbols and such.
pub trait Show {
    /// Returns a human readable representation of `self`, for a state index that should be
    /// for example 0, 1, 2, ... and for a symbol just the symbol itself.
    /// This is used for transition tables, diagrams and error messages.
    fn show(&self) -> String;

    /// Show a collection of the thing, for a collection of states this should be {0, 1, 2, ...}.
    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        format!("{{{}}}", iter.into_iter().map(|x| x.show()).join(", "))
    }
}

impl Show for StateIndex {
    fn show(&self) -> String {
        if *self == TRAP {
            "trap".to_string()
        } else {
            self.to_string()
        }
    }
}

impl Show for char {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl Show for &str {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl<S: Show> Show for [S] {
    fn show(&self) -> String {
        format!("\"{}\"", self.iter().map(|x| x.show()).join(""))
    }
}

impl<S: Show> Show for Vec<S> {
    fn show(&self) -> String {
        self.as_slice().show()
    }
}

impl<S: Show> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    /// The DFA from the wikipedia article on DFA minimization, states 2, 3 and 4 as well as
    /// 0 and 1 are equivalent.
    pub fn wiki_dfa() -> Dfa {
        Dfa::builder()
            .with_states(0..6)
            .with_alphabet(['a', 'b'])
            .with_transitions([
                (0, 'a', 1),
                (0, 'b', 2),
                (1, 'a', 0),
                (1, 'b', 3),
                (2, 'a', 4),
                (2, 'b', 5),
                (3, 'a', 4),
                (3, 'b', 5),
                (4, 'a', 4),
                (4, 'b', 5),
                (5, 'a', 5),
                (5, 'b', 5),
            ])
            .with_initial(0)
            .with_finals([2, 3, 4])
            .build()
            .unwrap()
    }

    #[test]
    fn show_states_and_words() {
        assert_eq!(3u32.show(), "3");
        assert_eq!(TRAP.show(), "trap");
        assert_eq!(vec!['a', 'b'].show(), "\"ab\"");
        assert_eq!(StateIndex::show_collection([1, 2].iter()), "{1, 2}");
    }

    #[test_log::test]
    #[cfg(feature = "minimize")]
    fn wiki_dfa_minimizes_to_three_states() {
        let dfa = wiki_dfa();
        let min = dfa.minimize().unwrap();
        assert_eq!(min.size(), 3);
        for word in words_up_to(dfa.alphabet(), 6) {
            assert_eq!(dfa.accepts(&word), min.accepts(&word), "{}", word.show());
        }
    }
}
