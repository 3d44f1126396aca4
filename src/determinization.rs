//! Turning nondeterministic automata into deterministic ones. The [`SubsetConstruction`] builds a
//! [`crate::Dfa`] whose states are sets of states of an [`crate::Nfa`], where each set is closed
//! under epsilon transitions (see [`EpsilonClosures`]).

mod closure;
pub use closure::EpsilonClosures;

mod subset;
pub use subset::{Determinized, SubsetConstruction};
