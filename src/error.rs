use thiserror::Error;

use crate::StateIndex;

/// Represents the ways in which an automaton can violate the structural requirements, i.e. the
/// reason why an [`AutomatonError::Malformed`] was raised.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum Malformation {
    /// The same state was declared more than once.
    #[error("state {0} is declared more than once")]
    DuplicateState(StateIndex),
    /// A declared state uses the identifier that is reserved for the trap state.
    #[error("state {0} collides with the identifier reserved for the trap state")]
    ReservedTrapState(StateIndex),
    /// The initial state is not among the declared states.
    #[error("initial state {0} is not declared")]
    UndeclaredInitial(StateIndex),
    /// A final state is not among the declared states.
    #[error("final state {0} is not declared")]
    UndeclaredFinal(StateIndex),
    /// A transition leaves from a state that is not declared.
    #[error("transition on {symbol} leaves from undeclared state {origin}")]
    UndeclaredSource {
        /// The undeclared origin of the transition.
        origin: StateIndex,
        /// The symbol of the transition, as shown by [`crate::Show`].
        symbol: String,
    },
    /// A transition consumes a symbol that is not part of the alphabet.
    #[error("transition from {origin} uses symbol {symbol} which is not in the alphabet")]
    UndeclaredSymbol {
        /// The origin of the transition.
        origin: StateIndex,
        /// The symbol, as shown by [`crate::Show`].
        symbol: String,
    },
    /// A transition leads to a state that is not declared.
    #[error("transition from {origin} on {symbol} leads to undeclared state {target}")]
    UndeclaredTarget {
        /// The origin of the transition.
        origin: StateIndex,
        /// The symbol of the transition, as shown by [`crate::Show`].
        symbol: String,
        /// The undeclared target of the transition.
        target: StateIndex,
    },
}

/// Errors raised when constructing or transforming automata. Rejecting a word is never an error.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum AutomatonError {
    /// The automaton is structurally malformed.
    #[error("malformed automaton: {0}")]
    Malformed(#[from] Malformation),
    /// Minimization requires a total transition function, but the given state has no transition
    /// on the given symbol. See [`crate::Dfa::complete`].
    #[error("DFA is incomplete, state {state} has no transition on symbol {symbol}")]
    IncompleteDfa {
        /// The state lacking a transition.
        state: StateIndex,
        /// The symbol, as shown by [`crate::Show`].
        symbol: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_state() {
        let err: AutomatonError = Malformation::UndeclaredTarget {
            origin: 0,
            symbol: "a".into(),
            target: 7,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "malformed automaton: transition from 0 on a leads to undeclared state 7"
        );

        let err = AutomatonError::IncompleteDfa {
            state: 3,
            symbol: "b".into(),
        };
        assert!(err.to_string().contains("state 3"));
    }
}
