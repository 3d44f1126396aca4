use std::borrow::Borrow;

use tracing::trace;

use crate::{Dfa, Show, StateIndex, Symbol};

/// The result of running a finite word in a [`Dfa`]. A run either consumes the complete word, or
/// it gets stuck because some transition is missing. A run that got stuck rejects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Run {
    /// The whole word was consumed.
    Complete {
        /// The sequence of visited states, starting with the initial state.
        path: Vec<StateIndex>,
        /// Whether the last state of `path` is final.
        accepting: bool,
    },
    /// The symbol at `position` could not be read in the last state of `path`.
    Stuck {
        /// The sequence of visited states, starting with the initial state.
        path: Vec<StateIndex>,
        /// Position of the first symbol that could not be read.
        position: usize,
    },
}

impl Run {
    /// Returns true if the run consumed the whole word and ended in a final state.
    pub fn is_accepting(&self) -> bool {
        matches!(self, Run::Complete { accepting: true, .. })
    }

    /// The visited states.
    pub fn path(&self) -> &[StateIndex] {
        match self {
            Run::Complete { path, .. } | Run::Stuck { path, .. } => path,
        }
    }

    /// The state that is reached after consuming the whole word, `None` if the run got stuck.
    pub fn reached(&self) -> Option<StateIndex> {
        match self {
            Run::Complete { path, .. } => path.last().copied(),
            Run::Stuck { .. } => None,
        }
    }
}

impl<S: Symbol> Dfa<S> {
    /// Runs `word` from the initial state, following the transition function symbol by symbol.
    pub fn run<W, B>(&self, word: W) -> Run
    where
        W: IntoIterator<Item = B>,
        B: Borrow<S>,
    {
        let mut path = vec![self.initial()];
        let mut current = self.initial();
        for (position, symbol) in word.into_iter().enumerate() {
            let symbol: &S = symbol.borrow();
            match self.successor(current, symbol) {
                Some(next) => {
                    current = next;
                    path.push(next);
                }
                None => {
                    trace!(
                        "run got stuck in state {} on symbol {} at position {position}",
                        current.show(),
                        symbol.show()
                    );
                    return Run::Stuck { path, position };
                }
            }
        }
        Run::Complete {
            accepting: self.is_final(current),
            path,
        }
    }
}
