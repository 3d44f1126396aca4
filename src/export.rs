use crate::{
    math::{OrderedMap, OrderedSet},
    StateIndex,
};

/// The structural content of an automaton, as handed to serializers or other consumers outside of
/// this crate. Transitions are given as a map from states to a map from labels to targets. For a
/// [`crate::Dfa`] the labels are symbols and targets single states, for a [`crate::Nfa`] the
/// labels are [`crate::automaton::Label`]s and the targets are [`crate::automaton::StateSet`]s.
///
/// Rebuilding an automaton from its export (with [`crate::Dfa::from_export`] or
/// [`crate::Nfa::from_export`]) yields an automaton that accepts the same words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export<S, K, T> {
    /// The declared states, in declaration order.
    pub states: Vec<StateIndex>,
    /// The alphabet, in declaration order.
    pub alphabet: Vec<S>,
    /// The transitions.
    pub transitions: OrderedMap<StateIndex, OrderedMap<K, T>>,
    /// The initial state.
    pub initial: StateIndex,
    /// The final states.
    pub finals: OrderedSet<StateIndex>,
}

impl<S, K, T> Export<S, K, T> {
    /// Iterates over all transitions as triples of origin, label and targets.
    pub fn triples(&self) -> impl Iterator<Item = (StateIndex, &K, &T)> + '_ {
        self.transitions
            .iter()
            .flat_map(|(&q, edges)| edges.iter().map(move |(k, t)| (q, k, t)))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn nfa_export_round_trip() {
        let nfa = Nfa::builder()
            .with_states([0, 1, 2])
            .with_alphabet(['a', 'b'])
            .with_transitions([(0, 'a', 1), (0, 'a', 2), (1, 'b', 2)])
            .with_epsilon(2, 0)
            .with_initial(0)
            .with_finals([2])
            .build()
            .unwrap();
        let export = nfa.export();
        assert_eq!(export.states, vec![0, 1, 2]);
        assert_eq!(
            export.transitions[&0][&Label::Symbol('a')],
            StateSet::from_iter([1, 2])
        );
        assert_eq!(export.triples().count(), 3);

        let rebuilt = Nfa::from_export(export).unwrap();
        assert_eq!(rebuilt, nfa);
        for word in words_up_to(nfa.alphabet(), 5) {
            assert_eq!(nfa.accepts(&word), rebuilt.accepts(&word));
        }
    }

    #[test]
    fn dfa_export_includes_the_trap_state() {
        let nfa = Nfa::builder()
            .with_states([0, 1])
            .with_alphabet(['a'])
            .with_transitions([(0, 'a', 1)])
            .with_initial(0)
            .with_finals([1])
            .build()
            .unwrap();
        let export = nfa.to_dfa().export();
        assert_eq!(export.states, vec![0, 1, 2]);
        assert_eq!(export.transitions[&2][&'a'], 2);
        assert_eq!(export.finals.iter().copied().collect::<Vec<_>>(), vec![1]);

        let rebuilt = Dfa::from_export(export).unwrap();
        assert_eq!(&rebuilt, nfa.dfa());
    }

    #[test]
    fn tampered_exports_are_rejected() {
        let dfa = Dfa::builder()
            .with_states([0])
            .with_alphabet(['a'])
            .with_transitions([(0, 'a', 0)])
            .build()
            .unwrap();
        let mut export = dfa.export();
        export.finals.insert(5);
        assert_eq!(
            Dfa::from_export(export).unwrap_err(),
            AutomatonError::from(Malformation::UndeclaredFinal(5))
        );
    }
}
