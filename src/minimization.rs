pub(crate) mod partition_refinement;

use tracing::debug;

use crate::{
    automaton::Automaton,
    error::AutomatonError,
    math::{Map, OrderedMap, OrderedSet, Partition},
    Dfa, StateIndex, Symbol,
};

impl<S: Symbol> Dfa<S> {
    /// Computes the minimal [`Dfa`] that accepts the same language as `self`, using Hopcroft's
    /// partition refinement algorithm. Each state of the result stands for one class of language
    /// equivalent states of `self`: the class of the initial state becomes state `0`, and the
    /// remaining classes are numbered by the first declared state they contain.
    ///
    /// Unreachable states are not pruned, use [`Dfa::trim`] first if they should not be taken
    /// into account. The transition function has to be total, otherwise an
    /// [`AutomatonError::IncompleteDfa`] is returned (see [`Dfa::complete`]).
    ///
    /// # Example
    /// ```
    /// use determinize::prelude::*;
    ///
    /// // states 1 and 2 behave the same
    /// let dfa = Dfa::builder()
    ///     .with_states([0, 1, 2])
    ///     .with_alphabet(['a'])
    ///     .with_transitions([(0, 'a', 1), (1, 'a', 2), (2, 'a', 2)])
    ///     .with_initial(0)
    ///     .with_finals([1, 2])
    ///     .build()
    ///     .unwrap();
    /// let min = dfa.minimize().unwrap();
    /// assert_eq!(min.size(), 2);
    /// assert!(min.accepts("aaa".chars()));
    /// ```
    pub fn minimize(&self) -> Result<Dfa<S>, AutomatonError> {
        let blocks = partition_refinement::hopcroft(self)?;

        let block_of: Map<StateIndex, StateIndex> = blocks
            .iter()
            .enumerate()
            .flat_map(|(id, block)| block.iter().map(move |&q| (q, id as StateIndex)))
            .collect();

        let mut transitions: OrderedMap<StateIndex, OrderedMap<S, StateIndex>> =
            OrderedMap::default();
        let mut finals = OrderedSet::default();
        for (id, block) in blocks.iter().enumerate() {
            let id = id as StateIndex;
            if block.iter().any(|&q| self.is_final(q)) {
                finals.insert(id);
            }
            let Some(&representative) = block.first() else {
                continue;
            };
            for a in self.alphabet() {
                if let Some(&target) = self
                    .successor(representative, a)
                    .and_then(|p| block_of.get(&p))
                {
                    transitions.entry(id).or_default().insert(a.clone(), target);
                }
            }
        }

        debug!(
            "minimized DFA with {} states to {} states",
            self.size(),
            blocks.len()
        );
        Ok(Dfa::from_model(Automaton::new_unchecked(
            (0..blocks.len() as StateIndex).collect(),
            self.alphabet().to_vec(),
            transitions,
            0,
            finals,
        )))
    }

    /// Groups the states of `self` into classes of states that accept the same language. This
    /// is the partition that [`Dfa::minimize`] is based on.
    pub fn equivalence_classes(&self) -> Result<Partition<StateIndex>, AutomatonError> {
        Ok(Partition::new(partition_refinement::hopcroft(self)?))
    }

    /// Returns true if no other complete [`Dfa`] with fewer states accepts the same language,
    /// i.e. if all states are reachable and no two states are equivalent.
    pub fn is_minimal(&self) -> Result<bool, AutomatonError> {
        Ok(self.reachable_states().len() == self.size()
            && self.equivalence_classes()?.size() == self.size())
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

    /// Accepts exactly the words of length two, 1 and 2 are equivalent.
    fn length_two() -> Dfa {
        Dfa::builder()
            .with_states([0, 1, 2, 3, 4])
            .with_alphabet(['a', 'b'])
            .with_transitions([
                (0, 'a', 1),
                (0, 'b', 2),
                (1, 'a', 3),
                (1, 'b', 3),
                (2, 'a', 3),
                (2, 'b', 3),
                (3, 'a', 4),
                (3, 'b', 4),
                (4, 'a', 4),
                (4, 'b', 4),
            ])
            .with_initial(0)
            .with_finals([3])
            .build()
            .unwrap()
    }

    #[test_log::test]
    fn minimal_dfa_stays_the_same() {
        let dfa = ends_with_one();
        let min = dfa.minimize().unwrap();
        assert_eq!(min.size(), 2);
        assert_eq!(min, dfa);
        assert!(dfa.is_minimal().unwrap());
    }

    #[test_log::test]
    fn equivalent_states_are_merged() {
        let dfa = Dfa::builder()
            .with_states([0, 1, 2, 3])
            .with_alphabet(['a', 'b'])
            .with_transitions([
                (0, 'a', 1),
                (0, 'b', 2),
                (1, 'a', 3),
                (1, 'b', 3),
                (2, 'a', 3),
                (2, 'b', 3),
                (3, 'a', 3),
                (3, 'b', 3),
            ])
            .with_initial(0)
            .with_finals([3])
            .build()
            .unwrap();
        assert!(!dfa.is_minimal().unwrap());
        assert_eq!(
            dfa.equivalence_classes().unwrap(),
            math::Partition::new([vec![0], vec![1, 2], vec![3]])
        );

        let min = dfa.minimize().unwrap();
        assert_eq!(min.size(), 3);
        assert_eq!(min.successor(0, &'a'), Some(1));
        assert_eq!(min.successor(0, &'b'), Some(1));
        assert_eq!(min.successor(1, &'a'), Some(2));
        assert!(min.is_final(2));
        for word in words_up_to(dfa.alphabet(), 5) {
            assert_eq!(dfa.accepts(&word), min.accepts(&word), "{}", word.show());
        }
    }

    #[test]
    fn minimization_is_idempotent() {
        let min = length_two().minimize().unwrap();
        assert_eq!(min.size(), 4);
        let again = min.minimize().unwrap();
        assert_eq!(again.size(), min.size());
        assert_eq!(again, min);
    }

    #[test]
    fn initial_block_keeps_its_finality() {
        let dfa = Dfa::builder()
            .with_states([0, 1])
            .with_alphabet(['a'])
            .with_transitions([(0, 'a', 0), (1, 'a', 0)])
            .with_initial(1)
            .with_finals([1])
            .build()
            .unwrap();
        let min = dfa.minimize().unwrap();
        assert_eq!(min.initial(), 0);
        assert!(min.is_final(0));
        assert!(!min.is_final(1));
        assert!(min.accepts("".chars()));
        assert!(!min.accepts("a".chars()));
    }

    #[test]
    fn unreachable_states_are_not_pruned() {
        let dfa = Dfa::builder()
            .with_states([0, 1])
            .with_alphabet(['a'])
            .with_transitions([(0, 'a', 0), (1, 'a', 1)])
            .with_initial(0)
            .with_finals([1])
            .build()
            .unwrap();
        assert_eq!(dfa.minimize().unwrap().size(), 2);
        assert_eq!(dfa.trim().minimize().unwrap().size(), 1);
        assert!(!dfa.is_minimal().unwrap());
    }

    #[test]
    fn incomplete_dfa_is_an_error() {
        let dfa = Dfa::builder()
            .with_states([0, 1])
            .with_alphabet(['a', 'b'])
            .with_transitions([(0, 'a', 1), (1, 'a', 1), (1, 'b', 1)])
            .with_initial(0)
            .with_finals([1])
            .build()
            .unwrap();
        let err = dfa.minimize().unwrap_err();
        assert_eq!(
            err.to_string(),
            "DFA is incomplete, state 0 has no transition on symbol b"
        );
        let min = dfa.complete().minimize().unwrap();
        assert_eq!(min.size(), 3);
    }

    #[test]
    fn determinized_nfas_minimize() {
        // (a|b)*ab
        let nfa = Nfa::builder()
            .with_states([0, 1, 2, 3])
            .with_alphabet(['a', 'b'])
            .with_transitions([(0, 'a', 0), (0, 'b', 0), (0, 'a', 1), (1, 'b', 2)])
            .with_epsilon(2, 3)
            .with_initial(0)
            .with_finals([3])
            .build()
            .unwrap();
        let dfa = nfa.to_dfa();
        let min = dfa.minimize().unwrap();
        assert!(min.size() <= dfa.reachable_states().len());
        assert_eq!(min.size(), 3);
        assert!(min.is_minimal().unwrap());
        for word in words_up_to(nfa.alphabet(), 6) {
            assert_eq!(nfa.accepts(&word), min.accepts(&word), "{}", word.show());
        }
    }
}
