use fastrand::Rng;
use tracing::trace;

use crate::{automaton::Label, prelude::*};

/// Returns the alphabet consisting of the first `symbols` lowercase latin letters.
pub fn char_alphabet(symbols: usize) -> Vec<char> {
    ('a'..='z').take(symbols).collect()
}

/// Generates a random [`Nfa`] with states `0..size` over [`char_alphabet`]`(symbols)`, with
/// initial state `0`. For every state and symbol, each state is added as a target with
/// probability `density`. Epsilon transitions are drawn in the same way with probability
/// `epsilon_density`, and every state is final with probability one half. The same `seed` always
/// yields the same automaton.
pub fn generate_random_nfa(
    seed: u64,
    symbols: usize,
    size: usize,
    density: f64,
    epsilon_density: f64,
) -> Nfa {
    let mut rng = Rng::with_seed(seed);
    let size = size.max(1) as StateIndex;
    let alphabet = char_alphabet(symbols);

    let mut moves = vec![];
    for q in 0..size {
        for a in &alphabet {
            moves.push((q, Label::Symbol(*a), draw_targets(&mut rng, size, density)));
        }
        moves.push((q, Label::Epsilon, draw_targets(&mut rng, size, epsilon_density)));
    }
    let finals = (0..size).filter(|_| rng.bool()).collect::<Vec<_>>();
    trace!("generated random NFA with {size} states from seed {seed}");

    Nfa::builder()
        .with_states(0..size)
        .with_alphabet(alphabet)
        .with_moves(moves.into_iter().filter(|(_, _, targets)| !targets.is_empty()))
        .with_initial(0)
        .with_finals(finals)
        .build()
        .expect("randomly generated NFA only uses declared states")
}

fn draw_targets(rng: &mut Rng, size: StateIndex, density: f64) -> Vec<StateIndex> {
    (0..size).filter(|_| rng.f64() < density).collect()
}

/// Generates a random complete [`Dfa`] with states `0..size` over
/// [`char_alphabet`]`(symbols)` and initial state `0` by drawing the target of every transition
/// uniformly. Every state is final with probability one half. Depending on the drawn transitions,
/// some states may be unreachable.
pub fn generate_random_dfa(seed: u64, symbols: usize, size: usize) -> Dfa {
    let mut rng = Rng::with_seed(seed);
    let size = size.max(1) as StateIndex;
    let alphabet = char_alphabet(symbols);

    let mut transitions = vec![];
    for q in 0..size {
        for a in &alphabet {
            transitions.push((q, *a, rng.u32(..size)));
        }
    }
    let finals = (0..size).filter(|_| rng.bool()).collect::<Vec<_>>();
    trace!("generated random DFA with {size} states from seed {seed}");

    Dfa::builder()
        .with_states(0..size)
        .with_alphabet(alphabet)
        .with_transitions(transitions)
        .with_initial(0)
        .with_finals(finals)
        .build()
        .expect("randomly generated DFA only uses declared states")
}

/// Generate a random word over `alphabet`, its length is drawn uniformly from the range
/// `min_len..=max_len`. If `max_len` is smaller than `min_len`, the word has length `min_len`.
pub fn generate_random_word<S: Clone>(
    rng: &mut Rng,
    alphabet: &[S],
    min_len: usize,
    max_len: usize,
) -> Vec<S> {
    if alphabet.is_empty() {
        return vec![];
    }
    let length = rng.usize(min_len..=max_len.max(min_len));
    (0..length)
        .map(|_| alphabet[rng.usize(..alphabet.len())].clone())
        .collect()
}

/// Generate `number` random words over `alphabet`, see [`generate_random_word`].
pub fn generate_random_words<S: Clone>(
    seed: u64,
    alphabet: &[S],
    min_len: usize,
    max_len: usize,
    number: usize,
) -> Vec<Vec<S>> {
    let mut rng = Rng::with_seed(seed);
    (0..number)
        .map(|_| generate_random_word(&mut rng, alphabet, min_len, max_len))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_reproducible() {
        assert_eq!(
            generate_random_nfa(7, 2, 5, 0.3, 0.1),
            generate_random_nfa(7, 2, 5, 0.3, 0.1)
        );
        assert_eq!(generate_random_dfa(7, 3, 6), generate_random_dfa(7, 3, 6));
        let dfa = generate_random_dfa(11, 3, 6);
        assert!(dfa.is_complete());
        assert_eq!(dfa.alphabet(), &['a', 'b', 'c']);
        let words = generate_random_words(3, &['a', 'b'], 2, 4, 10);
        assert_eq!(words.len(), 10);
        assert!(words.iter().all(|w| (2..=4).contains(&w.len())));
        let words = generate_random_words(3, &['a', 'b'], 5, 1, 4);
        assert!(words.iter().all(|w| w.len() == 5));
    }

    #[test_log::test]
    fn determinization_preserves_languages() {
        for seed in 0..40 {
            let nfa = generate_random_nfa(seed, 2, 5, 0.25, 0.1);
            let dfa = nfa.to_dfa();
            assert!(dfa.is_complete());
            assert_eq!(dfa.reachable_states().len(), dfa.size());
            for word in words_up_to(nfa.alphabet(), 5) {
                let expected = simulate(&nfa, &word);
                assert_eq!(dfa.accepts(&word), expected, "seed {seed}, {}", word.show());
                assert_eq!(nfa.accepts(&word), expected);
            }
        }
    }

    /// Decides acceptance by tracking the set of active states directly.
    fn simulate(nfa: &Nfa, word: &[char]) -> bool {
        let mut current = nfa.epsilon_closure(nfa.initial());
        for a in word {
            let moved = current
                .iter()
                .filter_map(|q| nfa.successors(q, &Label::Symbol(*a)))
                .flat_map(|targets| targets.iter())
                .collect::<Vec<_>>();
            current = nfa.epsilon_closure_of(moved);
        }
        let accepted = current.iter().any(|q| nfa.is_final(q));
        accepted
    }

    #[test_log::test]
    #[cfg(feature = "minimize")]
    fn minimization_preserves_languages() {
        for seed in 0..40 {
            let dfa = generate_random_dfa(seed, 2, 7);
            let min = dfa.minimize().unwrap();
            assert!(min.size() <= dfa.size());
            assert_eq!(min.minimize().unwrap().size(), min.size());
            let trimmed = dfa.trim().minimize().unwrap();
            assert!(trimmed.size() <= dfa.reachable_states().len());
            assert!(trimmed.is_minimal().unwrap());
            for word in words_up_to(dfa.alphabet(), 6) {
                assert_eq!(dfa.accepts(&word), min.accepts(&word), "seed {seed}");
            }
            for word in generate_random_words(seed, dfa.alphabet(), 7, 12, 20) {
                assert_eq!(dfa.accepts(&word), min.accepts(&word), "seed {seed}");
            }
        }
    }
}
