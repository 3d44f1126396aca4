use itertools::Itertools;

/// Returns all words over `alphabet` whose length is at most `max_len`, ordered by length and
/// then lexicographically with respect to the order of `alphabet`. The empty word comes first.
pub fn words_up_to<S: Clone>(alphabet: &[S], max_len: usize) -> Vec<Vec<S>> {
    let mut words = vec![vec![]];
    if alphabet.is_empty() {
        return words;
    }
    for len in 1..=max_len {
        words.extend(
            std::iter::repeat(alphabet.iter().cloned())
                .take(len)
                .multi_cartesian_product(),
        );
    }
    words
}
