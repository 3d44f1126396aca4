use std::collections::VecDeque;

use bit_set::BitSet;
use tracing::trace;

use crate::{error::AutomatonError, math::Map, Dfa, StateIndex, Symbol};

/// Computes the coarsest partition of the states of `dfa` into blocks of language equivalent
/// states, using Hopcroft's partition refinement algorithm. Blocks are returned with their members
/// in declaration order. The block containing the initial state comes first, the remaining blocks
/// are ordered by the first declared state they contain.
///
/// The transition function of `dfa` must be total, otherwise an
/// [`AutomatonError::IncompleteDfa`] naming the first missing transition is returned.
pub(crate) fn hopcroft<S: Symbol>(dfa: &Dfa<S>) -> Result<Vec<Vec<StateIndex>>, AutomatonError> {
    if let Some((state, symbol)) = dfa.missing_transition() {
        return Err(AutomatonError::IncompleteDfa {
            state,
            symbol: symbol.show(),
        });
    }

    // states are identified by their position in the declaration order
    let states = dfa.states();
    let position: Map<StateIndex, usize> =
        states.iter().enumerate().map(|(i, &q)| (q, i)).collect();
    let alphabet = dfa.alphabet();

    // predecessors[c][j] holds all i such that states[i] reaches states[j] on alphabet[c]
    let mut predecessors = vec![vec![Vec::new(); states.len()]; alphabet.len()];
    for (i, &q) in states.iter().enumerate() {
        for (c, a) in alphabet.iter().enumerate() {
            if let Some(&j) = dfa.successor(q, a).and_then(|p| position.get(&p)) {
                predecessors[c][j].push(i);
            }
        }
    }

    let (accepting, rejecting): (Vec<usize>, Vec<usize>) =
        (0..states.len()).partition(|&i| dfa.is_final(states[i]));
    let mut blocks: Vec<BitSet> = [rejecting, accepting]
        .into_iter()
        .filter(|block| !block.is_empty())
        .map(|block| block.into_iter().collect())
        .collect();

    let mut worklist: VecDeque<usize> = (0..blocks.len()).collect();
    let mut queued = vec![true; blocks.len()];

    while let Some(splitter_id) = worklist.pop_front() {
        queued[splitter_id] = false;
        let splitter = blocks[splitter_id].clone();

        for (c, by_target) in predecessors.iter().enumerate() {
            let pre: BitSet = splitter
                .iter()
                .flat_map(|j| by_target[j].iter().copied())
                .collect();
            if pre.is_empty() {
                continue;
            }

            // blocks created while splitting by pre are never split by it again
            let current = blocks.len();
            for y in 0..current {
                let inside: BitSet = blocks[y].intersection(&pre).collect();
                if inside.is_empty() || inside.len() == blocks[y].len() {
                    continue;
                }
                let outside: BitSet = blocks[y].difference(&pre).collect();
                trace!(
                    "splitting block of {} states by symbol {}",
                    blocks[y].len(),
                    alphabet[c].show()
                );

                blocks[y] = inside;
                let z = blocks.len();
                blocks.push(outside);
                queued.push(false);

                let added = if queued[y] || blocks[z].len() < blocks[y].len() {
                    z
                } else {
                    y
                };
                worklist.push_back(added);
                queued[added] = true;
            }
        }
    }

    let initial = position.get(&dfa.initial()).copied().unwrap_or_default();
    blocks.sort_by_key(|block| (!block.contains(initial), block.iter().next()));
    Ok(blocks
        .into_iter()
        .map(|block| block.iter().map(|i| states[i]).collect())
        .collect())
}
