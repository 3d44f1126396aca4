use std::collections::BTreeMap;

use determinize::prelude::*;
use serde::{Deserialize, Serialize};

/// Target of a transition in an input document, either a single state or a list of states.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum InputTargets {
    One(StateIndex),
    Many(Vec<StateIndex>),
}

impl InputTargets {
    fn into_vec(self) -> Vec<StateIndex> {
        match self {
            InputTargets::One(q) => vec![q],
            InputTargets::Many(qs) => qs,
        }
    }
}

/// An automaton as it is read from JSON. Transitions are triples of origin, symbol and target(s),
/// where the symbol may be the epsilon marker.
#[derive(Debug, Clone, Deserialize)]
pub struct InputDocument {
    pub states: Vec<StateIndex>,
    pub alphabet: Vec<String>,
    pub transitions: Vec<(StateIndex, String, InputTargets)>,
    pub initial: StateIndex,
    #[serde(rename = "final")]
    pub finals: Vec<StateIndex>,
}

impl InputDocument {
    /// Assembles the [`Nfa`], treating every occurrence of `epsilon` as an epsilon label.
    /// Triples for the same origin and symbol are united.
    pub fn into_nfa(self, epsilon: &str) -> Result<Nfa<String>, AutomatonError> {
        let moves = self.transitions.into_iter().map(|(q, symbol, targets)| {
            let label = if symbol == epsilon {
                Label::Epsilon
            } else {
                Label::Symbol(symbol)
            };
            (q, label, targets.into_vec())
        });
        Nfa::builder()
            .with_states(self.states)
            .with_alphabet(self.alphabet.into_iter().filter(|a| a != epsilon))
            .with_moves(moves)
            .with_initial(self.initial)
            .with_finals(self.finals)
            .build()
    }
}

/// An automaton as it is written to JSON, with transitions given as a mapping from states to a
/// mapping from symbols to targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputDocument<T> {
    pub states: Vec<StateIndex>,
    pub alphabet: Vec<String>,
    pub transitions: BTreeMap<StateIndex, BTreeMap<String, T>>,
    pub initial: StateIndex,
    #[serde(rename = "final")]
    pub finals: Vec<StateIndex>,
}

impl OutputDocument<Vec<StateIndex>> {
    /// Describes `nfa`, epsilon transitions are written with the `epsilon` marker.
    pub fn from_nfa(nfa: &Nfa<String>, epsilon: &str) -> Self {
        let export = nfa.export();
        let transitions = export
            .transitions
            .into_iter()
            .map(|(q, edges)| {
                let edges = edges
                    .into_iter()
                    .map(|(label, targets)| {
                        let symbol = match label {
                            Label::Epsilon => epsilon.to_string(),
                            Label::Symbol(symbol) => symbol,
                        };
                        (symbol, targets.into_iter().collect())
                    })
                    .collect();
                (q, edges)
            })
            .collect();
        Self {
            states: export.states,
            alphabet: export.alphabet,
            transitions,
            initial: export.initial,
            finals: export.finals.into_iter().collect(),
        }
    }
}

impl OutputDocument<StateIndex> {
    /// Describes `dfa`.
    pub fn from_dfa(dfa: &Dfa<String>) -> Self {
        let export = dfa.export();
        Self {
            states: export.states,
            alphabet: export.alphabet,
            transitions: export.transitions,
            initial: export.initial,
            finals: export.finals.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = r#"{
        "states": [0, 1, 2],
        "alphabet": ["a", "b"],
        "transitions": [[0, "a", 1], [0, "a", [2]], [1, "@", 2], [2, "b", [0, 2]]],
        "initial": 0,
        "final": [2]
    }"#;

    #[test_log::test]
    fn reads_triples_with_epsilon_marker() {
        let doc: InputDocument = serde_json::from_str(INPUT).unwrap();
        assert_eq!(doc.transitions[0].2, InputTargets::One(1));
        let nfa = doc.into_nfa("@").unwrap();
        assert_eq!(
            nfa.successors(0, &Label::Symbol("a".to_string())),
            Some(&StateSet::from_iter([1, 2]))
        );
        assert_eq!(nfa.successors(1, &Label::Epsilon), Some(&StateSet::singleton(2)));
        assert!(nfa.accepts(["a".to_string()]));
        assert!(nfa.accepts(["a", "b", "b"].map(String::from)));
        assert!(!nfa.accepts(["b".to_string()]));
    }

    #[test]
    fn marker_in_alphabet_is_dropped() {
        let doc: InputDocument = serde_json::from_str(
            r#"{"states": [0], "alphabet": ["x", "eps"], "transitions": [[0, "eps", 0]], "initial": 0, "final": []}"#,
        )
        .unwrap();
        let nfa = doc.into_nfa("eps").unwrap();
        assert_eq!(nfa.alphabet(), &["x".to_string()]);
    }

    #[test]
    fn malformed_input_is_reported() {
        let doc: InputDocument = serde_json::from_str(
            r#"{"states": [0], "alphabet": ["a"], "transitions": [[0, "a", 3]], "initial": 0, "final": []}"#,
        )
        .unwrap();
        assert!(matches!(
            doc.into_nfa("@"),
            Err(AutomatonError::Malformed(Malformation::UndeclaredTarget { target: 3, .. }))
        ));
    }

    #[test]
    fn symbols_outside_the_alphabet_are_reported() {
        let doc: InputDocument = serde_json::from_str(
            r#"{"states": [0], "alphabet": ["a"], "transitions": [[0, "b", 0]], "initial": 0, "final": []}"#,
        )
        .unwrap();
        assert!(matches!(
            doc.into_nfa("@"),
            Err(AutomatonError::Malformed(Malformation::UndeclaredSymbol { origin: 0, .. }))
        ));
    }

    #[test]
    fn writes_mapping_of_mappings() {
        let doc: InputDocument = serde_json::from_str(INPUT).unwrap();
        let nfa = doc.into_nfa("@").unwrap();

        let json = serde_json::to_value(OutputDocument::from_nfa(&nfa, "@")).unwrap();
        assert_eq!(json["transitions"]["1"]["@"], serde_json::json!([2]));
        assert_eq!(json["transitions"]["0"]["a"], serde_json::json!([1, 2]));
        assert_eq!(json["final"], serde_json::json!([2]));

        let json = serde_json::to_value(OutputDocument::from_dfa(nfa.dfa())).unwrap();
        assert_eq!(json["initial"], serde_json::json!(0));
        assert_eq!(json["transitions"]["0"]["a"], serde_json::json!(1));
        assert_eq!(json["alphabet"], serde_json::json!(["a", "b"]));
    }
}
