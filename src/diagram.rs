use itertools::Itertools;

use crate::{
    automaton::{Automaton, Targets},
    Show, StateIndex, Symbol,
};

/// A state of a [`Diagram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagramNode {
    /// The state.
    pub state: StateIndex,
    /// Whether the state is the initial state.
    pub initial: bool,
    /// Whether the state is accepting.
    pub accepting: bool,
}

/// A single edge of a [`Diagram`]. A nondeterministic transition with several targets is split
/// into one edge per target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramEdge<L> {
    /// The origin of the edge.
    pub source: StateIndex,
    /// The label, which may be epsilon for an [`crate::Nfa`].
    pub label: L,
    /// The target of the edge.
    pub target: StateIndex,
}

/// Describes an automaton as a graph for rendering, i.e. it contains one node per declared state
/// and one edge per (origin, label, target) triple. Nodes are listed in declaration order, edges
/// ordered by origin, label and target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram<L> {
    /// The states.
    pub nodes: Vec<DiagramNode>,
    /// The transitions.
    pub edges: Vec<DiagramEdge<L>>,
}

fn dot_state_ident(q: StateIndex) -> String {
    format!("q{}", q.show())
}

fn dot_escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

impl<L: Clone + Show> Diagram<L> {
    /// Builds the diagram of the given automaton.
    pub fn from_automaton<S: Symbol, K: Symbol + Into<L>, T: Targets>(
        automaton: &Automaton<S, K, T>,
    ) -> Self {
        let nodes = automaton
            .states()
            .iter()
            .map(|&state| DiagramNode {
                state,
                initial: state == automaton.initial(),
                accepting: automaton.is_final(state),
            })
            .collect();
        let edges = automaton
            .triples()
            .flat_map(|(source, label, targets)| {
                targets.targets().map(move |target| DiagramEdge {
                    source,
                    label: label.clone().into(),
                    target,
                })
            })
            .collect();
        Self { nodes, edges }
    }

    /// The node belonging to the initial state.
    pub fn initial(&self) -> Option<&DiagramNode> {
        self.nodes.iter().find(|node| node.initial)
    }

    /// Compute the graphviz representation, for more information on the DOT format,
    /// see the [graphviz documentation](https://graphviz.org/doc/info/lang.html).
    /// The initial state is marked by an arrow coming from an invisible node, accepting states
    /// are drawn with a double circle.
    pub fn dot_representation(&self, name: &str) -> String {
        let name: String = name
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        let header = [
            format!("digraph {} {{", if name.is_empty() { "A" } else { &name }),
            "rankdir=LR".to_string(),
            "fake [style=invisible]".to_string(),
        ];

        let states = self.nodes.iter().map(|node| {
            format!(
                "{} [label=\"{}\", shape={}]",
                dot_state_ident(node.state),
                node.state.show(),
                if node.accepting {
                    "doublecircle"
                } else {
                    "circle"
                }
            )
        });

        let entry = self
            .initial()
            .map(|node| format!("fake -> {} [style=bold]", dot_state_ident(node.state)));

        let transitions = self.edges.iter().map(|edge| {
            format!(
                "{} -> {} [label=\"{}\"]",
                dot_state_ident(edge.source),
                dot_state_ident(edge.target),
                dot_escape(&edge.label.show())
            )
        });

        header
            .into_iter()
            .chain(states)
            .chain(entry)
            .chain(transitions)
            .chain(std::iter::once("}".to_string()))
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn nfa_edges_are_split_per_target() {
        let nfa = Nfa::builder()
            .with_states([0, 1, 2])
            .with_alphabet(['a'])
            .with_transitions([(0, 'a', 1), (0, 'a', 2)])
            .with_epsilon(1, 2)
            .with_initial(0)
            .with_finals([2])
            .build()
            .unwrap();
        let diagram = nfa.diagram();
        assert_eq!(
            diagram.nodes[2],
            DiagramNode {
                state: 2,
                initial: false,
                accepting: true
            }
        );
        assert_eq!(diagram.initial().map(|n| n.state), Some(0));
        assert_eq!(
            diagram.edges,
            vec![
                DiagramEdge {
                    source: 0,
                    label: Label::Symbol('a'),
                    target: 1
                },
                DiagramEdge {
                    source: 0,
                    label: Label::Symbol('a'),
                    target: 2
                },
                DiagramEdge {
                    source: 1,
                    label: Label::Epsilon,
                    target: 2
                },
            ]
        );

        let dot = diagram.dot_representation("nfa");
        assert!(dot.starts_with("digraph nfa {"));
        assert!(dot.contains("fake -> q0"));
        assert!(dot.contains("q2 [label=\"2\", shape=doublecircle]"));
        assert!(dot.contains("q1 -> q2 [label=\"ε\"]"));
        assert!(dot.ends_with('}'));
    }

    #[test]
    fn dfa_diagram_shows_the_trap_state() {
        let nfa = Nfa::builder()
            .with_states([0])
            .with_alphabet(["x".to_string()])
            .with_initial(0)
            .build()
            .unwrap();
        let diagram = nfa.to_dfa().diagram();
        assert_eq!(diagram.nodes.len(), 2);
        assert!(diagram.nodes.iter().all(|n| !n.accepting));
        assert_eq!(diagram.edges.len(), 2);
        assert!(diagram
            .dot_representation("dfa")
            .contains("q1 -> q1 [label=\"x\"]"));
    }
}
