use std::collections::{BTreeMap, BTreeSet};

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// Type alias for sets whose iteration order is observable, e.g. in exports.
pub type OrderedSet<S> = BTreeSet<S>;
/// Type alias for maps whose iteration order is observable, e.g. in exports.
pub type OrderedMap<K, V> = BTreeMap<K, V>;

/// Represents a bijective mapping between `L` and `R`, that is a mapping which associates
/// each `L` with precisely one `R` and vice versa.
pub type Bijection<L, R> = bimap::BiBTreeMap<L, R>;

/// The classes of an equivalence relation on elements of type `I`. Two partitions are equal if
/// they have the same classes, regardless of the order in which the classes are listed.
#[derive(Debug, Clone)]
pub struct Partition<I: Ord>(Vec<BTreeSet<I>>);

impl<I: Ord> PartialEq for Partition<I> {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().all(|class| other.0.contains(class))
    }
}
impl<I: Ord> Eq for Partition<I> {}

impl<I: Ord> Partition<I> {
    /// Builds a partition from an iterator over the classes.
    pub fn new<X: IntoIterator<Item = I>, Y: IntoIterator<Item = X>>(iter: Y) -> Self {
        Self(
            iter.into_iter()
                .map(|class| class.into_iter().collect())
                .collect(),
        )
    }

    /// The number of classes.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the classes.
    pub fn iter(&self) -> impl Iterator<Item = &BTreeSet<I>> + '_ {
        self.0.iter()
    }
}
