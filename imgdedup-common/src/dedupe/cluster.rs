use std::collections::HashMap;

use crate::dedupe::store::{FingerprintStore, ImageHandle};
use crate::imghash::hamming::{Container, Distance, Fingerprint};

/// Two or more images whose fingerprints chain together within the
/// threshold. Members are sorted by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    members: Vec<ImageHandle>,
}

impl DuplicateGroup {
    pub fn members(&self) -> &[ImageHandle] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Partition the store into duplicate groups of size two or more.
///
/// Membership is transitive: a chain a-b-c with every link within the
/// threshold puts all three in one group, even when a and c themselves are
/// further apart. Entries with equal bits are merged up front, so the
/// threshold-0 case never pays for pairwise comparisons; above zero only one
/// representative per distinct bit pattern enters the pairwise pass, since
/// distance depends on nothing but the bits.
///
/// The same store and threshold always produce the same groups, whatever
/// order the entries arrived in.
pub fn cluster(store: &FingerprintStore, threshold: Distance) -> Vec<DuplicateGroup> {
    let mut buckets: HashMap<Container, Vec<usize>> = HashMap::new();
    for (index, (_, fingerprint)) in store.entries().iter().enumerate() {
        buckets.entry(fingerprint.bits()).or_default().push(index);
    }

    let mut set = DisjointSet::new(store.len());
    for indices in buckets.values() {
        for pair in indices.windows(2) {
            set.union(pair[0], pair[1]);
        }
    }

    if threshold > 0 {
        let reps: Vec<(Container, usize)> = buckets
            .iter()
            .map(|(bits, indices)| (*bits, indices[0]))
            .collect();
        for (i, &(bits_a, index_a)) in reps.iter().enumerate() {
            for &(bits_b, index_b) in &reps[i + 1..] {
                if Fingerprint::bit_distance(bits_a, bits_b) <= threshold {
                    set.union(index_a, index_b);
                }
            }
        }
    }

    let mut components: HashMap<usize, Vec<ImageHandle>> = HashMap::new();
    for (index, (handle, _)) in store.entries().iter().enumerate() {
        components
            .entry(set.find(index))
            .or_default()
            .push(handle.clone());
    }

    let mut groups: Vec<DuplicateGroup> = components
        .into_values()
        .filter(|members| members.len() >= 2)
        .map(|mut members| {
            members.sort_by(|a, b| a.path().cmp(b.path()));
            DuplicateGroup { members }
        })
        .collect();
    // the components came out of a hash map; pin down the output order
    groups.sort_by(|a, b| a.members[0].path().cmp(b.members[0].path()));

    log::debug!(
        "{} entries formed {} duplicate groups at threshold {threshold}",
        store.len(),
        groups.len()
    );

    groups
}

/// Arena-indexed disjoint-set with path halving and union by rank.
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}
