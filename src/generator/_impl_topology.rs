use crate::generator::{EdgeSet, SeedStream, TopologyModel};
use log::debug;
use std::collections::BTreeSet;

impl TopologyModel {
    /// Generate the edges of this model over vertices `0..num_vars`.
    ///
    /// The `Random` model yields directed edges in row-major (source-major) order, the
    /// other two models yield undirected `(min, max)` pairs in ascending order.
    pub fn generate_edges(&self, num_vars: usize, seed: u64) -> EdgeSet {
        let mut stream = SeedStream::new(seed);
        let edges = match *self {
            TopologyModel::Random { probability } => {
                EdgeSet::Directed(random_edges(num_vars, probability, &mut stream))
            }
            TopologyModel::WattsStrogatz {
                neighbours,
                rewire_probability,
            } => EdgeSet::Undirected(watts_strogatz_edges(
                num_vars,
                neighbours,
                rewire_probability,
                &mut stream,
            )),
            TopologyModel::BarabasiAlbert { connections } => {
                EdgeSet::Undirected(barabasi_albert_edges(num_vars, connections, &mut stream))
            }
        };
        debug!(
            "Generated {} edges over {} vertices using {:?}.",
            edges.len(),
            num_vars,
            self
        );
        edges
    }

    /// The file name fragment identifying this model and its parameters
    /// (`rand_<p>`, `ws_<k>_<beta>` or `ba_<m>`).
    pub fn file_tag(&self) -> String {
        match self {
            TopologyModel::Random { probability } => format!("rand_{:?}", probability),
            TopologyModel::WattsStrogatz {
                neighbours,
                rewire_probability,
            } => format!("ws_{}_{:?}", neighbours, rewire_probability),
            TopologyModel::BarabasiAlbert { connections } => format!("ba_{}", connections),
        }
    }
}

impl EdgeSet {
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn is_directed(&self) -> bool {
        matches!(self, EdgeSet::Directed(_))
    }

    /// The edges in enumeration order.
    pub fn as_slice(&self) -> &[(usize, usize)] {
        match self {
            EdgeSet::Directed(edges) | EdgeSet::Undirected(edges) => edges,
        }
    }
}

/// Every ordered pair `(i, j)`, `i != j`, becomes the edge `i -> j` with the given probability.
fn random_edges(num_vars: usize, probability: f64, stream: &mut SeedStream) -> Vec<(usize, usize)> {
    let mut edges = Vec::new();
    for source in 0..num_vars {
        for target in 0..num_vars {
            if source != target && stream.chance(probability) {
                edges.push((source, target));
            }
        }
    }
    edges
}

/// Ring lattice with `neighbours / 2` neighbours on each side, followed by random rewiring.
fn watts_strogatz_edges(
    num_vars: usize,
    neighbours: usize,
    rewire_probability: f64,
    stream: &mut SeedStream,
) -> Vec<(usize, usize)> {
    let half = neighbours / 2;
    let mut adjacency: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); num_vars];
    for distance in 1..=half {
        for u in 0..num_vars {
            let v = (u + distance) % num_vars;
            adjacency[u].insert(v);
            adjacency[v].insert(u);
        }
    }

    for distance in 1..=half {
        for u in 0..num_vars {
            let v = (u + distance) % num_vars;
            if !stream.chance(rewire_probability) {
                continue;
            }
            let candidates: Vec<usize> = (0..num_vars)
                .filter(|w| *w != u && !adjacency[u].contains(w))
                .collect();
            // When `u` is connected to everything, the edge stays.
            if let Some(&w) = stream.pick(&candidates) {
                adjacency[u].remove(&v);
                adjacency[v].remove(&u);
                adjacency[u].insert(w);
                adjacency[w].insert(u);
            }
        }
    }

    adjacency
        .iter()
        .enumerate()
        .flat_map(|(u, neighbours)| {
            neighbours
                .iter()
                .filter(move |v| **v > u)
                .map(move |v| (u, *v))
        })
        .collect()
}

/// Preferential attachment starting from a star over `0..=connections` (centred in `0`).
fn barabasi_albert_edges(
    num_vars: usize,
    connections: usize,
    stream: &mut SeedStream,
) -> Vec<(usize, usize)> {
    let mut edges = BTreeSet::new();
    // Every vertex appears here once per incident edge.
    let mut repeated = Vec::new();
    for leaf in 1..=connections {
        edges.insert((0, leaf));
    }
    repeated.extend(std::iter::repeat(0).take(connections));
    repeated.extend(1..=connections);

    for source in (connections + 1)..num_vars {
        let mut targets = BTreeSet::new();
        while targets.len() < connections {
            if let Some(&target) = stream.pick(&repeated) {
                targets.insert(target);
            }
        }
        for target in &targets {
            edges.insert((*target, source));
        }
        repeated.extend(targets.iter().copied());
        repeated.extend(std::iter::repeat(source).take(connections));
    }
    edges.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use crate::generator::TopologyModel;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(10, 2, 0.0)]
    #[case(10, 4, 0.3)]
    #[case(25, 5, 0.9)]
    #[case(7, 6, 1.0)]
    fn watts_strogatz_preserves_edge_count(
        #[case] num_vars: usize,
        #[case] neighbours: usize,
        #[case] rewire_probability: f64,
    ) {
        let model = TopologyModel::WattsStrogatz {
            neighbours,
            rewire_probability,
        };
        for seed in 0..5 {
            let edges = model.generate_edges(num_vars, seed);
            assert!(!edges.is_directed());
            assert_eq!(edges.len(), num_vars * (neighbours / 2));
            for (u, v) in edges.as_slice() {
                assert!(u < v && *v < num_vars);
            }
            let mut sorted = edges.as_slice().to_vec();
            sorted.sort();
            assert_eq!(sorted, edges.as_slice());
        }
    }

    #[test]
    fn watts_strogatz_without_rewiring_is_a_ring() {
        let model = TopologyModel::WattsStrogatz {
            neighbours: 2,
            rewire_probability: 0.0,
        };
        let edges = model.generate_edges(4, 1);
        assert_eq!(edges.as_slice(), &[(0, 1), (0, 3), (1, 2), (2, 3)]);
    }

    #[rstest]
    #[case(2, 1)]
    #[case(10, 2)]
    #[case(30, 3)]
    #[case(6, 5)]
    fn barabasi_albert_edge_count(#[case] num_vars: usize, #[case] connections: usize) {
        let model = TopologyModel::BarabasiAlbert { connections };
        for seed in 0..5 {
            let edges = model.generate_edges(num_vars, seed);
            assert_eq!(
                edges.len(),
                connections + connections * (num_vars - connections - 1)
            );
            // Every added vertex attaches to exactly `connections` older vertices.
            for source in (connections + 1)..num_vars {
                let older = edges
                    .as_slice()
                    .iter()
                    .filter(|(u, v)| *v == source && *u < source)
                    .count();
                assert_eq!(older, connections);
            }
        }
    }

    #[test]
    fn random_model_has_no_self_loops() {
        let full = TopologyModel::Random { probability: 1.0 }.generate_edges(5, 42);
        assert!(full.is_directed());
        assert_eq!(full.len(), 20);
        assert_eq!(&full.as_slice()[..4], &[(0, 1), (0, 2), (0, 3), (0, 4)]);
        assert!(full.as_slice().iter().all(|(u, v)| u != v));

        let sparse = TopologyModel::Random { probability: 0.3 };
        assert_eq!(sparse.generate_edges(12, 3), sparse.generate_edges(12, 3));
    }

    #[test]
    fn file_tags() {
        assert_eq!(TopologyModel::Random { probability: 1.0 }.file_tag(), "rand_1.0");
        let ws = TopologyModel::WattsStrogatz {
            neighbours: 4,
            rewire_probability: 0.25,
        };
        assert_eq!(ws.file_tag(), "ws_4_0.25");
        assert_eq!(TopologyModel::BarabasiAlbert { connections: 3 }.file_tag(), "ba_3");
    }
}
