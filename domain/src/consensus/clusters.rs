//! Opinion clustering
//!
//! Partitions participants into clusters of aligned opinion. Pairs whose
//! similarity clears the threshold become weighted edges of an undirected
//! graph; a greedy modularity-maximizing merge then finds communities in
//! that graph. Participants with no qualifying edge stand alone.

use super::encoder::PositionVector;
use super::similarity::SimilarityMatrix;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

/// Default similarity threshold for linking two opinions
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

/// A group of participants holding aligned opinions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpinionCluster {
    /// Sequential id, 1-based, in detection order
    pub id: usize,
    /// Participant identifiers in this cluster
    pub members: Vec<String>,
    /// Mean pairwise similarity among members; 1.0 for singletons, since
    /// an isolated opinion is trivially self-consistent
    pub cohesion: f64,
}

impl OpinionCluster {
    /// Number of members
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Whether the cluster holds a single participant
    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }
}

/// Detects opinion clusters via thresholded-graph community detection.
///
/// The community step is a standard greedy modularity merge and is
/// deterministic: equal inputs always produce equal clusters.
#[derive(Debug, Clone)]
pub struct ClusterDetector {
    threshold: f64,
}

impl Default for ClusterDetector {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl ClusterDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The similarity threshold edges must clear
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Partition participants into opinion clusters.
    ///
    /// Tolerates zero participants (empty result) and one participant
    /// (a single singleton cluster). `vectors` and `participants` must be
    /// parallel slices.
    pub fn detect(
        &self,
        vectors: &[PositionVector],
        participants: &[String],
    ) -> Vec<OpinionCluster> {
        debug_assert_eq!(vectors.len(), participants.len());
        let count = vectors.len().min(participants.len());
        if count == 0 {
            return Vec::new();
        }

        let matrix = SimilarityMatrix::from_vectors(vectors);

        // Thresholded similarity graph; node payloads are participant indices
        let mut graph = UnGraph::<usize, f64>::new_undirected();
        let nodes: Vec<NodeIndex> = (0..count).map(|i| graph.add_node(i)).collect();
        for i in 0..count {
            for j in (i + 1)..count {
                let similarity = matrix.get(i, j);
                if similarity > self.threshold {
                    graph.add_edge(nodes[i], nodes[j], similarity);
                }
            }
        }

        let mut communities = greedy_modularity_communities(&graph);

        // Detection order: larger communities first, then by earliest member
        communities.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a[0].cmp(&b[0])));

        // Isolated participants come last, as singletons, in input order
        for (i, node) in nodes.iter().enumerate() {
            if graph.edges(*node).next().is_none() {
                communities.push(vec![i]);
            }
        }

        communities
            .into_iter()
            .enumerate()
            .map(|(seq, indices)| {
                let cohesion = if indices.len() < 2 {
                    1.0
                } else {
                    matrix.mean_among(&indices)
                };
                OpinionCluster {
                    id: seq + 1,
                    members: indices.iter().map(|&i| participants[i].clone()).collect(),
                    cohesion,
                }
            })
            .collect()
    }
}

/// Greedy modularity merge (Clauset-Newman-Moore style) over the
/// thresholded similarity graph.
///
/// Starts with every connected node in its own community and repeatedly
/// merges the connected pair with the largest positive modularity gain.
/// Ties resolve to the earliest pair, keeping the result deterministic.
/// Isolated nodes are not returned; the caller appends them.
fn greedy_modularity_communities(graph: &UnGraph<usize, f64>) -> Vec<Vec<usize>> {
    let total_weight: f64 = graph.edge_references().map(|e| *e.weight()).sum();
    if total_weight <= 0.0 {
        return Vec::new();
    }

    // Weighted degree per participant index
    let mut degree = vec![0.0; graph.node_count()];
    let mut adjacency: Vec<(usize, usize, f64)> = Vec::with_capacity(graph.edge_count());
    for edge in graph.edge_references() {
        let (a, b) = (graph[edge.source()], graph[edge.target()]);
        let w = *edge.weight();
        degree[a] += w;
        degree[b] += w;
        adjacency.push((a.min(b), a.max(b), w));
    }

    let mut communities: Vec<Vec<usize>> = graph
        .node_indices()
        .filter(|n| graph.edges(*n).next().is_some())
        .map(|n| vec![graph[n]])
        .collect();

    loop {
        let mut best: Option<(f64, usize, usize)> = None;

        for a in 0..communities.len() {
            for b in (a + 1)..communities.len() {
                let between = weight_between(&adjacency, &communities[a], &communities[b]);
                if between <= 0.0 {
                    continue;
                }
                let degree_a: f64 = communities[a].iter().map(|&i| degree[i]).sum();
                let degree_b: f64 = communities[b].iter().map(|&i| degree[i]).sum();
                let gain = between / total_weight
                    - (degree_a * degree_b) / (2.0 * total_weight * total_weight);
                if best.is_none_or(|(g, _, _)| gain > g) {
                    best = Some((gain, a, b));
                }
            }
        }

        match best {
            Some((gain, a, b)) if gain > 0.0 => {
                let merged = communities.remove(b);
                communities[a].extend(merged);
                communities[a].sort_unstable();
            }
            _ => break,
        }
    }

    communities
}

/// Total weight of edges crossing between two member sets
fn weight_between(adjacency: &[(usize, usize, f64)], a: &[usize], b: &[usize]) -> f64 {
    adjacency
        .iter()
        .filter(|(x, y, _)| {
            (a.contains(x) && b.contains(y)) || (a.contains(y) && b.contains(x))
        })
        .map(|(_, _, w)| w)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(values: Vec<f64>) -> PositionVector {
        let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
        PositionVector::new(values.into_iter().map(|v| v / norm).collect())
    }

    fn names(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_participants_yields_no_clusters() {
        let clusters = ClusterDetector::new().detect(&[], &[]);
        assert!(clusters.is_empty());
    }

    #[test]
    fn test_single_participant_is_a_singleton() {
        let clusters =
            ClusterDetector::new().detect(&[unit(vec![1.0, 0.0])], &names(&["solo"]));

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].id, 1);
        assert_eq!(clusters[0].members, vec!["solo"]);
        assert_eq!(clusters[0].cohesion, 1.0);
    }

    #[test]
    fn test_identical_positions_form_one_cluster() {
        let v = unit(vec![0.7, 0.3, 0.6]);
        let vectors = vec![v.clone(), v.clone(), v.clone(), v];
        let participants = names(&["a", "b", "c", "d"]);

        let clusters = ClusterDetector::new().detect(&vectors, &participants);

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].size(), 4);
        assert!((clusters[0].cohesion - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_orthogonal_positions_form_singletons() {
        let vectors = vec![
            PositionVector::new(vec![1.0, 0.0, 0.0]),
            PositionVector::new(vec![0.0, 1.0, 0.0]),
            PositionVector::new(vec![0.0, 0.0, 1.0]),
        ];
        let participants = names(&["a", "b", "c"]);

        let clusters = ClusterDetector::new().detect(&vectors, &participants);

        assert_eq!(clusters.len(), 3);
        assert!(clusters.iter().all(|c| c.is_singleton()));
        assert!(clusters.iter().all(|c| c.cohesion == 1.0));
        // singletons keep input order
        assert_eq!(clusters[0].members, vec!["a"]);
        assert_eq!(clusters[2].members, vec!["c"]);
    }

    #[test]
    fn test_two_camps_split_into_two_clusters() {
        let camp_one = unit(vec![1.0, 0.05, 0.0]);
        let camp_two = unit(vec![0.0, 0.05, 1.0]);
        let vectors = vec![
            camp_one.clone(),
            camp_one.clone(),
            camp_two.clone(),
            camp_two,
        ];
        let participants = names(&["a", "b", "c", "d"]);

        let clusters = ClusterDetector::new().detect(&vectors, &participants);

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].size(), 2);
        assert_eq!(clusters[1].size(), 2);
        let mut all: Vec<_> = clusters.iter().flat_map(|c| c.members.clone()).collect();
        all.sort();
        assert_eq!(all, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_ids_are_sequential_from_one() {
        let vectors = vec![
            PositionVector::new(vec![1.0, 0.0]),
            PositionVector::new(vec![0.0, 1.0]),
        ];
        let clusters = ClusterDetector::new().detect(&vectors, &names(&["a", "b"]));
        let ids: Vec<usize> = clusters.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_degenerate_positions_stand_alone() {
        let v = unit(vec![0.6, 0.4]);
        let vectors = vec![
            v.clone(),
            v,
            PositionVector::degenerate(vec![0.5, 0.5]),
        ];
        let participants = names(&["a", "b", "ghost"]);

        let clusters = ClusterDetector::new().detect(&vectors, &participants);

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members, vec!["a", "b"]);
        assert_eq!(clusters[1].members, vec!["ghost"]);
    }

    #[test]
    fn test_threshold_controls_linking() {
        // similarity between these is ~0.8
        let a = unit(vec![1.0, 0.5]);
        let b = unit(vec![0.5, 1.0]);

        let strict = ClusterDetector::with_threshold(0.95);
        let lenient = ClusterDetector::with_threshold(0.5);
        let participants = names(&["a", "b"]);

        assert_eq!(strict.detect(&[a.clone(), b.clone()], &participants).len(), 2);
        assert_eq!(lenient.detect(&[a, b], &participants).len(), 1);
    }
}
