//! Breadth-first shortest path over unit adjacency
//!
//! Conversions are unweighted, so the shortest chain is the one with the
//! fewest hops. Neighbor lists keep insertion order, which pins down the
//! tie-break between equally short chains: the neighbor linked first wins.

use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;

/// Undirected adjacency view with ordered neighbor lists
#[derive(Debug, Clone)]
pub struct Adjacency<N> {
    nodes: Vec<N>,
    links: HashMap<N, Vec<N>>,
}

impl<N: Eq + Hash + Clone> Adjacency<N> {
    pub fn new() -> Self {
        Adjacency { nodes: Vec::new(), links: HashMap::new() }
    }

    /// Build from ordered pairs; each pair links both directions
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, N)>,
    {
        let mut adjacency = Self::new();
        for (a, b) in pairs {
            adjacency.link(a, b);
        }
        adjacency
    }

    /// Link `a` and `b` in both directions. Repeated links are ignored.
    pub fn link(&mut self, a: N, b: N) {
        self.push_neighbor(a.clone(), b.clone());
        self.push_neighbor(b, a);
    }

    fn push_neighbor(&mut self, node: N, neighbor: N) {
        if !self.links.contains_key(&node) {
            self.nodes.push(node.clone());
        }
        let neighbors = self.links.entry(node).or_default();
        if !neighbors.contains(&neighbor) {
            neighbors.push(neighbor);
        }
    }

    pub fn neighbors(&self, node: &N) -> &[N] {
        self.links.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, node: &N) -> bool {
        self.links.contains_key(node)
    }

    /// Nodes in first-appearance order
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<N: Eq + Hash + Clone> Default for Adjacency<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Find a shortest path between two nodes using BFS.
///
/// # Returns
/// * `Some(path)` - path from start to target, both inclusive; `[start]`
///   when `start == target`
/// * `None` - target is unreachable
pub fn shortest_path<N: Eq + Hash + Clone>(
    adjacency: &Adjacency<N>,
    start: &N,
    target: &N,
) -> Option<Vec<N>> {
    if start == target {
        return Some(vec![start.clone()]);
    }

    let mut visited: HashSet<&N> = HashSet::new();
    let mut parent: HashMap<&N, &N> = HashMap::new();
    let mut frontier: VecDeque<&N> = VecDeque::new();

    visited.insert(start);
    frontier.push_back(start);

    while let Some(current) = frontier.pop_front() {
        for neighbor in adjacency.neighbors(current) {
            if !visited.insert(neighbor) {
                continue;
            }
            parent.insert(neighbor, current);

            if neighbor == target {
                let mut path = vec![neighbor.clone()];
                let mut node = neighbor;
                while let Some(&prev) = parent.get(node) {
                    path.push(prev.clone());
                    node = prev;
                }
                path.reverse();
                return Some(path);
            }

            frontier.push_back(neighbor);
        }
    }

    None
}

/// Split a node path into consecutive `(from, to)` hops
pub fn hops<N: Clone>(path: &[N]) -> Vec<(N, N)> {
    path.windows(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect()
}
