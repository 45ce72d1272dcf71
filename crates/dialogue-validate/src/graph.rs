//! Dense adjacency over unique node ids
//!
//! Nodes are addressed by declaration index so every traversal visits them in
//! the same order for the same input. All walks are iterative; dialog graphs
//! with tens of thousands of nodes must not exhaust the stack.

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

/// Adjacency for the edges whose endpoints both resolved
#[derive(Debug)]
pub(crate) struct Graph<'a> {
    ids: Vec<&'a str>,
    outgoing: Vec<Vec<usize>>,
    in_degree: Vec<usize>,
    connected: Vec<bool>,
}

impl<'a> Graph<'a> {
    pub(crate) fn with_nodes(ids: Vec<&'a str>) -> Self {
        let len = ids.len();
        Self {
            ids,
            outgoing: vec![Vec::new(); len],
            in_degree: vec![0; len],
            connected: vec![false; len],
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.ids.len()
    }

    pub(crate) fn id(&self, index: usize) -> &'a str {
        self.ids[index]
    }

    /// Add `source → target`; parallel edges collapse
    pub(crate) fn connect(&mut self, source: usize, target: usize) {
        self.connected[source] = true;
        self.connected[target] = true;
        if !self.outgoing[source].contains(&target) {
            self.outgoing[source].push(target);
            self.in_degree[target] += 1;
        }
    }

    /// Mark a node as having an edge without adding adjacency (self-loops)
    pub(crate) fn touch(&mut self, node: usize) {
        self.connected[node] = true;
    }

    pub(crate) fn is_connected(&self, node: usize) -> bool {
        self.connected[node]
    }

    /// Nodes without incoming edges, in declaration order
    pub(crate) fn roots(&self) -> Vec<usize> {
        (0..self.len()).filter(|&i| self.in_degree[i] == 0).collect()
    }

    pub(crate) fn leaf_count(&self) -> usize {
        self.outgoing.iter().filter(|out| out.is_empty()).count()
    }

    /// Shortest distance from the nearest root; `None` when unreachable
    pub(crate) fn depths(&self, roots: &[usize]) -> Vec<Option<usize>> {
        let mut depth = vec![None; self.len()];
        let mut queue = VecDeque::with_capacity(roots.len());
        for &root in roots {
            depth[root] = Some(0);
            queue.push_back(root);
        }
        while let Some(node) = queue.pop_front() {
            let next = depth[node].map_or(0, |d| d + 1);
            for &child in &self.outgoing[node] {
                if depth[child].is_none() {
                    depth[child] = Some(next);
                    queue.push_back(child);
                }
            }
        }
        depth
    }

    /// Every back edge found by a depth-first walk
    ///
    /// Each back edge counts toward [`Cycles::total`], but only the first
    /// `max_paths` keep a path. A kept path starts at the node the back edge
    /// returns to and repeats it at the end, `[a, b, c, a]`. Paths longer than
    /// `max_len` nodes keep their first `max_len` nodes before the closing one.
    pub(crate) fn cycles(&self, max_paths: usize, max_len: usize) -> Cycles {
        let mut mark = vec![Mark::Unvisited; self.len()];
        // Stack position of every node marked `OnStack`.
        let mut position = vec![0; self.len()];
        let mut stack: Vec<(usize, usize)> = Vec::new();
        let mut cycles = Cycles::default();

        for start in 0..self.len() {
            if mark[start] != Mark::Unvisited {
                continue;
            }
            mark[start] = Mark::OnStack;
            stack.push((start, 0));

            while let Some(frame) = stack.last_mut() {
                let (node, cursor) = *frame;
                let Some(&child) = self.outgoing[node].get(cursor) else {
                    mark[node] = Mark::Done;
                    stack.pop();
                    continue;
                };
                frame.1 += 1;

                match mark[child] {
                    Mark::Unvisited => {
                        mark[child] = Mark::OnStack;
                        position[child] = stack.len();
                        stack.push((child, 0));
                    }
                    Mark::OnStack => {
                        cycles.total += 1;
                        if cycles.paths.len() < max_paths {
                            let from = position[child];
                            let len = stack.len() - from;
                            let mut nodes: Vec<usize> = stack[from..from + len.min(max_len)]
                                .iter()
                                .map(|&(n, _)| n)
                                .collect();
                            nodes.push(child);
                            cycles.paths.push(CyclePath { nodes, len });
                        }
                    }
                    Mark::Done => {}
                }
            }
        }
        cycles
    }
}

/// Back edges found by [`Graph::cycles`]
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Cycles {
    pub(crate) paths: Vec<CyclePath>,
    pub(crate) total: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct CyclePath {
    /// Closed, possibly truncated, path
    pub(crate) nodes: Vec<usize>,
    /// Distinct nodes on the full cycle
    pub(crate) len: usize,
}

impl CyclePath {
    pub(crate) fn is_truncated(&self) -> bool {
        self.nodes.len() <= self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(len: usize, edges: &[(usize, usize)]) -> Graph<'static> {
        const IDS: [&str; 8] = ["a", "b", "c", "d", "e", "f", "g", "h"];
        let mut graph = Graph::with_nodes(IDS[..len].to_vec());
        for &(s, t) in edges {
            graph.connect(s, t);
        }
        graph
    }

    #[test]
    fn triangle_reports_closed_path() {
        let g = graph(3, &[(0, 1), (1, 2), (2, 0)]);
        let cycles = g.cycles(10, 10);
        assert_eq!(cycles.total, 1);
        assert_eq!(
            cycles.paths,
            vec![CyclePath {
                nodes: vec![0, 1, 2, 0],
                len: 3
            }]
        );
        assert!(!cycles.paths[0].is_truncated());
        assert!(g.roots().is_empty());
    }

    #[test]
    fn diamond_has_no_cycle() {
        let g = graph(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        assert_eq!(g.cycles(10, 10), Cycles::default());
        assert_eq!(g.roots(), vec![0]);
        assert_eq!(g.leaf_count(), 1);
    }

    #[test]
    fn parallel_edges_collapse() {
        let g = graph(2, &[(0, 1), (0, 1)]);
        assert_eq!(g.in_degree[1], 1);
        assert_eq!(g.outgoing[0], vec![1]);
    }

    #[test]
    fn depths_use_shortest_path() {
        // a → b → c → d and a → d
        let g = graph(4, &[(0, 1), (1, 2), (2, 3), (0, 3)]);
        let depth = g.depths(&g.roots());
        assert_eq!(depth, vec![Some(0), Some(1), Some(2), Some(1)]);
    }

    #[test]
    fn unreachable_cycle_has_no_depth() {
        let g = graph(3, &[(1, 2), (2, 1)]);
        let depth = g.depths(&g.roots());
        assert_eq!(depth, vec![Some(0), None, None]);
        assert!(!g.is_connected(0));
    }

    #[test]
    fn long_chain_does_not_overflow() {
        let ids: Vec<String> = (0..50_000).map(|i| format!("n{i}")).collect();
        let mut g = Graph::with_nodes(ids.iter().map(String::as_str).collect());
        for i in 1..ids.len() {
            g.connect(i - 1, i);
        }
        g.connect(ids.len() - 1, 0);
        let cycles = g.cycles(10, 16);
        assert_eq!(cycles.total, 1);
        let path = &cycles.paths[0];
        assert_eq!(path.len, ids.len());
        assert_eq!(path.nodes.len(), 17);
        assert_eq!(path.nodes.first(), path.nodes.last());
        assert!(path.is_truncated());
    }

    #[test]
    fn back_edges_into_long_chain_stay_bounded() {
        // Chain of n nodes whose tail points back at every earlier node.
        let n = 5_000;
        let ids: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
        let mut g = Graph::with_nodes(ids.iter().map(String::as_str).collect());
        for i in 1..n {
            g.connect(i - 1, i);
        }
        for i in 0..n - 1 {
            g.connect(n - 1, i);
        }

        let cycles = g.cycles(100, 16);
        assert_eq!(cycles.total, n - 1);
        assert_eq!(cycles.paths.len(), 100);
        assert!(cycles.paths.iter().all(|p| p.nodes.len() <= 17));
        assert!(cycles
            .paths
            .iter()
            .all(|p| p.nodes.first() == p.nodes.last()));
    }
}
