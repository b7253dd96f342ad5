//! Emission Ordering
//!
//! Orders emitted types dependencies-first so the document never forward
//! references an undefined name outside of cycles. Cyclic references are
//! condensed into strongly connected components; the SCC DAG is ordered by
//! Kahn's algorithm with ready components released smallest-declared-index
//! first, and members of a component are emitted in declared order (their
//! intra-cycle references become forward references resolved by name).
//! The result is a total order that is stable across runs.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

/// Compute the emission order for `count` classifiers, where `deps[i]`
/// lists the declared indices that classifier `i` references (deduplicated,
/// no self-entries). Returns a permutation of `0..count`.
pub(super) fn emission_order(count: usize, deps: &[Vec<usize>]) -> Vec<usize> {
    let edge_count = deps.iter().map(Vec::len).sum();
    let mut graph: DiGraph<(), ()> = DiGraph::with_capacity(count, edge_count);
    let nodes: Vec<NodeIndex> = (0..count).map(|_| graph.add_node(())).collect();
    for (dependent, dep_list) in deps.iter().enumerate() {
        for &dep in dep_list {
            graph.add_edge(nodes[dep], nodes[dependent], ());
        }
    }

    let sccs = kosaraju_scc(&graph);
    let mut scc_of = vec![0usize; count];
    for (scc_id, members) in sccs.iter().enumerate() {
        for node in members {
            scc_of[node.index()] = scc_id;
        }
    }
    // Tie-break key: smallest declared index in the component
    let scc_key: Vec<usize> = sccs
        .iter()
        .map(|members| {
            members
                .iter()
                .map(|n| n.index())
                .min()
                .unwrap_or(usize::MAX)
        })
        .collect();

    // Condense to the SCC DAG
    let mut scc_indegree = vec![0usize; sccs.len()];
    let mut scc_successors: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); sccs.len()];
    for edge in graph.edge_references() {
        let from = scc_of[edge.source().index()];
        let to = scc_of[edge.target().index()];
        if from != to && scc_successors[from].insert(to) {
            scc_indegree[to] += 1;
        }
    }

    let mut ready: BinaryHeap<Reverse<(usize, usize)>> = scc_indegree
        .iter()
        .enumerate()
        .filter(|(_, &indegree)| indegree == 0)
        .map(|(scc_id, _)| Reverse((scc_key[scc_id], scc_id)))
        .collect();

    let mut order = Vec::with_capacity(count);
    while let Some(Reverse((_, scc_id))) = ready.pop() {
        let mut members: Vec<usize> = sccs[scc_id].iter().map(|n| n.index()).collect();
        members.sort_unstable();
        order.extend(members);

        for &successor in &scc_successors[scc_id] {
            scc_indegree[successor] -= 1;
            if scc_indegree[successor] == 0 {
                ready.push(Reverse((scc_key[successor], successor)));
            }
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_deps_keeps_declared_order() {
        let deps = vec![vec![], vec![], vec![]];
        assert_eq!(emission_order(3, &deps), vec![0, 1, 2]);
    }

    #[test]
    fn test_dependency_comes_first() {
        // 0 references 2: emit 2 before 0
        let deps = vec![vec![2], vec![], vec![]];
        assert_eq!(emission_order(3, &deps), vec![1, 2, 0]);
    }

    #[test]
    fn test_chain() {
        // 0 -> 1 -> 2 (each references the next)
        let deps = vec![vec![1], vec![2], vec![]];
        assert_eq!(emission_order(3, &deps), vec![2, 1, 0]);
    }

    #[test]
    fn test_cycle_kept_together_in_declared_order() {
        // 1 and 2 reference each other; 0 is independent
        let deps = vec![vec![], vec![2], vec![1]];
        assert_eq!(emission_order(3, &deps), vec![0, 1, 2]);
    }

    #[test]
    fn test_cycle_precedes_its_dependents() {
        // 0 references the 1<->2 cycle: the cycle is emitted before 0
        let deps = vec![vec![1], vec![2], vec![1]];
        assert_eq!(emission_order(3, &deps), vec![1, 2, 0]);
    }

    #[test]
    fn test_determinism() {
        let deps = vec![vec![3], vec![0, 3], vec![1], vec![], vec![2, 0]];
        let first = emission_order(5, &deps);
        assert_eq!(first, emission_order(5, &deps));
        assert_eq!(first, vec![3, 0, 1, 2, 4]);
    }
}
