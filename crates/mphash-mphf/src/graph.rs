//! Hypergraph peeling and vertex assignment.
//!
//! A key set yields a perfect hash function exactly when its 3-hypergraph
//! can be peeled to nothing by repeatedly removing an edge that owns a
//! vertex of degree one. Walking the peel order backwards, every edge still
//! has that vertex free, so it can be given a value in `0..ARITY` that makes
//! the edge's vertex values sum to the free vertex's slot.

use crate::hash_tuple::ARITY;

/// Value of a vertex that is not the chosen vertex of any key.
pub const UNASSIGNED: u8 = ARITY as u8;

/// One peeled edge: its index and the slot (0..ARITY) of the vertex it was
/// peeled through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Peeled {
    pub edge: usize,
    pub slot: usize,
}

/// Peel a hypergraph over `vertex_count` vertices.
///
/// Returns `None` if the graph has a 2-core, i.e. some edges can never be
/// peeled.
pub fn peel(edges: &[[usize; ARITY]], vertex_count: usize) -> Option<Vec<Peeled>> {
    // Incident (edge, slot) pairs per vertex.
    let mut incident: Vec<Vec<(usize, usize)>> = vec![Vec::new(); vertex_count];
    for (index, edge) in edges.iter().enumerate() {
        for (slot, &vertex) in edge.iter().enumerate() {
            incident[vertex].push((index, slot));
        }
    }

    let mut order = Vec::with_capacity(edges.len());
    let mut stack = Vec::new();
    for start in 0..vertex_count {
        if incident[start].len() != 1 {
            continue;
        }
        stack.push(start);
        while let Some(vertex) = stack.pop() {
            // Degrees only fall, so a stacked vertex has degree 0 or 1.
            let Some(&(index, slot)) = incident[vertex].first() else {
                continue;
            };
            order.push(Peeled { edge: index, slot });

            for &other in &edges[index] {
                incident[other].retain(|&(e, _)| e != index);
                if incident[other].len() == 1 {
                    stack.push(other);
                }
            }
        }
    }

    if order.len() == edges.len() {
        Some(order)
    } else {
        None
    }
}

/// Assign vertex values from a complete peel order.
pub fn assign(edges: &[[usize; ARITY]], order: &[Peeled], vertex_count: usize) -> Vec<u8> {
    let mut values = vec![UNASSIGNED; vertex_count];
    let mut visited = vec![false; vertex_count];

    for peeled in order.iter().rev() {
        let edge = &edges[peeled.edge];
        let taken: usize = edge
            .iter()
            .filter(|&&v| visited[v])
            .map(|&v| values[v] as usize)
            .sum();
        values[edge[peeled.slot]] = ((peeled.slot + ARITY - taken % ARITY) % ARITY) as u8;
        for &v in edge {
            visited[v] = true;
        }
    }

    values
}

/// The slot a set of vertex values selects for an edge.
#[inline]
pub fn selected_slot(values: &[u8], edge: &[usize; ARITY]) -> usize {
    edge.iter().map(|&v| values[v] as usize).sum::<usize>() % ARITY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peel_chain() {
        // Vertices 0..3, 3..6, 6..9; edges share one vertex each.
        let edges = [[0, 3, 6], [0, 4, 7], [1, 4, 8]];
        let order = peel(&edges, 9).unwrap();
        assert_eq!(order.len(), 3);

        let values = assign(&edges, &order, 9);
        for peeled in &order {
            let edge = &edges[peeled.edge];
            assert_eq!(selected_slot(&values, edge), peeled.slot);
            assert_ne!(values[edge[peeled.slot]], UNASSIGNED);
        }
        assert_eq!(values.iter().filter(|&&v| v != UNASSIGNED).count(), 3);
    }

    #[test]
    fn test_peel_rejects_duplicate_edge() {
        let edges = [[0, 3, 6], [0, 3, 6]];
        assert!(peel(&edges, 9).is_none());
    }

    #[test]
    fn test_peel_rejects_cycle() {
        // Every vertex has degree two.
        let edges = [[0, 2, 4], [0, 3, 5], [1, 2, 5], [1, 3, 4]];
        assert!(peel(&edges, 6).is_none());
    }

    #[test]
    fn test_peel_empty() {
        assert_eq!(peel(&[], 6), Some(Vec::new()));
        assert_eq!(assign(&[], &[], 6), vec![UNASSIGNED; 6]);
    }
}
