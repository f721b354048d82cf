//! Graph topologies for the trade menus.
//!
//! The selection list wraps when scrolled with the d-pad and jumps a page
//! with L/R. Page jumps clamp inside the list, except from the first and
//! last entries, where they wrap to the far end.

use crate::graph::{GraphError, InputGraph, NodeId};
use crate::input::Input;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

/// Entries skipped by one page jump.
pub const PAGE_SIZE: usize = 8;

/// Add one list to `graph` and wire its cursor edges. Returns the node ids
/// in list order; the first id is the list's root.
pub fn build_list<T>(graph: &mut InputGraph<T>, items: Vec<T>) -> Result<Vec<NodeId>, GraphError>
where
    T: Eq + Hash + fmt::Debug,
{
    if items.is_empty() {
        return Err(GraphError::EmptyList);
    }

    let mut seen = HashSet::with_capacity(items.len());
    if let Some(dup) = items.iter().find(|item| !seen.insert(*item)) {
        return Err(GraphError::DuplicateValue(format!("{dup:?}")));
    }

    let ids: Vec<NodeId> = items.into_iter().map(|item| graph.add_node(item)).collect();
    let last = ids.len() - 1;

    for i in 1..last {
        graph.connect(ids[i], Input::PageForward, ids[(i + PAGE_SIZE).min(last)])?;
        graph.connect(ids[i], Input::PageBack, ids[i.saturating_sub(PAGE_SIZE)])?;
        graph.connect(ids[i], Input::Down, ids[i + 1])?;
        graph.connect(ids[i], Input::Up, ids[i - 1])?;
    }

    let (first, end) = (ids[0], ids[last]);

    graph.connect(first, Input::Down, ids[1.min(last)])?;
    graph.connect(first, Input::Up, end)?;
    graph.connect(first, Input::PageForward, ids[PAGE_SIZE.min(last)])?;
    graph.connect(first, Input::PageBack, end)?;

    graph.connect(end, Input::Down, first)?;
    graph.connect(end, Input::Up, ids[last.saturating_sub(1)])?;
    graph.connect(end, Input::PageForward, first)?;
    graph.connect(end, Input::PageBack, ids[last.saturating_sub(PAGE_SIZE)])?;

    Ok(ids)
}

/// Link `roots` into a ring on [`Input::NextCategory`]: root `k` moves to
/// root `k + 1`, and the last root back to the first.
pub fn link_categories<T>(graph: &mut InputGraph<T>, roots: &[NodeId]) -> Result<(), GraphError> {
    for (k, &root) in roots.iter().enumerate() {
        graph.connect(root, Input::NextCategory, roots[(k + 1) % roots.len()])?;
    }
    Ok(())
}

/// Build one list per sort category and ring them. The returned root is the
/// first category's first entry, where the cursor starts.
pub fn build_category_graph<T>(
    lists: impl IntoIterator<Item = Vec<T>>,
) -> Result<(InputGraph<T>, NodeId), GraphError>
where
    T: Eq + Hash + fmt::Debug,
{
    let mut graph = InputGraph::new();
    let mut roots = Vec::new();
    for items in lists {
        roots.push(build_list(&mut graph, items)?[0]);
    }

    let root = *roots.first().ok_or(GraphError::EmptyList)?;
    link_categories(&mut graph, &roots)?;
    Ok((graph, root))
}

/// Build a single-list graph with `nothing` appended as the final entry.
pub fn build_single_graph<T>(
    mut items: Vec<T>,
    nothing: T,
) -> Result<(InputGraph<T>, NodeId), GraphError>
where
    T: Eq + Hash + fmt::Debug,
{
    items.push(nothing);
    let mut graph = InputGraph::new();
    let root = build_list(&mut graph, items)?[0];
    Ok((graph, root))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(n: usize) -> (InputGraph<usize>, Vec<NodeId>) {
        let mut graph = InputGraph::new();
        let ids = build_list(&mut graph, (0..n).collect()).unwrap();
        (graph, ids)
    }

    fn edge_targets(graph: &InputGraph<usize>, id: NodeId) -> Vec<(Input, usize)> {
        graph
            .edges(id)
            .map(|(input, to)| (input, *graph.value(to).unwrap()))
            .collect()
    }

    /// All-pairs reference distances from the edge rules, independent of
    /// `build_list` and `search`.
    fn reference_distances(n: usize) -> Vec<Vec<usize>> {
        let last = n - 1;
        let moves = |i: usize| -> Vec<usize> {
            if i == 0 {
                vec![1, last, PAGE_SIZE.min(last), last]
            } else if i == last {
                vec![0, last - 1, 0, last.saturating_sub(PAGE_SIZE)]
            } else {
                vec![i + 1, i - 1, (i + PAGE_SIZE).min(last), i.saturating_sub(PAGE_SIZE)]
            }
        };

        let inf = usize::MAX / 2;
        let mut dist = vec![vec![inf; n]; n];
        for i in 0..n {
            dist[i][i] = 0;
            for j in moves(i) {
                if j != i {
                    dist[i][j] = 1;
                }
            }
        }
        for k in 0..n {
            for i in 0..n {
                for j in 0..n {
                    if dist[i][k] + dist[k][j] < dist[i][j] {
                        dist[i][j] = dist[i][k] + dist[k][j];
                    }
                }
            }
        }
        dist
    }

    #[test]
    fn interior_nodes_have_four_edges() {
        let (graph, ids) = list(12);
        for (i, &id) in ids.iter().enumerate().take(11).skip(1) {
            assert_eq!(
                edge_targets(&graph, id),
                vec![
                    (Input::Up, i - 1),
                    (Input::Down, i + 1),
                    (Input::PageBack, i.saturating_sub(8)),
                    (Input::PageForward, (i + 8).min(11)),
                ]
            );
        }
    }

    #[test]
    fn boundary_nodes_wrap() {
        let (graph, ids) = list(12);
        assert_eq!(
            edge_targets(&graph, ids[0]),
            vec![
                (Input::Up, 11),
                (Input::Down, 1),
                (Input::PageBack, 11),
                (Input::PageForward, 8),
            ]
        );
        assert_eq!(
            edge_targets(&graph, ids[11]),
            vec![
                (Input::Up, 10),
                (Input::Down, 0),
                (Input::PageBack, 3),
                (Input::PageForward, 0),
            ]
        );
    }

    #[test]
    fn search_matches_reference_distances() {
        for n in [10, 12, 17] {
            let (graph, ids) = list(n);
            let dist = reference_distances(n);
            for (start, &root) in ids.iter().enumerate() {
                for target in 0..n {
                    let path = graph.search(root, &target).unwrap();
                    assert_eq!(path.len(), dist[start][target], "n={n} {start}->{target}");

                    let inputs = path.iter().map(|step| step.input);
                    let end = graph.replay(root, inputs).unwrap();
                    assert_eq!(*graph.value(end).unwrap(), target);
                    assert_eq!(path.last().map(|step| step.node).unwrap_or(root), end);
                }
            }
        }
    }

    #[test]
    fn page_jump_then_step() {
        let (graph, ids) = list(12);
        let path = graph.search(ids[0], &9).unwrap();
        assert_eq!(path.len(), 2);
        assert!(path.iter().any(|step| step.input == Input::PageForward));
        assert!(path.iter().any(|step| step.input.is_directional()));
    }

    #[test]
    fn short_lists() {
        let (graph, ids) = list(1);
        assert_eq!(graph.neighbor(ids[0], Input::Down), Some(ids[0]));
        assert_eq!(graph.neighbor(ids[0], Input::PageBack), Some(ids[0]));

        let (graph, ids) = list(3);
        assert_eq!(graph.neighbor(ids[0], Input::PageForward), Some(ids[2]));
        assert_eq!(graph.neighbor(ids[2], Input::PageBack), Some(ids[0]));
        assert_eq!(graph.search(ids[0], &2).unwrap().len(), 1);
    }

    #[test]
    fn rejects_bad_lists() {
        let mut graph = InputGraph::new();
        assert_eq!(build_list(&mut graph, Vec::<u8>::new()), Err(GraphError::EmptyList));
        assert_eq!(
            build_list(&mut graph, vec![1u8, 2, 1]),
            Err(GraphError::DuplicateValue("1".into()))
        );
        assert!(graph.is_empty());
    }

    #[test]
    fn seven_categories_form_a_ring() {
        let lists = (0..7).map(|sort| (0..12).map(|i| (sort, (i + sort) % 12)).collect::<Vec<_>>());
        let (graph, root) = build_category_graph(lists).unwrap();
        assert_eq!(graph.len(), 7 * 12);

        let mut at = root;
        let mut visited = Vec::new();
        for _ in 0..7 {
            visited.push(*graph.value(at).unwrap());
            at = graph.neighbor(at, Input::NextCategory).unwrap();
        }
        assert_eq!(at, root);
        assert_eq!(
            visited.iter().map(|(sort, _)| *sort).collect::<Vec<_>>(),
            (0..7).collect::<Vec<_>>()
        );

        // Only roots carry the category edge.
        let (_, second) = graph.edges(root).nth(1).unwrap();
        assert_eq!(graph.neighbor(second, Input::NextCategory), None);
    }

    #[test]
    fn category_search_uses_cycle() {
        // Category 1 starts at the target, so one category press beats scrolling.
        let lists = vec![
            (0..12).collect::<Vec<usize>>(),
            (0..12).map(|i| (i + 6) % 12 + 100).collect(),
        ];
        let (graph, root) = build_category_graph(lists).unwrap();
        let path = graph.search(root, &106).unwrap();
        assert_eq!(
            path.iter().map(|s| s.input).collect::<Vec<_>>(),
            vec![Input::NextCategory]
        );
    }

    #[test]
    fn single_graph_appends_nothing() {
        let (graph, root) = build_single_graph(vec!["a", "b", "c"], "nothing").unwrap();
        assert_eq!(graph.len(), 4);
        assert_eq!(graph.search(root, &"nothing").unwrap().len(), 1);
    }
}
