//! Connected components and graph restriction

use log::{debug, info};
use petgraph::{algo::connected_components, unionfind::UnionFind, visit::EdgeRef};

use crate::{
    StreetNodeId,
    model::{StreetEdge, StreetGraph, SuitabilityFilter},
};

/// Maximal connected part of a street graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub nodes: Vec<StreetNodeId>,
    pub edge_count: usize,
}

impl Component {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

pub fn component_count(graph: &StreetGraph) -> usize {
    connected_components(&graph.graph)
}

/// All components, largest first (by node count, then edge count)
pub fn components(graph: &StreetGraph) -> Vec<Component> {
    let labels = component_labels(graph);
    let mut by_label: Vec<Option<Component>> = vec![None; graph.node_count()];

    for node in graph.graph.node_indices() {
        by_label[labels[node.index()]]
            .get_or_insert_with(|| Component {
                nodes: Vec::new(),
                edge_count: 0,
            })
            .nodes
            .push(node);
    }
    for edge in graph.edge_references() {
        if let Some(component) = &mut by_label[labels[edge.source().index()]] {
            component.edge_count += 1;
        }
    }

    let mut components: Vec<Component> = by_label.into_iter().flatten().collect();
    components.sort_by(|a, b| {
        b.node_count()
            .cmp(&a.node_count())
            .then(b.edge_count.cmp(&a.edge_count))
            .then(a.nodes.first().cmp(&b.nodes.first()))
    });
    components
}

/// The component with the most nodes as a standalone graph
pub fn largest_component(graph: &StreetGraph) -> StreetGraph {
    let labels = component_labels(graph);
    let Some(largest) = components(graph).into_iter().next() else {
        return graph.clone();
    };
    let label = labels[largest.nodes[0].index()];

    info!(
        "Largest component has {} of {} nodes",
        largest.node_count(),
        graph.node_count()
    );
    retain(
        graph,
        |node| labels[node.index()] == label,
        |_| true,
    )
}

/// Drops edges without a travel time, then nodes left without edges
pub fn routable(graph: &StreetGraph) -> StreetGraph {
    let restricted = restrict_edges(graph, |edge| edge.travel_time().is_some());
    debug!(
        "Removed {} edges without travel time",
        graph.edge_count() - restricted.edge_count()
    );
    restricted
}

/// Keeps edges whose suitability passes `filter`, then removes isolated nodes
pub fn filter_by_suitability(graph: &StreetGraph, filter: &SuitabilityFilter) -> StreetGraph {
    let restricted = restrict_edges(graph, |edge| filter.allows(edge.suitability()));
    debug!(
        "Suitability filter {filter} keeps {} of {} edges and {} of {} nodes",
        restricted.edge_count(),
        graph.edge_count(),
        restricted.node_count(),
        graph.node_count()
    );
    restricted
}

/// Edge filtering followed by isolation pruning
fn restrict_edges<F>(graph: &StreetGraph, keep_edge: F) -> StreetGraph
where
    F: Fn(&StreetEdge) -> bool,
{
    let mut degree = vec![0usize; graph.node_count()];
    for edge in graph.edge_references().filter(|e| keep_edge(e.weight())) {
        degree[edge.source().index()] += 1;
        degree[edge.target().index()] += 1;
    }
    retain(graph, |node| degree[node.index()] > 0, keep_edge)
}

fn retain<N, E>(graph: &StreetGraph, keep_node: N, keep_edge: E) -> StreetGraph
where
    N: Fn(StreetNodeId) -> bool,
    E: Fn(&StreetEdge) -> bool,
{
    let filtered = graph.graph.filter_map(
        |idx, node| keep_node(idx).then(|| node.clone()),
        |_, edge| keep_edge(edge).then(|| edge.clone()),
    );
    StreetGraph::new(filtered)
}

fn component_labels(graph: &StreetGraph) -> Vec<usize> {
    let mut sets = UnionFind::new(graph.node_count());
    for edge in graph.edge_references() {
        sets.union(edge.source().index(), edge.target().index());
    }
    sets.into_labeling()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::Suitability,
        test_support::{costed, graph, road},
    };

    fn two_islands() -> StreetGraph {
        graph(&[
            road(0, (0.0, 0.0), (1.0, 0.0), 1.0, Suitability::Good),
            road(1, (1.0, 0.0), (2.0, 0.0), 1.0, Suitability::Medium),
            road(2, (2.0, 0.0), (3.0, 0.0), 1.0, Suitability::Low),
            road(3, (10.0, 0.0), (11.0, 0.0), 1.0, Suitability::Good),
        ])
    }

    #[test]
    fn counts_components() {
        let g = two_islands();
        assert_eq!(component_count(&g), 2);
        let comps = components(&g);
        assert_eq!(comps.len(), 2);
        assert_eq!(comps[0].node_count(), 4);
        assert_eq!(comps[0].edge_count, 3);
        assert_eq!(comps[1].node_count(), 2);
    }

    #[test]
    fn largest_component_is_standalone() {
        let g = two_islands();
        let largest = largest_component(&g);
        assert_eq!(largest.node_count(), 4);
        assert_eq!(largest.edge_count(), 3);
        assert_eq!(component_count(&largest), 1);
        assert!(largest.node_count() <= g.node_count());
    }

    #[test]
    fn empty_graph_has_no_components() {
        let g = graph(&[]);
        assert_eq!(component_count(&g), 0);
        assert!(components(&g).is_empty());
        assert_eq!(largest_component(&g).node_count(), 0);
    }

    #[test]
    fn suitability_filter_prunes_isolated_nodes() {
        let g = two_islands();
        let good = filter_by_suitability(&g, &SuitabilityFilter::only(&[Suitability::Good]));
        assert_eq!(good.edge_count(), 2);
        assert_eq!(good.node_count(), 4);
        assert!(good.graph.node_indices().all(|n| good.degree(n) > 0));
    }

    #[test]
    fn filter_without_matching_edges_is_empty() {
        let g = graph(&[
            road(0, (0.0, 0.0), (1.0, 0.0), 1.0, Suitability::Low),
            road(1, (1.0, 0.0), (2.0, 0.0), 1.0, Suitability::Medium),
        ]);
        let good = filter_by_suitability(&g, &SuitabilityFilter::only(&[Suitability::Good]));
        assert_eq!(good.edge_count(), 0);
        assert_eq!(good.node_count(), 0);
    }

    #[test]
    fn untimed_edges_are_not_routable() {
        let g = graph(&[
            road(0, (0.0, 0.0), (1.0, 0.0), 1.0, Suitability::Low),
            costed(1, vec![(1.0, 0.0), (2.0, 0.0)], None, Suitability::Low),
        ]);
        assert_eq!(g.untimed_edge_count(), 1);
        let r = routable(&g);
        assert_eq!(r.edge_count(), 1);
        assert_eq!(r.node_count(), 2);
        assert_eq!(r.untimed_edge_count(), 0);
    }
}
