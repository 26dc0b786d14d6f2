#[cfg(test)]
pub mod test_graph {

    use std::{
        cmp::{self, Reverse},
        collections::BinaryHeap,
    };

    use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

    use crate::{
        ch::{
            ch_edge::EdgeCosts,
            ch_storage::{CHStorage, CHStorageBuilder},
        },
        distance::{Distance, Kilometers, Meters},
        kilometers, meters,
        matrix::matrix_metrics::Metric,
        types::{EdgeId, NodeId},
        weighting::{Cost, Milliseconds, Weight},
    };

    struct TestEdge {
        start: NodeId,
        end: NodeId,
        costs: EdgeCosts,
    }

    /// Directed base graph that can be contracted in any node order.
    pub struct TestGraph {
        nodes: usize,
        edges: Vec<TestEdge>,
        adjacency_list: Vec<Vec<EdgeId>>,
    }

    #[derive(Clone, Copy)]
    pub enum RomaniaGraphCity {
        Arad = 1,
        Bucharest = 2,
        Craiova = 3,
        Dobreta = 4,
        Eforie = 5,
        Fagaras = 6,
        Giurgiu = 7,
        Hirsova = 8,
        Iasi = 9,
        Lugoj = 10,
        Mehadia = 11,
        Neamt = 12,
        Oradea = 13,
        Pitesti = 14,
        RimnicuVilcea = 15,
        Sibiu = 16,
        Timisoara = 17,
        Urziceni = 18,
        Vaslui = 19,
        Zerind = 20,
    }

    // https://user-images.githubusercontent.com/43790152/97784960-1a142580-1bc4-11eb-9070-39c03eb16df2.png
    fn get_romania_graph_edges() -> Vec<(RomaniaGraphCity, RomaniaGraphCity, Distance<Kilometers>)>
    {
        use RomaniaGraphCity::*;

        vec![
            (Oradea, Zerind, kilometers!(71)),
            (Oradea, Sibiu, kilometers!(151)),
            (Zerind, Arad, kilometers!(75)),
            (Arad, Sibiu, kilometers!(140)),
            (Arad, Timisoara, kilometers!(118)),
            (Timisoara, Lugoj, kilometers!(111)),
            (Lugoj, Mehadia, kilometers!(70)),
            (Mehadia, Dobreta, kilometers!(75)),
            (Dobreta, Craiova, kilometers!(120)),
            (Craiova, RimnicuVilcea, kilometers!(146)),
            (Craiova, Pitesti, kilometers!(138)),
            (RimnicuVilcea, Pitesti, kilometers!(97)),
            (RimnicuVilcea, Sibiu, kilometers!(80)),
            (Sibiu, Fagaras, kilometers!(99)),
            (Fagaras, Bucharest, kilometers!(211)),
            (Pitesti, Bucharest, kilometers!(101)),
            (Bucharest, Giurgiu, kilometers!(90)),
            (Bucharest, Urziceni, kilometers!(85)),
            (Urziceni, Hirsova, kilometers!(98)),
            (Hirsova, Eforie, kilometers!(86)),
            (Urziceni, Vaslui, kilometers!(142)),
            (Vaslui, Iasi, kilometers!(92)),
            (Iasi, Neamt, kilometers!(87)),
        ]
    }

    /// One unit of every metric: weight 1, one second, one meter
    pub fn unit_costs() -> EdgeCosts {
        EdgeCosts::new(1, 1000, meters!(1))
    }

    /// Nodes `0 - 1 - ... - n-1`, traversable in both directions
    pub fn create_line_graph(nodes: usize) -> TestGraph {
        let mut graph = TestGraph::new();
        for node in 1..nodes {
            graph.add_bidirectional_edge(node - 1, node, unit_costs());
        }
        graph
    }

    /// The Romania road map. Speeds differ per road and per direction, and some roads carry a
    /// penalty, so the fastest, the shortest and the cheapest routes disagree.
    pub fn create_romania_graph() -> TestGraph {
        let speeds_kmh: [u32; 4] = [50, 80, 100, 130];
        let mut graph = TestGraph::new();

        for (index, (start, end, distance)) in get_romania_graph_edges().into_iter().enumerate() {
            let (start, end) = (start as usize, end as usize);
            let km = distance.value() as u32;
            let distance = distance.convert::<Meters>();
            let speed = speeds_kmh[index % speeds_kmh.len()];

            let forward_ms: Milliseconds = km * 3_600_000 / speed;
            let backward_ms: Milliseconds = km * 3_600_000 / (speed + 20);
            let penalty: Weight = 120 * (index as Weight % 3);

            graph.add_edge(
                start,
                end,
                EdgeCosts::new(forward_ms / 1000 + penalty, forward_ms, distance),
            );
            graph.add_edge(
                end,
                start,
                EdgeCosts::new(backward_ms / 1000 + penalty, backward_ms, distance),
            );
        }

        graph
    }

    fn dominates(existing: &EdgeCosts, candidate: &EdgeCosts) -> bool {
        existing.weight <= candidate.weight
            && existing.time <= candidate.time
            && existing.distance <= candidate.distance
    }

    fn metric_cost(costs: &EdgeCosts, metric: Metric) -> Cost {
        match metric {
            Metric::Duration => costs.time as Cost,
            Metric::Distance => costs.distance.nanometers() as Cost,
            Metric::Weight => costs.weight as Cost,
        }
    }

    impl TestGraph {
        pub fn new() -> Self {
            Self {
                nodes: 0,
                edges: Vec::new(),
                adjacency_list: Vec::new(),
            }
        }

        pub fn node_count(&self) -> usize {
            self.nodes
        }

        fn add_node(&mut self, node_id: NodeId) {
            self.nodes = cmp::max(self.nodes, node_id + 1);
            if self.nodes > self.adjacency_list.len() {
                self.adjacency_list.resize_with(self.nodes, Vec::new);
            }
        }

        pub fn add_edge(&mut self, start: NodeId, end: NodeId, costs: EdgeCosts) {
            self.add_node(start);
            self.add_node(end);

            let edge_id = self.edges.len();
            self.edges.push(TestEdge { start, end, costs });
            self.adjacency_list[start].push(edge_id);
        }

        pub fn add_bidirectional_edge(&mut self, start: NodeId, end: NodeId, costs: EdgeCosts) {
            self.add_edge(start, end, costs);
            self.add_edge(end, start, costs);
        }

        /// Every node id exactly once, in an order fixed by `seed`
        pub fn shuffled_order(&self, seed: u64) -> Vec<NodeId> {
            let mut order: Vec<NodeId> = (0..self.nodes).collect();
            order.shuffle(&mut StdRng::seed_from_u64(seed));
            order
        }

        /// Contracts the nodes in `order`, the first node gets the lowest rank.
        ///
        /// Every path over a contracted node is replaced by a shortcut unless an existing edge
        /// is at least as good in every metric, which keeps the hierarchy exact for each metric
        /// on its own.
        pub fn contract_in_order(&self, order: &[NodeId]) -> CHStorage {
            assert_eq!(order.len(), self.nodes);

            let mut builder = CHStorageBuilder::new(self.nodes);
            for (rank, &node) in order.iter().enumerate() {
                builder.set_node_rank(node, rank);
            }

            let mut outgoing: Vec<Vec<(NodeId, EdgeCosts, EdgeId)>> = vec![Vec::new(); self.nodes];
            let mut incoming: Vec<Vec<(NodeId, EdgeCosts, EdgeId)>> = vec![Vec::new(); self.nodes];

            for edge in &self.edges {
                let id = builder.add_edge(edge.start, edge.end, edge.costs);
                outgoing[edge.start].push((edge.end, edge.costs, id));
                incoming[edge.end].push((edge.start, edge.costs, id));
            }

            let mut contracted = vec![false; self.nodes];
            for &node in order {
                contracted[node] = true;

                let ins: Vec<_> = incoming[node]
                    .iter()
                    .filter(|(start, ..)| !contracted[*start])
                    .copied()
                    .collect();
                let outs: Vec<_> = outgoing[node]
                    .iter()
                    .filter(|(end, ..)| !contracted[*end])
                    .copied()
                    .collect();

                for &(start, in_costs, in_id) in &ins {
                    for &(end, out_costs, out_id) in &outs {
                        if start == end {
                            continue;
                        }

                        let costs = in_costs + out_costs;
                        let witnessed = outgoing[start]
                            .iter()
                            .any(|(target, existing, _)| *target == end && dominates(existing, &costs));
                        if witnessed {
                            continue;
                        }

                        let id = builder.add_shortcut(start, end, costs, in_id, out_id);
                        outgoing[start].push((end, costs, id));
                        incoming[end].push((start, costs, id));
                    }
                }
            }

            builder.build().unwrap()
        }

        /// Plain Dijkstra over the base edges, `None` for unreachable nodes
        pub fn dijkstra(&self, source: NodeId, metric: Metric) -> Vec<Option<Cost>> {
            let mut costs: Vec<Option<Cost>> = vec![None; self.nodes];
            let mut heap = BinaryHeap::new();

            costs[source] = Some(0);
            heap.push(Reverse((0, source)));

            while let Some(Reverse((cost, node))) = heap.pop() {
                if costs[node].is_some_and(|best| cost > best) {
                    continue;
                }

                for &edge_id in &self.adjacency_list[node] {
                    let edge = &self.edges[edge_id];
                    let next = cost + metric_cost(&edge.costs, metric);

                    if costs[edge.end].is_none_or(|best| next < best) {
                        costs[edge.end] = Some(next);
                        heap.push(Reverse((next, edge.end)));
                    }
                }
            }

            costs
        }
    }
}
