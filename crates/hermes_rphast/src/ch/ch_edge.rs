use std::ops::Add;

use crate::{
    distance::{Distance, Meters},
    graph::GraphEdge,
    types::{EdgeId, NodeId},
    weighting::{Milliseconds, Weight},
};

use super::shortcut::Shortcut;

#[derive(Debug, Clone, Copy, PartialEq, Eq, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub struct EdgeCosts {
    pub weight: Weight,
    pub time: Milliseconds,
    pub distance: Distance<Meters>,
}

impl EdgeCosts {
    pub fn new(weight: Weight, time: Milliseconds, distance: Distance<Meters>) -> Self {
        Self {
            weight,
            time,
            distance,
        }
    }
}

impl Add for EdgeCosts {
    type Output = EdgeCosts;

    fn add(self, other: EdgeCosts) -> EdgeCosts {
        EdgeCosts {
            weight: self.weight.saturating_add(other.weight),
            time: self.time.saturating_add(other.time),
            distance: self.distance + other.distance,
        }
    }
}

#[derive(Debug, Clone, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub struct CHBaseEdge {
    pub id: EdgeId,
    pub start: NodeId,
    pub end: NodeId,
    pub costs: EdgeCosts,
}

#[derive(Debug, Clone, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub enum CHGraphEdge {
    Shortcut(Shortcut),
    Edge(CHBaseEdge),
}

impl CHGraphEdge {
    pub fn id(&self) -> EdgeId {
        match self {
            CHGraphEdge::Shortcut(shortcut) => shortcut.id,
            CHGraphEdge::Edge(edge) => edge.id,
        }
    }

    pub fn costs(&self) -> &EdgeCosts {
        match self {
            CHGraphEdge::Shortcut(shortcut) => &shortcut.costs,
            CHGraphEdge::Edge(edge) => &edge.costs,
        }
    }

    pub fn is_shortcut(&self) -> bool {
        matches!(self, CHGraphEdge::Shortcut(_))
    }
}

impl GraphEdge for CHGraphEdge {
    fn start_node(&self) -> NodeId {
        match self {
            CHGraphEdge::Shortcut(shortcut) => shortcut.start,
            CHGraphEdge::Edge(edge) => edge.start,
        }
    }

    fn end_node(&self) -> NodeId {
        match self {
            CHGraphEdge::Shortcut(shortcut) => shortcut.end,
            CHGraphEdge::Edge(edge) => edge.end,
        }
    }

    fn distance(&self) -> Distance<Meters> {
        self.costs().distance
    }
}
