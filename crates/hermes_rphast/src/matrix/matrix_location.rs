use serde::{Deserialize, Serialize};

use crate::types::NodeId;

/// A matrix row or column as handed over by the node resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<NodeId>", into = "Option<NodeId>")]
pub enum MatrixLocation {
    Mapped(NodeId),
    /// The location could not be snapped onto the graph
    Unmapped,
}

impl MatrixLocation {
    /// Resolvers report unmapped locations with a negative id, usually `-1`.
    pub fn from_raw(node_id: i64) -> Self {
        if node_id < 0 {
            MatrixLocation::Unmapped
        } else {
            MatrixLocation::Mapped(node_id as NodeId)
        }
    }

    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            MatrixLocation::Mapped(node_id) => Some(*node_id),
            MatrixLocation::Unmapped => None,
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, MatrixLocation::Mapped(_))
    }
}

impl From<Option<NodeId>> for MatrixLocation {
    fn from(node_id: Option<NodeId>) -> Self {
        match node_id {
            Some(node_id) => MatrixLocation::Mapped(node_id),
            None => MatrixLocation::Unmapped,
        }
    }
}

impl From<MatrixLocation> for Option<NodeId> {
    fn from(location: MatrixLocation) -> Self {
        location.node_id()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatrixLocations {
    locations: Vec<MatrixLocation>,
}

impl MatrixLocations {
    pub fn new(locations: Vec<MatrixLocation>) -> Self {
        Self { locations }
    }

    pub fn from_raw_node_ids(node_ids: &[i64]) -> Self {
        node_ids.iter().map(|&id| MatrixLocation::from_raw(id)).collect()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn get(&self, index: usize) -> MatrixLocation {
        self.locations[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatrixLocation> {
        self.locations.iter()
    }

    pub fn has_valid_nodes(&self) -> bool {
        self.locations.iter().any(MatrixLocation::is_mapped)
    }

    pub fn unmapped_count(&self) -> usize {
        self.locations
            .iter()
            .filter(|location| !location.is_mapped())
            .count()
    }

    /// Mapped node ids in their original order, the input handed to the search
    pub fn valid_node_ids(&self) -> Vec<NodeId> {
        self.locations
            .iter()
            .filter_map(MatrixLocation::node_id)
            .collect()
    }

    /// For each original position, its position among the mapped locations
    pub fn valid_positions(&self) -> Vec<Option<usize>> {
        let mut next = 0;
        self.locations
            .iter()
            .map(|location| {
                location.is_mapped().then(|| {
                    next += 1;
                    next - 1
                })
            })
            .collect()
    }
}

impl FromIterator<MatrixLocation> for MatrixLocations {
    fn from_iter<I: IntoIterator<Item = MatrixLocation>>(iter: I) -> Self {
        MatrixLocations::new(iter.into_iter().collect())
    }
}

impl From<Vec<MatrixLocation>> for MatrixLocations {
    fn from(locations: Vec<MatrixLocation>) -> Self {
        MatrixLocations::new(locations)
    }
}
