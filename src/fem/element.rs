use fixedbitset::FixedBitSet;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::dof::{DofHandle, DofManager};
use crate::mesh::Index;

/// The topological entity a [`Element`] was created from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementSource {
    /// Index of a volume element of the mesh.
    Volume(Index),
    /// Index of a facet of the mesh.
    Facet(Index),
}

/// Whether a local edge is traversed along the canonical direction of its edge entity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeDirection {
    Forward,
    Reverse,
}

impl From<bool> for EdgeDirection {
    fn from(forward: bool) -> Self {
        if forward {
            Self::Forward
        } else {
            Self::Reverse
        }
    }
}

/// An element bound to the ordered list of degrees of freedom the assembler indexes into.
///
/// The edge direction bits cover the local edges of every linked side in link order; a set bit
/// means [`EdgeDirection::Forward`].
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    source: ElementSource,
    dofs: Vec<DofHandle>,
    edge_directions: FixedBitSet,
    rotation: Option<Vec<f64>>,
}

impl Element {
    pub(crate) fn new(source: ElementSource, dofs: Vec<DofHandle>, edge_directions: FixedBitSet) -> Self {
        Self {
            source,
            dofs,
            edge_directions,
            rotation: None,
        }
    }

    pub fn source(&self) -> ElementSource {
        self.source
    }

    /// Panics if `i` is out of bounds.
    pub fn dof(&self, i: usize) -> DofHandle {
        self.dofs[i]
    }

    pub fn dofs(&self) -> &[DofHandle] {
        &self.dofs
    }

    pub fn number_of_dofs(&self) -> usize {
        self.dofs.len()
    }

    /// Direction of local edge `e`.
    ///
    /// Panics if the element has no direction for edge `e`.
    pub fn edge_direction(&self, e: usize) -> EdgeDirection {
        assert!(
            e < self.edge_directions.len(),
            "Edge {} out of bounds for element with {} edge directions",
            e,
            self.edge_directions.len()
        );
        self.edge_directions[e].into()
    }

    pub fn edge_directions(&self) -> &FixedBitSet {
        &self.edge_directions
    }

    /// Positions of the element dofs in the free or fixed system vectors.
    ///
    /// Entries are `None` until [`DofManager::index_dofs`] has been called.
    pub fn dof_indices(&self, manager: &DofManager) -> Vec<Option<usize>> {
        self.dofs.iter().map(|&dof| manager.get(dof).index).collect()
    }

    /// Allocates zeroed rotation data, an angle and a rotation axis per node.
    pub fn allocate_rotation_data(&mut self, num_nodes: usize) {
        self.rotation = Some(vec![0.0; 4 * num_nodes]);
    }

    pub fn has_rotation_data(&self) -> bool {
        self.rotation.is_some()
    }

    /// Panics if no rotation data has been allocated.
    pub fn set_node_rotation(&mut self, node: usize, angle: f64, axis: &Vector3<f64>) {
        let rotation = self
            .rotation
            .as_mut()
            .expect("Rotation data must be allocated before it is set");
        let entries = &mut rotation[4 * node..4 * node + 4];
        entries[0] = angle;
        entries[1..].copy_from_slice(axis.as_slice());
    }

    /// The rotation angle and axis of a node, if rotation data has been allocated.
    pub fn node_rotation(&self, node: usize) -> Option<(f64, Vector3<f64>)> {
        self.rotation.as_ref().map(|rotation| {
            let entries = &rotation[4 * node..4 * node + 4];
            (entries[0], Vector3::new(entries[1], entries[2], entries[3]))
        })
    }
}
