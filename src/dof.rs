//! Degrees of freedom and their bookkeeping.
//!
//! Every degree of freedom is identified by the entity it lives on and its [`DofType`]. The
//! [`DofProvider`] trait is the narrow interface the linking routines consume. [`DofManager`]
//! is an in-memory implementation that owns all [`Dof`]s in an arena and hands out
//! [`DofHandle`]s to them.
use std::collections::BTreeMap;

use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::connectivity;
use crate::mesh::{Element, Id, Mesh};

/// Global identifier of a degree of freedom.
pub type DofId = u64;

/// The physical meaning of a degree of freedom.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DofType {
    Temperature,
    Ux,
    Uy,
    Uz,
    Phi,
    EdgeField,
    FaceField,
    Lambda,
    LambdaT,
}

impl DofType {
    pub const ALL: [DofType; 9] = [
        DofType::Temperature,
        DofType::Ux,
        DofType::Uy,
        DofType::Uz,
        DofType::Phi,
        DofType::EdgeField,
        DofType::FaceField,
        DofType::Lambda,
        DofType::LambdaT,
    ];

    fn code(&self) -> u64 {
        *self as u64
    }
}

/// The kind of mesh entity a degree of freedom is attached to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Node,
    Edge,
    Face,
    Facet,
}

impl EntityKind {
    fn code(&self) -> u64 {
        *self as u64
    }
}

/// Identifies a mesh entity by kind and global id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKey {
    pub kind: EntityKind,
    pub id: Id,
}

impl EntityKey {
    pub fn node(id: Id) -> Self {
        Self {
            kind: EntityKind::Node,
            id,
        }
    }

    pub fn edge(id: Id) -> Self {
        Self {
            kind: EntityKind::Edge,
            id,
        }
    }

    pub fn face(id: Id) -> Self {
        Self {
            kind: EntityKind::Face,
            id,
        }
    }

    pub fn facet(id: Id) -> Self {
        Self {
            kind: EntityKind::Facet,
            id,
        }
    }
}

/// A non-owning reference to a [`Dof`] stored by a [`DofManager`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DofHandle(pub usize);

/// A scalar unknown of the global system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dof {
    pub id: DofId,
    pub entity: EntityKey,
    pub dof_type: DofType,
    /// Position in the free or fixed system vector, assigned by [`DofManager::index_dofs`].
    pub index: Option<usize>,
    pub fixed: bool,
    pub value: f64,
}

/// Dof types of one block or side set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupDofTypes {
    pub node: Vec<DofType>,
    pub edge: Vec<DofType>,
    pub face: Vec<DofType>,
    pub lambda: Vec<DofType>,
}

impl GroupDofTypes {
    pub fn nodal(types: &[DofType]) -> Self {
        Self {
            node: types.to_vec(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.node.is_empty() && self.edge.is_empty() && self.face.is_empty() && self.lambda.is_empty()
    }
}

/// Dof types per group, keyed by block or side set id.
///
/// Block and side set ids share one key space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DofConfig {
    pub groups: BTreeMap<Id, GroupDofTypes>,
    /// Number of consecutive dofs per edge and edge dof type.
    pub edge_multiplicity: usize,
    /// Number of consecutive dofs per face and face dof type.
    pub face_multiplicity: usize,
}

impl Default for DofConfig {
    fn default() -> Self {
        Self {
            groups: BTreeMap::new(),
            edge_multiplicity: 1,
            face_multiplicity: 1,
        }
    }
}

impl DofConfig {
    pub fn with_group(mut self, id: Id, types: GroupDofTypes) -> Self {
        self.groups.insert(id, types);
        self
    }
}

/// The queries the linking routines need to answer "which unknowns belong to this element".
pub trait DofProvider {
    /// Dof types on the nodes of a block or side set. Unknown groups have none.
    fn dofs_per_node(&self, group: Id) -> &[DofType];

    fn dofs_per_edge(&self, group: Id) -> &[DofType];

    fn dofs_per_face(&self, group: Id) -> &[DofType];

    /// Interface multiplier dof types of a side set.
    fn lambda_dofs(&self, group: Id) -> &[DofType];

    fn edge_multiplicity(&self) -> usize;

    fn face_multiplicity(&self) -> usize;

    /// The id of the first dof of the given type on an entity. Edge and face dofs with
    /// multiplicity `m` occupy the `m` consecutive ids starting here.
    fn calculate_dof_id(&self, entity: EntityKey, dof_type: DofType) -> DofId;

    fn dof(&self, id: DofId) -> Option<DofHandle>;
}

/// Owns every degree of freedom of a mesh partition.
#[derive(Debug, Clone)]
pub struct DofManager {
    config: DofConfig,
    dofs: Vec<Dof>,
    lookup: FxHashMap<DofId, DofHandle>,
}

impl DofManager {
    /// Creates the dofs of every block and side set of the mesh.
    ///
    /// The entities are visited in the order the linking routines emit their dofs, so handles
    /// of elements created first are contiguous.
    pub fn new(mesh: &Mesh, config: DofConfig) -> Self {
        let mut manager = Self {
            config,
            dofs: Vec::new(),
            lookup: FxHashMap::default(),
        };

        for block in mesh.blocks() {
            for &element in &block.elements {
                manager.create_entity_dofs(mesh, mesh.element(element), block.id, true);
            }
        }

        for sideset in mesh.sidesets() {
            for &facet in &sideset.facets {
                let facet = mesh.facet(facet);
                let group = facet.cut_block.unwrap_or(sideset.id);
                manager.create_entity_dofs(mesh, &facet.element, group, true);
                for layer in &facet.layers {
                    manager.create_entity_dofs(mesh, layer, sideset.id, false);
                }
                let lambda = manager.lambda_dofs(sideset.id).to_vec();
                for dof_type in lambda {
                    manager.create_dof(EntityKey::facet(facet.element.id), dof_type, 0);
                }
            }
        }

        debug!("Created {} dofs", manager.dofs.len());
        manager
    }

    pub fn config(&self) -> &DofConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.dofs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dofs.is_empty()
    }

    pub fn dofs(&self) -> &[Dof] {
        &self.dofs
    }

    /// Panics if the handle was not issued by this manager.
    pub fn get(&self, handle: DofHandle) -> &Dof {
        &self.dofs[handle.0]
    }

    pub fn get_mut(&mut self, handle: DofHandle) -> &mut Dof {
        &mut self.dofs[handle.0]
    }

    /// Looks up the handle of a dof on an entity. `k` selects one of the consecutive dofs of
    /// an edge or face with multiplicity.
    pub fn find(&self, entity: EntityKey, dof_type: DofType, k: usize) -> Option<DofHandle> {
        self.dof(self.calculate_dof_id(entity, dof_type) + k as DofId)
    }

    pub fn fix(&mut self, handle: DofHandle, value: f64) {
        let dof = self.get_mut(handle);
        dof.fixed = true;
        dof.value = value;
    }

    pub fn free(&mut self, handle: DofHandle) {
        self.get_mut(handle).fixed = false;
    }

    /// Assigns positions in the free and fixed system vectors in handle order.
    ///
    /// Returns the number of free and fixed dofs.
    pub fn index_dofs(&mut self) -> (usize, usize) {
        let mut num_free = 0;
        let mut num_fixed = 0;
        for dof in &mut self.dofs {
            let counter = if dof.fixed { &mut num_fixed } else { &mut num_free };
            dof.index = Some(*counter);
            *counter += 1;
        }
        debug!("Indexed {} free and {} fixed dofs", num_free, num_fixed);
        (num_free, num_fixed)
    }

    fn create_dof(&mut self, entity: EntityKey, dof_type: DofType, k: usize) {
        let id = self.calculate_dof_id(entity, dof_type) + k as DofId;
        if self.lookup.contains_key(&id) {
            return;
        }
        let handle = DofHandle(self.dofs.len());
        self.dofs.push(Dof {
            id,
            entity,
            dof_type,
            index: None,
            fixed: false,
            value: 0.0,
        });
        self.lookup.insert(id, handle);
    }

    fn create_entity_dofs(&mut self, mesh: &Mesh, element: &Element, group: Id, with_nodes: bool) {
        let edge_types = self.dofs_per_edge(group).to_vec();
        let face_types = self.dofs_per_face(group).to_vec();
        let node_types = self.dofs_per_node(group).to_vec();

        for &edge in &element.edges {
            let entity = EntityKey::edge(mesh.edge(edge).id);
            for &dof_type in &edge_types {
                for k in 0..self.edge_multiplicity() {
                    self.create_dof(entity, dof_type, k);
                }
            }
        }
        debug_assert_eq!(element.faces.len(), connectivity::num_faces(element.element_type));
        for &face in &element.faces {
            let entity = EntityKey::face(mesh.face(face).id);
            for &dof_type in &face_types {
                for k in 0..self.face_multiplicity() {
                    self.create_dof(entity, dof_type, k);
                }
            }
        }
        if with_nodes {
            for &dof_type in &node_types {
                for &node in &element.nodes {
                    self.create_dof(EntityKey::node(mesh.node(node).id), dof_type, 0);
                }
            }
        }
    }

    fn group(&self, group: Id) -> Option<&GroupDofTypes> {
        self.config.groups.get(&group)
    }
}

impl DofProvider for DofManager {
    fn dofs_per_node(&self, group: Id) -> &[DofType] {
        self.group(group).map(|g| g.node.as_slice()).unwrap_or(&[])
    }

    fn dofs_per_edge(&self, group: Id) -> &[DofType] {
        self.group(group).map(|g| g.edge.as_slice()).unwrap_or(&[])
    }

    fn dofs_per_face(&self, group: Id) -> &[DofType] {
        self.group(group).map(|g| g.face.as_slice()).unwrap_or(&[])
    }

    fn lambda_dofs(&self, group: Id) -> &[DofType] {
        self.group(group).map(|g| g.lambda.as_slice()).unwrap_or(&[])
    }

    fn edge_multiplicity(&self) -> usize {
        self.config.edge_multiplicity
    }

    fn face_multiplicity(&self) -> usize {
        self.config.face_multiplicity
    }

    fn calculate_dof_id(&self, entity: EntityKey, dof_type: DofType) -> DofId {
        let num_types = DofType::ALL.len() as u64;
        let stride = self.edge_multiplicity().max(self.face_multiplicity()).max(1) as u64;
        ((entity.id * 4 + entity.kind.code()) * num_types + dof_type.code()) * stride
    }

    fn dof(&self, id: DofId) -> Option<DofHandle> {
        self.lookup.get(&id).copied()
    }
}
