//! Mesh topology: nodes, edges, faces, elements and facets grouped into blocks and side sets.
//!
//! All entities live in flat arrays owned by the [`Mesh`] and refer to each other by index.
//! Use [`MeshBuilder`] to assemble a mesh; the builder derives the shared edge and face
//! entities and the facets of side sets.
use nalgebra::{DMatrix, Point3};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::connectivity;
use crate::element::ElementType;

mod builder;
pub mod procedural;

pub use builder::MeshBuilder;

/// Global identifier of a mesh entity.
pub type Id = u64;

/// Position of an entity in the storage of the mesh.
pub type Index = usize;

/// Process rank owning an entity.
pub type Rank = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: Id,
    pub index: Index,
    pub coords: Point3<f64>,
    pub owner: Rank,
    /// Marker used by sweeps over the nodes, e.g. when imposing boundary conditions.
    pub flag: bool,
}

/// An edge shared by all elements touching it.
///
/// The node order is the canonical direction of the edge. It is taken from the first element
/// that referenced the edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: Id,
    pub index: Index,
    pub nodes: [Index; 2],
    pub owner: Rank,
}

/// A face shared by all elements touching it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    pub id: Id,
    pub index: Index,
    pub corners: Vec<Index>,
    pub owner: Rank,
}

/// A topological element.
///
/// `edges` and `faces` hold the indices of the shared entities in local edge and face order
/// (see [`connectivity`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub id: Id,
    pub index: Index,
    pub element_type: ElementType,
    pub nodes: Vec<Index>,
    pub edges: Vec<Index>,
    pub faces: Vec<Index>,
    /// The block or side set the element belongs to.
    pub group: Id,
    pub geometry_tag: Id,
    pub physical_tag: Id,
    pub curved: bool,
    pub owner: Rank,
}

impl Element {
    /// The nodes of local edge `e`, in the order the element traverses the edge.
    pub fn edge_nodes(&self, e: usize) -> [Index; 2] {
        let [a, b] = connectivity::edge_nodes(self.element_type, e);
        [self.nodes[a], self.nodes[b]]
    }
}

/// A lower-dimensional element separating up to two volume elements.
///
/// The facet element enumerates its nodes in the order of facet `master_index` of the master
/// element. A boundary facet has no slave, and a cut facet has neither master nor slave but
/// carries the block that supplies its degrees of freedom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub id: Id,
    pub index: Index,
    pub element: Element,
    pub master: Option<Index>,
    pub slave: Option<Index>,
    pub master_index: usize,
    pub slave_index: usize,
    /// Orientation code of the slave side, see [`crate::quadrature::facet`].
    pub orientation: usize,
    pub cut_block: Option<Id>,
    /// Ghost layers between master and slave, all sharing the nodes of the facet.
    pub layers: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: Id,
    pub element_type: ElementType,
    pub elements: Vec<Index>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SideSetKind {
    Boundary,
    Interface,
    Cut,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideSet {
    pub id: Id,
    pub kind: SideSetKind,
    pub facets: Vec<Index>,
}

/// The mesh partition owned by one process rank.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub(crate) dimension: usize,
    pub(crate) rank: Rank,
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) faces: Vec<Face>,
    pub(crate) elements: Vec<Element>,
    pub(crate) facets: Vec<Facet>,
    pub(crate) blocks: Vec<Block>,
    pub(crate) sidesets: Vec<SideSet>,
    pub(crate) node_lookup: FxHashMap<Id, Index>,
    pub(crate) duplicates: FxHashMap<Index, Index>,
}

impl Mesh {
    /// Spatial dimension of the mesh, 2 or 3.
    ///
    /// Two-dimensional meshes store their coordinates in the xy-plane.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn sidesets(&self) -> &[SideSet] {
        &self.sidesets
    }

    pub fn node(&self, index: Index) -> &Node {
        &self.nodes[index]
    }

    pub fn edge(&self, index: Index) -> &Edge {
        &self.edges[index]
    }

    pub fn face(&self, index: Index) -> &Face {
        &self.faces[index]
    }

    pub fn element(&self, index: Index) -> &Element {
        &self.elements[index]
    }

    pub fn facet(&self, index: Index) -> &Facet {
        &self.facets[index]
    }

    pub fn find_node(&self, id: Id) -> Option<Index> {
        self.node_lookup.get(&id).copied()
    }

    pub fn block(&self, id: Id) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id == id)
    }

    pub fn sideset(&self, id: Id) -> Option<&SideSet> {
        self.sidesets.iter().find(|sideset| sideset.id == id)
    }

    /// The node a duplicated node was split from, or the duplicate of an original node.
    pub fn duplicate_of(&self, node: Index) -> Option<Index> {
        self.duplicates.get(&node).copied()
    }

    /// Node coordinates of an element as columns of a `dimension x num_nodes` matrix.
    pub fn element_coordinates(&self, element: &Element) -> DMatrix<f64> {
        DMatrix::from_fn(self.dimension, element.nodes.len(), |i, j| {
            self.nodes[element.nodes[j]].coords[i]
        })
    }

    /// Global ids of a sequence of node indices.
    pub fn node_ids(&self, nodes: &[Index]) -> Vec<Id> {
        nodes.iter().map(|&n| self.nodes[n].id).collect()
    }

    /// Clears the flag of every node.
    pub fn unflag_nodes(&mut self) {
        for node in &mut self.nodes {
            node.flag = false;
        }
    }
}
