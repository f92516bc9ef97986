use log::debug;
use nalgebra::Point3;
use rustc_hash::FxHashMap;

use crate::connectivity;
use crate::element::ElementType;
use crate::error::TopologyError;
use crate::mesh::{Block, Edge, Element, Face, Facet, Id, Index, Mesh, Node, Rank, SideSet, SideSetKind};
use crate::quadrature::facet::facet_orientation;

/// Incrementally assembles a [`Mesh`].
///
/// Edges and faces are identified by their corner nodes, where a duplicated node and its
/// original count as the same node. Duplicates must therefore be registered before the
/// elements using them.
#[derive(Debug, Clone, Default)]
pub struct MeshBuilder {
    dimension: usize,
    rank: Rank,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    faces: Vec<Face>,
    elements: Vec<Element>,
    facets: Vec<Facet>,
    blocks: Vec<Block>,
    sidesets: Vec<SideSet>,
    node_lookup: FxHashMap<Id, Index>,
    edge_lookup: FxHashMap<[Index; 2], Index>,
    face_lookup: FxHashMap<Vec<Index>, Index>,
    duplicates: FxHashMap<Index, Index>,
}

impl MeshBuilder {
    pub fn new(dimension: usize) -> Self {
        assert!(
            dimension == 2 || dimension == 3,
            "Only two- and three-dimensional meshes are supported"
        );
        Self {
            dimension,
            ..Default::default()
        }
    }

    /// Sets the rank of the process owning the mesh, which also becomes the owner of every
    /// subsequently added entity.
    pub fn with_rank(mut self, rank: Rank) -> Self {
        self.rank = rank;
        self
    }

    pub fn add_node(&mut self, id: Id, coords: Point3<f64>) -> Result<Index, TopologyError> {
        if self.node_lookup.contains_key(&id) {
            return Err(TopologyError::DuplicateNode(id));
        }
        let index = self.nodes.len();
        self.nodes.push(Node {
            id,
            index,
            coords,
            owner: self.rank,
            flag: false,
        });
        self.node_lookup.insert(id, index);
        Ok(index)
    }

    /// Changes the owner of a node.
    pub fn set_node_owner(&mut self, node: Index, owner: Rank) {
        self.nodes[node].owner = owner;
    }

    /// Declares `duplicate` to be a copy of `original`, e.g. a node split along a cut.
    pub fn add_duplicate_node(&mut self, original: Id, duplicate: Id) -> Result<(), TopologyError> {
        let a = self.node_index(original)?;
        let b = self.node_index(duplicate)?;
        self.duplicates.insert(a, b);
        self.duplicates.insert(b, a);
        Ok(())
    }

    /// Adds an element to a block, creating the block if necessary.
    pub fn add_element(&mut self, block: Id, element_type: ElementType, nodes: &[Id]) -> Result<Index, TopologyError> {
        if nodes.len() != element_type.num_nodes() {
            return Err(TopologyError::WrongNodeCount {
                element_type,
                expected: element_type.num_nodes(),
                found: nodes.len(),
            });
        }
        let nodes = nodes
            .iter()
            .map(|&id| self.node_index(id))
            .collect::<Result<Vec<_>, _>>()?;

        let block_position = match self.blocks.iter().position(|b| b.id == block) {
            Some(position) => {
                let expected = self.blocks[position].element_type;
                if expected != element_type {
                    return Err(TopologyError::MixedBlock {
                        block,
                        expected,
                        found: element_type,
                    });
                }
                position
            }
            None => {
                self.blocks.push(Block {
                    id: block,
                    element_type,
                    elements: Vec::new(),
                });
                self.blocks.len() - 1
            }
        };

        let index = self.elements.len();
        let element = self.make_element(index as Id + 1, index, element_type, nodes, block);
        self.elements.push(element);
        self.blocks[block_position].elements.push(index);
        Ok(index)
    }

    /// Changes the tags of an element.
    pub fn set_element_tags(&mut self, element: Index, geometry_tag: Id, physical_tag: Id, curved: bool) {
        let element = &mut self.elements[element];
        element.geometry_tag = geometry_tag;
        element.physical_tag = physical_tag;
        element.curved = curved;
    }

    /// Adds a side set of boundary facets, each given as an element and one of its local facets.
    pub fn add_boundary_sideset(&mut self, id: Id, facets: &[(Index, usize)]) -> Result<(), TopologyError> {
        self.check_new_sideset(id)?;
        let mut indices = Vec::with_capacity(facets.len());
        for &(master, master_index) in facets {
            let facet = self.make_facet(id, master, master_index)?;
            indices.push(self.push_facet(facet));
        }
        debug!("Added boundary side set {} with {} facets", id, indices.len());
        self.sidesets.push(SideSet {
            id,
            kind: SideSetKind::Boundary,
            facets: indices,
        });
        Ok(())
    }

    /// Adds a side set of interior facets, each given by its master element and local facet.
    ///
    /// The slave is the other element containing the same corner nodes. Its local facet and the
    /// orientation code relating the two sides are derived from the node numbering.
    pub fn add_interface_sideset(&mut self, id: Id, facets: &[(Index, usize)]) -> Result<(), TopologyError> {
        self.check_new_sideset(id)?;
        let neighbours = self.facet_lookup();
        let mut indices = Vec::with_capacity(facets.len());
        for &(master, master_index) in facets {
            let mut facet = self.make_facet(id, master, master_index)?;
            let key = self.facet_key(master, master_index);
            let (slave, slave_index) = neighbours
                .get(&key)
                .and_then(|candidates| candidates.iter().find(|(element, _)| *element != master))
                .copied()
                .ok_or(TopologyError::NoNeighbour {
                    element: master,
                    facet: master_index,
                })?;

            let master_corners = self.canonical_corners(master, master_index);
            let slave_corners = self.canonical_corners(slave, slave_index);
            let orientation = facet_orientation(&master_corners, &slave_corners).map_err(|_| {
                TopologyError::InconsistentFacet {
                    master,
                    slave,
                    facet: master_index,
                }
            })?;

            facet.slave = Some(slave);
            facet.slave_index = slave_index;
            facet.orientation = orientation;
            indices.push(self.push_facet(facet));
        }
        debug!("Added interface side set {} with {} facets", id, indices.len());
        self.sidesets.push(SideSet {
            id,
            kind: SideSetKind::Interface,
            facets: indices,
        });
        Ok(())
    }

    /// Adds a side set of two-node cut segments whose degrees of freedom are supplied by `block`.
    pub fn add_cut_sideset(&mut self, id: Id, block: Id, segments: &[[Id; 2]]) -> Result<(), TopologyError> {
        self.check_new_sideset(id)?;
        let mut indices = Vec::with_capacity(segments.len());
        for segment in segments {
            let nodes = segment
                .iter()
                .map(|&node| self.node_index(node))
                .collect::<Result<Vec<_>, _>>()?;
            let facet_id = self.facets.len() as Id + 1;
            let element = self.make_element(facet_id, self.facets.len(), ElementType::Line2, nodes, id);
            indices.push(self.push_facet(Facet {
                id: facet_id,
                index: 0,
                element,
                master: None,
                slave: None,
                master_index: 0,
                slave_index: 0,
                orientation: 0,
                cut_block: Some(block),
                layers: Vec::new(),
            }));
        }
        debug!("Added cut side set {} with {} facets for block {}", id, indices.len(), block);
        self.sidesets.push(SideSet {
            id,
            kind: SideSetKind::Cut,
            facets: indices,
        });
        Ok(())
    }

    /// Inserts `count` ghost layers into every facet of a side set.
    ///
    /// Each layer shares the nodes of its facet but has edges and faces of its own, traversed
    /// in the same directions as those of the facet.
    pub fn add_ghost_layers(&mut self, sideset: Id, count: usize) -> Result<(), TopologyError> {
        let facets = self
            .sidesets
            .iter()
            .find(|s| s.id == sideset)
            .map(|s| s.facets.clone())
            .ok_or(TopologyError::UnknownSideSet(sideset))?;

        for facet in facets {
            for layer in 0..count {
                let mut element = self.facets[facet].element.clone();
                element.id = element.id * (count as Id + 1) + layer as Id + 1;
                element.index = layer;
                let facet_edges = std::mem::take(&mut element.edges);
                element.edges = facet_edges
                    .into_iter()
                    .map(|e| {
                        let nodes = self.edges[e].nodes;
                        self.push_edge(nodes)
                    })
                    .collect();
                let facet_faces = std::mem::take(&mut element.faces);
                element.faces = facet_faces
                    .into_iter()
                    .map(|f| {
                        let corners = self.faces[f].corners.clone();
                        self.push_face(corners)
                    })
                    .collect();
                self.facets[facet].layers.push(element);
            }
        }
        debug!("Added {} ghost layers to side set {}", count, sideset);
        Ok(())
    }

    /// Element facets not shared with any other element, in element order.
    pub fn exterior_facets(&self) -> Vec<(Index, usize)> {
        let lookup = self.facet_lookup();
        self.element_facets()
            .filter(|&(element, f)| lookup[&self.facet_key(element, f)].len() == 1)
            .collect()
    }

    /// Element facets shared by two elements, each reported once from the element with the
    /// lower index.
    pub fn interior_facets(&self) -> Vec<(Index, usize)> {
        let lookup = self.facet_lookup();
        self.element_facets()
            .filter(|&(element, f)| {
                let candidates = &lookup[&self.facet_key(element, f)];
                candidates.len() > 1 && candidates.iter().all(|&(other, _)| other >= element)
            })
            .collect()
    }

    fn element_facets(&self) -> impl Iterator<Item = (Index, usize)> + '_ {
        self.elements.iter().flat_map(|element| {
            (0..connectivity::num_facets(element.element_type)).map(move |f| (element.index, f))
        })
    }

    pub fn build(self) -> Mesh {
        Mesh {
            dimension: self.dimension,
            rank: self.rank,
            nodes: self.nodes,
            edges: self.edges,
            faces: self.faces,
            elements: self.elements,
            facets: self.facets,
            blocks: self.blocks,
            sidesets: self.sidesets,
            node_lookup: self.node_lookup,
            duplicates: self.duplicates,
        }
    }

    fn node_index(&self, id: Id) -> Result<Index, TopologyError> {
        self.node_lookup
            .get(&id)
            .copied()
            .ok_or(TopologyError::UnknownNode(id))
    }

    /// The representative of a node among itself and its duplicate.
    fn canonical_node(&self, node: Index) -> Index {
        match self.duplicates.get(&node) {
            Some(&duplicate) => node.min(duplicate),
            None => node,
        }
    }

    fn canonical_corners(&self, element: Index, facet: usize) -> Vec<Id> {
        let element = &self.elements[element];
        connectivity::facet_corners(element.element_type, facet)
            .iter()
            .map(|&local| self.canonical_node(element.nodes[local]) as Id)
            .collect()
    }

    fn facet_key(&self, element: Index, facet: usize) -> Vec<Index> {
        let element = &self.elements[element];
        let mut key: Vec<_> = connectivity::facet_corners(element.element_type, facet)
            .iter()
            .map(|&local| self.canonical_node(element.nodes[local]))
            .collect();
        key.sort_unstable();
        key
    }

    /// Maps the sorted corner set of every element facet to the elements containing it.
    fn facet_lookup(&self) -> FxHashMap<Vec<Index>, Vec<(Index, usize)>> {
        let mut lookup: FxHashMap<_, Vec<_>> = FxHashMap::default();
        for element in &self.elements {
            for f in 0..connectivity::num_facets(element.element_type) {
                lookup
                    .entry(self.facet_key(element.index, f))
                    .or_default()
                    .push((element.index, f));
            }
        }
        lookup
    }

    fn check_new_sideset(&self, id: Id) -> Result<(), TopologyError> {
        if self.sidesets.iter().any(|s| s.id == id) {
            Err(TopologyError::DuplicateSideSet(id))
        } else {
            Ok(())
        }
    }

    fn push_facet(&mut self, mut facet: Facet) -> Index {
        let index = self.facets.len();
        facet.index = index;
        self.facets.push(facet);
        index
    }

    fn make_facet(&mut self, group: Id, master: Index, master_index: usize) -> Result<Facet, TopologyError> {
        let volume = self
            .elements
            .get(master)
            .ok_or(TopologyError::UnknownElement(master))?;
        let volume_type = volume.element_type;
        let facet_type = connectivity::facet_type(volume_type, master_index)
            .filter(|_| master_index < connectivity::num_facets(volume_type))
            .ok_or(TopologyError::FacetOutOfRange {
                element_type: volume_type,
                facet: master_index,
            })?;
        let nodes = connectivity::facet_nodes(volume_type, master_index)
            .into_iter()
            .map(|local| volume.nodes[local])
            .collect();

        let id = self.facets.len() as Id + 1;
        let element = self.make_element(id, self.facets.len(), facet_type, nodes, group);
        Ok(Facet {
            id,
            index: 0,
            element,
            master: Some(master),
            slave: None,
            master_index,
            slave_index: 0,
            orientation: 0,
            cut_block: None,
            layers: Vec::new(),
        })
    }

    /// Creates an element and registers its edges and faces.
    fn make_element(&mut self, id: Id, index: Index, element_type: ElementType, nodes: Vec<Index>, group: Id) -> Element {
        let edges = (0..connectivity::num_edges(element_type))
            .map(|e| {
                let [a, b] = connectivity::edge_nodes(element_type, e);
                self.find_or_insert_edge([nodes[a], nodes[b]])
            })
            .collect();
        let faces = (0..connectivity::num_faces(element_type))
            .map(|f| {
                let corners = connectivity::face_corners(element_type, f)
                    .iter()
                    .map(|&local| nodes[local])
                    .collect();
                self.find_or_insert_face(corners)
            })
            .collect();
        Element {
            id,
            index,
            element_type,
            nodes,
            edges,
            faces,
            group,
            geometry_tag: 0,
            physical_tag: 0,
            curved: false,
            owner: self.rank,
        }
    }

    fn find_or_insert_edge(&mut self, nodes: [Index; 2]) -> Index {
        let mut key = nodes.map(|n| self.canonical_node(n));
        key.sort_unstable();
        if let Some(&index) = self.edge_lookup.get(&key) {
            return index;
        }
        let index = self.push_edge(nodes);
        self.edge_lookup.insert(key, index);
        index
    }

    fn find_or_insert_face(&mut self, corners: Vec<Index>) -> Index {
        let mut key: Vec<_> = corners.iter().map(|&n| self.canonical_node(n)).collect();
        key.sort_unstable();
        if let Some(&index) = self.face_lookup.get(&key) {
            return index;
        }
        let index = self.push_face(corners);
        self.face_lookup.insert(key, index);
        index
    }

    /// Adds an edge without registering it for lookup.
    fn push_edge(&mut self, nodes: [Index; 2]) -> Index {
        let index = self.edges.len();
        self.edges.push(Edge {
            id: index as Id + 1,
            index,
            nodes,
            owner: self.rank,
        });
        index
    }

    fn push_face(&mut self, corners: Vec<Index>) -> Index {
        let index = self.faces.len();
        self.faces.push(Face {
            id: index as Id + 1,
            index,
            corners,
            owner: self.rank,
        });
        index
    }
}
