//! Linking of elements and facets to their degrees of freedom.
//!
//! Every configuration is described as a sequence of sides, each contributing some of the
//! nodes, edges and faces of one topological element. Dofs are emitted edges first (all sides
//! in order), then faces, then nodes, then interface multipliers. [`DofManager`] creates dofs
//! in the same order.
//!
//! [`DofManager`]: crate::dof::DofManager
use fixedbitset::FixedBitSet;
use log::{trace, warn};
use serde::{Deserialize, Serialize};

use crate::dof::{DofHandle, DofProvider, DofType, EntityKey};
use crate::error::{LinkError, TopologyError};
use crate::fem::{Element, ElementSource};
use crate::mesh;
use crate::mesh::{Id, Index, Mesh};

/// How the elements of a side set obtain their degrees of freedom.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkMode {
    /// Dofs on the facet itself, plus interface multipliers.
    FacetOnly,
    /// Dofs on the facet and on the master element.
    FacetAndMaster,
    /// Dofs on the facet and on the slave element.
    FacetAndSlave,
    /// Dofs on both volume elements, plus interface multipliers.
    ///
    /// Facets without a slave fall back to [`LinkMode::FacetAndMaster`] if the master block
    /// carries dofs and to [`LinkMode::FacetOnly`] otherwise.
    MasterAndSlave,
    /// Dofs of the block carried by a cut facet, on the facet nodes and edges.
    Cut,
    /// A stack of ghost layers between master and slave.
    Shell(ShellLink),
}

/// Variants of the layered shell configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShellLink {
    /// Dofs on the facet, edge and face dofs on every layer, plus interface multipliers.
    FacetOnly,
    /// Nodal dofs of both volume elements, edge and face dofs of both volume elements and of
    /// every layer, plus interface multipliers.
    MasterAndSlave,
}

/// Where the edge directions of a side come from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Directions {
    Compute,
    /// Copied from the side at the given position, which must share the edges.
    Borrow(usize),
}

#[derive(Debug, Copy, Clone)]
struct Side<'a> {
    topology: &'a mesh::Element,
    group: Id,
    nodes: bool,
    edges: bool,
    faces: bool,
    directions: Directions,
}

impl<'a> Side<'a> {
    fn full(topology: &'a mesh::Element, group: Id) -> Self {
        Self {
            topology,
            group,
            nodes: true,
            edges: true,
            faces: true,
            directions: Directions::Compute,
        }
    }

    fn borrowing(mut self, side: usize) -> Self {
        self.directions = Directions::Borrow(side);
        self
    }

    /// A ghost layer only contributes its own edges and faces.
    fn layer(topology: &'a mesh::Element, group: Id) -> Self {
        Self {
            nodes: false,
            ..Self::full(topology, group)
        }
    }
}

/// Dof types of a side and the number of dofs they produce.
struct SideCounts<'p> {
    node_types: &'p [DofType],
    edge_type: Option<DofType>,
    face_type: Option<DofType>,
    total: usize,
}

fn side_counts<'p, P>(provider: &'p P, side: &Side) -> Result<SideCounts<'p>, LinkError>
where
    P: DofProvider + ?Sized,
{
    let topology = side.topology;
    let node_types: &[DofType] = if side.nodes {
        provider.dofs_per_node(side.group)
    } else {
        &[]
    };
    let edge_types: &[DofType] = if side.edges {
        provider.dofs_per_edge(side.group)
    } else {
        &[]
    };
    let face_types: &[DofType] = if side.faces {
        provider.dofs_per_face(side.group)
    } else {
        &[]
    };
    if edge_types.len() > 1 {
        return Err(LinkError::MultipleEdgeDofTypes {
            group: side.group,
            count: edge_types.len(),
        });
    }
    if face_types.len() > 1 {
        return Err(LinkError::MultipleFaceDofTypes {
            group: side.group,
            count: face_types.len(),
        });
    }

    let total = node_types.len() * topology.nodes.len()
        + edge_types.len() * topology.edges.len() * provider.edge_multiplicity()
        + face_types.len() * topology.faces.len() * provider.face_multiplicity();
    Ok(SideCounts {
        node_types,
        edge_type: edge_types.first().copied(),
        face_type: face_types.first().copied(),
        total,
    })
}

fn canonical_node(mesh: &Mesh, node: Index) -> Index {
    mesh.duplicate_of(node).map_or(node, |duplicate| duplicate.min(node))
}

/// Decides whether local edge `e` of an element runs along the canonical direction of its
/// edge entity.
///
/// Nodes split along a cut are matched with their duplicates if the direct comparison fails.
pub fn resolve_edge_direction(mesh: &Mesh, element: &mesh::Element, e: usize) -> Result<bool, TopologyError> {
    let [n0, n1] = element.edge_nodes(e);
    let [a, b] = mesh.edge(element.edges[e]).nodes;
    if (a, b) == (n0, n1) {
        return Ok(true);
    }
    if (a, b) == (n1, n0) {
        return Ok(false);
    }

    let [a, b, n0, n1] = [a, b, n0, n1].map(|n| canonical_node(mesh, n));
    if (a, b) == (n0, n1) {
        Ok(true)
    } else if (a, b) == (n1, n0) {
        Ok(false)
    } else {
        let [n0, n1] = element.edge_nodes(e);
        let [a, b] = mesh.edge(element.edges[e]).nodes;
        Err(TopologyError::UnresolvedEdgeDirection {
            element: element.id,
            edge: e,
            expected: [mesh.node(a).id, mesh.node(b).id],
            found: [mesh.node(n0).id, mesh.node(n1).id],
        })
    }
}

/// Resolves the directions of all local edges of an element.
pub fn resolve_edge_directions(mesh: &Mesh, element: &mesh::Element) -> Result<FixedBitSet, TopologyError> {
    let mut directions = FixedBitSet::with_capacity(element.edges.len());
    for e in 0..element.edges.len() {
        directions.set(e, resolve_edge_direction(mesh, element, e)?);
    }
    Ok(directions)
}

/// Derives the edge directions of a facet from those already resolved for an adjacent
/// volume element sharing its edge entities.
pub fn grab_edge_directions_for_facet(
    mesh: &Mesh,
    facet: &mesh::Element,
    volume: &mesh::Element,
    volume_directions: &FixedBitSet,
) -> Result<FixedBitSet, TopologyError> {
    let mut directions = FixedBitSet::with_capacity(facet.edges.len());
    for (i, &edge) in facet.edges.iter().enumerate() {
        let j = volume
            .edges
            .iter()
            .position(|&other| other == edge)
            .ok_or(TopologyError::UnmatchedFacetEdge { facet: facet.id, edge: i })?;
        let facet_nodes = facet.edge_nodes(i).map(|n| canonical_node(mesh, n));
        let volume_nodes = volume.edge_nodes(j).map(|n| canonical_node(mesh, n));
        let same_traversal = facet_nodes == volume_nodes;
        directions.set(i, volume_directions[j] == same_traversal);
    }
    Ok(directions)
}

fn lookup<P: DofProvider + ?Sized>(provider: &P, entity: EntityKey, dof_type: DofType, k: usize) -> Result<DofHandle, LinkError> {
    let id = provider.calculate_dof_id(entity, dof_type) + k as u64;
    provider.dof(id).ok_or(LinkError::MissingDof { id })
}

/// Links the given sides in the fixed emission order.
fn link_sides<P>(
    mesh: &Mesh,
    provider: &P,
    source: ElementSource,
    sides: &[Side],
    lambda: Option<(EntityKey, Id)>,
) -> Result<Element, LinkError>
where
    P: DofProvider + ?Sized,
{
    let counts = sides
        .iter()
        .map(|side| side_counts(provider, side))
        .collect::<Result<Vec<_>, _>>()?;
    let lambda_types: &[DofType] = match lambda {
        Some((_, sideset)) => provider.lambda_dofs(sideset),
        None => &[],
    };
    let expected = counts.iter().map(|c| c.total).sum::<usize>() + lambda_types.len();
    let mut dofs = Vec::with_capacity(expected);

    // Edge dof order depends on the directions, so they are resolved before anything is linked
    let mut side_directions: Vec<Option<FixedBitSet>> = vec![None; sides.len()];
    for (i, side) in sides.iter().enumerate() {
        let borrowed_from = sides.iter().any(|other| other.directions == Directions::Borrow(i));
        if side.directions == Directions::Compute && (side.edges || borrowed_from) {
            side_directions[i] = Some(resolve_edge_directions(mesh, side.topology)?);
        }
    }
    for (i, side) in sides.iter().enumerate() {
        if let Directions::Borrow(j) = side.directions {
            let volume_directions = side_directions[j]
                .as_ref()
                .expect("Borrowed edge directions must be computed");
            side_directions[i] = Some(grab_edge_directions_for_facet(
                mesh,
                side.topology,
                sides[j].topology,
                volume_directions,
            )?);
        }
    }

    let mut edge_directions = FixedBitSet::with_capacity(0);
    for (side, directions) in sides.iter().zip(&side_directions) {
        if !side.edges {
            continue;
        }
        let directions = directions
            .as_ref()
            .expect("Directions are resolved for every side with edges");
        let offset = edge_directions.len();
        edge_directions.grow(offset + side.topology.edges.len());
        for e in directions.ones() {
            edge_directions.insert(offset + e);
        }
    }

    let edge_multiplicity = provider.edge_multiplicity();
    for ((side, count), directions) in sides.iter().zip(&counts).zip(&side_directions) {
        if let Some(edge_type) = count.edge_type {
            let directions = directions
                .as_ref()
                .expect("Directions are resolved for every side with edges");
            for (e, &edge) in side.topology.edges.iter().enumerate() {
                let entity = EntityKey::edge(mesh.edge(edge).id);
                for k in 0..edge_multiplicity {
                    // Reversed edges see the dofs of the edge from the other end
                    let k = if directions[e] { k } else { edge_multiplicity - 1 - k };
                    dofs.push(lookup(provider, entity, edge_type, k)?);
                }
            }
        }
    }

    let face_multiplicity = provider.face_multiplicity();
    for (side, count) in sides.iter().zip(&counts) {
        if let Some(face_type) = count.face_type {
            for &face in &side.topology.faces {
                let entity = EntityKey::face(mesh.face(face).id);
                for k in 0..face_multiplicity {
                    dofs.push(lookup(provider, entity, face_type, k)?);
                }
            }
        }
    }

    for (side, count) in sides.iter().zip(&counts) {
        for &dof_type in count.node_types {
            for &node in &side.topology.nodes {
                dofs.push(lookup(provider, EntityKey::node(mesh.node(node).id), dof_type, 0)?);
            }
        }
    }

    if let Some((entity, _)) = lambda {
        for &dof_type in lambda_types {
            dofs.push(lookup(provider, entity, dof_type, 0)?);
        }
    }

    assert_eq!(
        dofs.len(),
        expected,
        "Number of linked dofs differs from the number of dofs the element requires"
    );
    trace!("Linked {} dofs to {:?}", dofs.len(), source);
    Ok(Element::new(source, dofs, edge_directions))
}

/// Links a volume element of a block to the dofs of the block.
pub fn link_block_element<P>(mesh: &Mesh, provider: &P, element: Index) -> Result<Element, LinkError>
where
    P: DofProvider + ?Sized,
{
    let topology = mesh.element(element);
    let sides = [Side::full(topology, topology.group)];
    link_sides(mesh, provider, ElementSource::Volume(element), &sides, None)
}

fn has_dofs<P: DofProvider + ?Sized>(provider: &P, group: Id) -> bool {
    !(provider.dofs_per_node(group).is_empty()
        && provider.dofs_per_edge(group).is_empty()
        && provider.dofs_per_face(group).is_empty())
}

/// Links a facet of a side set according to the given mode.
pub fn link_facet<P>(mesh: &Mesh, provider: &P, facet: Index, sideset: Id, mode: LinkMode) -> Result<Element, LinkError>
where
    P: DofProvider + ?Sized,
{
    let facet = mesh.facet(facet);
    let source = ElementSource::Facet(facet.index);
    let lambda = Some((EntityKey::facet(facet.element.id), sideset));
    let volume = |index: Option<Index>, side: &'static str| {
        index
            .map(|index| mesh.element(index))
            .ok_or(LinkError::MissingVolume { facet: facet.id, side })
    };

    match mode {
        LinkMode::FacetOnly => {
            let sides = [Side::full(&facet.element, sideset)];
            link_sides(mesh, provider, source, &sides, lambda)
        }
        LinkMode::FacetAndMaster => {
            let master = volume(facet.master, "master")?;
            let sides = [
                Side::full(&facet.element, sideset).borrowing(1),
                Side::full(master, master.group),
            ];
            link_sides(mesh, provider, source, &sides, None)
        }
        LinkMode::FacetAndSlave => {
            let slave = volume(facet.slave, "slave")?;
            let sides = [
                Side::full(&facet.element, sideset).borrowing(1),
                Side::full(slave, slave.group),
            ];
            link_sides(mesh, provider, source, &sides, None)
        }
        LinkMode::MasterAndSlave => {
            let master = volume(facet.master, "master")?;
            match facet.slave {
                Some(slave) => {
                    let slave = mesh.element(slave);
                    let sides = [Side::full(master, master.group), Side::full(slave, slave.group)];
                    link_sides(mesh, provider, source, &sides, lambda)
                }
                None => {
                    let fallback = if has_dofs(provider, master.group) {
                        LinkMode::FacetAndMaster
                    } else {
                        LinkMode::FacetOnly
                    };
                    warn!(
                        "Facet {} of side set {} has no slave, linking as {:?}",
                        facet.id, sideset, fallback
                    );
                    link_facet(mesh, provider, facet.index, sideset, fallback)
                }
            }
        }
        LinkMode::Cut => {
            let block = facet
                .cut_block
                .ok_or(LinkError::MissingCutBlock { facet: facet.id })?;
            let sides = [Side::full(&facet.element, block)];
            link_sides(mesh, provider, source, &sides, None)
        }
        LinkMode::Shell(ShellLink::FacetOnly) => {
            let mut sides = vec![Side::full(&facet.element, sideset)];
            sides.extend(facet.layers.iter().map(|layer| Side::layer(layer, sideset)));
            link_sides(mesh, provider, source, &sides, lambda)
        }
        LinkMode::Shell(ShellLink::MasterAndSlave) => {
            let master = volume(facet.master, "master")?;
            let slave = volume(facet.slave, "slave")?;
            let mut sides = vec![Side::full(master, master.group)];
            sides.extend(facet.layers.iter().map(|layer| Side::layer(layer, sideset)));
            sides.push(Side::full(slave, slave.group));
            link_sides(mesh, provider, source, &sides, lambda)
        }
    }
}
