use itertools::Itertools;
use log::debug;
use nalgebra::{DMatrix, Vector3};
use serde::{Deserialize, Serialize};

use crate::connectivity;
use crate::dof::{DofManager, DofProvider, DofType, EntityKey};
use crate::element::ElementType;
use crate::error::GroupError;
use crate::fem::{link_block_element, link_facet, Element, ElementSource, IntegrationData, LinkMode};
use crate::mesh;
use crate::mesh::{Id, Index, Mesh};
use crate::quadrature::facet::{master_intpoints, num_orientations, slave_intpoints};
use crate::quadrature::{default_order, IntegrationScheme};

/// Lifecycle of a [`Group`]. Construction walks through the states in order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GroupState {
    Uninitialized,
    IntegrationDataPopulated,
    ElementsLinked,
    Ready,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKind {
    Block,
    SideSet,
    Shell,
}

/// Settings for the construction of a [`Group`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupSettings {
    /// Quadrature order. Defaults to twice the interpolation degree of the element type.
    pub integration_order: Option<usize>,
    pub scheme: IntegrationScheme,
    /// Only create elements owned by the rank of the mesh.
    pub owned_only: bool,
}

/// How the size of an element is measured from its Jacobian, chosen from the spatial and
/// the parametric dimension.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Measure {
    /// Parametric and spatial dimension agree: absolute determinant.
    Determinant,
    /// Curves: length of the tangent.
    Length,
    /// Surfaces in three dimensions: norm of the cross product of the tangents.
    Area,
}

impl Measure {
    pub fn for_dimensions(spatial_dim: usize, reference_dim: usize) -> Self {
        match (spatial_dim, reference_dim) {
            (s, r) if s == r => Self::Determinant,
            (_, 1) => Self::Length,
            (3, 2) => Self::Area,
            _ => panic!(
                "Cannot measure a {}-dimensional element in {} dimensions",
                reference_dim, spatial_dim
            ),
        }
    }

    /// Measure of the `spatial_dim x reference_dim` Jacobian `jacobian`.
    pub fn evaluate(&self, jacobian: &DMatrix<f64>) -> f64 {
        match self {
            Self::Determinant => jacobian.determinant().abs(),
            Self::Length => jacobian.column(0).norm(),
            Self::Area => {
                let a = Vector3::new(jacobian[(0, 0)], jacobian[(1, 0)], jacobian[(2, 0)]);
                let b = Vector3::new(jacobian[(0, 1)], jacobian[(1, 1)], jacobian[(2, 1)]);
                a.cross(&b).norm()
            }
        }
    }
}

/// A homogeneous collection of dof-bearing elements with the integration data they share.
///
/// Block groups are built from the volume elements of a block. Side set groups are built from
/// facets and additionally hold integration tables expressing each facet's points in the
/// reference coordinates of the master element, and, for interior facets, of the slave
/// element for every orientation.
#[derive(Debug, Clone)]
pub struct Group {
    id: Id,
    kind: GroupKind,
    link_mode: Option<LinkMode>,
    state: GroupState,
    settings: GroupSettings,
    element_type: ElementType,
    master_type: Option<ElementType>,
    slave_type: Option<ElementType>,
    measure: Measure,
    elements: Vec<Element>,
    integration: IntegrationData<f64>,
    master_integration: Vec<IntegrationData<f64>>,
    slave_integration: Vec<Vec<IntegrationData<f64>>>,
}

fn single_type(types: impl Iterator<Item = ElementType>, group: Id) -> Result<Option<ElementType>, GroupError> {
    let types: Vec<_> = types.unique().collect();
    match types.as_slice() {
        [] => Ok(None),
        [element_type] => Ok(Some(*element_type)),
        _ => Err(GroupError::MixedElementTypes { group }),
    }
}

impl Group {
    fn new(
        mesh: &Mesh,
        id: Id,
        kind: GroupKind,
        link_mode: Option<LinkMode>,
        element_type: ElementType,
        settings: GroupSettings,
    ) -> Self {
        Self {
            id,
            kind,
            link_mode,
            state: GroupState::Uninitialized,
            settings,
            element_type,
            master_type: None,
            slave_type: None,
            measure: Measure::for_dimensions(mesh.dimension(), element_type.dimension()),
            elements: Vec::new(),
            integration: IntegrationData::new(element_type),
            master_integration: Vec::new(),
            slave_integration: Vec::new(),
        }
    }

    fn transition(&mut self, state: GroupState) {
        debug!("Group {} ({:?}): {:?} -> {:?}", self.id, self.kind, self.state, state);
        self.state = state;
    }

    fn order(&self) -> usize {
        self.settings
            .integration_order
            .unwrap_or_else(|| default_order(self.element_type))
    }

    fn populate_integration(&mut self) -> eyre::Result<()> {
        let order = self.order();
        self.integration.populate(self.settings.scheme, order)?;
        self.transition(GroupState::IntegrationDataPopulated);
        Ok(())
    }

    /// Creates the group of a block and links its elements.
    pub fn block<P>(mesh: &Mesh, provider: &P, block: Id, settings: GroupSettings) -> eyre::Result<Self>
    where
        P: DofProvider + ?Sized,
    {
        let topology = mesh.block(block).ok_or(GroupError::UnknownBlock(block))?;
        let mut group = Self::new(mesh, block, GroupKind::Block, None, topology.element_type, settings);
        group.populate_integration()?;

        for &element in &topology.elements {
            if group.settings.owned_only && mesh.element(element).owner != mesh.rank() {
                continue;
            }
            group.elements.push(link_block_element(mesh, provider, element)?);
        }
        group.transition(GroupState::ElementsLinked);
        group.transition(GroupState::Ready);
        Ok(group)
    }

    /// Creates the group of a side set, links its facets with the given mode and builds the
    /// master and slave integration tables.
    pub fn sideset<P>(mesh: &Mesh, provider: &P, sideset: Id, mode: LinkMode, settings: GroupSettings) -> eyre::Result<Self>
    where
        P: DofProvider + ?Sized,
    {
        let topology = mesh.sideset(sideset).ok_or(GroupError::UnknownSideSet(sideset))?;
        let facets = || topology.facets.iter().map(|&f| mesh.facet(f));
        let element_type = single_type(facets().map(|f| f.element.element_type), sideset)?
            .ok_or(GroupError::EmptyGroup(sideset))?;
        let master_type = single_type(
            facets().filter_map(|f| f.master).map(|e| mesh.element(e).element_type),
            sideset,
        )?;
        let slave_type = single_type(
            facets().filter_map(|f| f.slave).map(|e| mesh.element(e).element_type),
            sideset,
        )?;

        let kind = match mode {
            LinkMode::Shell(_) => GroupKind::Shell,
            _ => GroupKind::SideSet,
        };
        let mut group = Self::new(mesh, sideset, kind, Some(mode), element_type, settings);
        group.master_type = master_type;
        group.slave_type = slave_type;
        group.populate_integration()?;

        for facet in facets() {
            if group.settings.owned_only && facet.element.owner != mesh.rank() {
                continue;
            }
            group
                .elements
                .push(link_facet(mesh, provider, facet.index, sideset, mode)?);
        }
        group.transition(GroupState::ElementsLinked);

        group.build_facet_tables()?;
        group.transition(GroupState::Ready);
        Ok(group)
    }

    fn build_facet_tables(&mut self) -> eyre::Result<()> {
        let order = self.order();
        let scheme = self.settings.scheme;
        if let Some(master_type) = self.master_type {
            self.master_integration = (0..connectivity::num_facets(master_type))
                .map(|f| {
                    let (weights, points) = master_intpoints(scheme, master_type, f, order)?;
                    let mut data = IntegrationData::<f64>::new(master_type);
                    data.populate_with(weights, points);
                    Ok(data)
                })
                .collect::<eyre::Result<_>>()?;
        }
        if let Some(slave_type) = self.slave_type {
            let mut tables = Vec::new();
            for f in 0..connectivity::num_facets(slave_type) {
                let facet_type = connectivity::facet_type(slave_type, f).expect("Volume elements have facets");
                let orientations = (0..num_orientations(facet_type.geometry()))
                    .map(|orientation| {
                        let (weights, points) = slave_intpoints(scheme, slave_type, f, orientation, order)?;
                        let mut data = IntegrationData::<f64>::new(slave_type);
                        data.populate_with(weights, points);
                        Ok(data)
                    })
                    .collect::<eyre::Result<Vec<_>>>()?;
                tables.push(orientations);
            }
            self.slave_integration = tables;
        }
        debug!(
            "Group {}: built {} master and {} slave facet tables",
            self.id,
            self.master_integration.len(),
            self.slave_integration.iter().map(Vec::len).sum::<usize>()
        );
        Ok(())
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn link_mode(&self) -> Option<LinkMode> {
        self.link_mode
    }

    pub fn state(&self) -> GroupState {
        self.state
    }

    pub fn settings(&self) -> &GroupSettings {
        &self.settings
    }

    /// The element type of the group's elements: the volume type for blocks and the facet
    /// type for side sets.
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn master_type(&self) -> Option<ElementType> {
        self.master_type
    }

    pub fn slave_type(&self) -> Option<ElementType> {
        self.slave_type
    }

    pub fn measure(&self) -> Measure {
        self.measure
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut [Element] {
        &mut self.elements
    }

    pub fn element(&self, e: usize) -> &Element {
        &self.elements[e]
    }

    /// Integration data on the group's own element type.
    pub fn integration(&self) -> &IntegrationData<f64> {
        &self.integration
    }

    /// Integration points of facet `facet` in the reference coordinates of the master.
    pub fn master_integration(&self, facet: usize) -> Result<&IntegrationData<f64>, GroupError> {
        self.master_integration
            .get(facet)
            .ok_or(GroupError::NoIntegrationTable {
                facet,
                orientation: None,
            })
    }

    /// Integration points of facet `facet` in the reference coordinates of a slave seeing the
    /// facet with the given orientation, in the order of the master points.
    pub fn slave_integration(&self, facet: usize, orientation: usize) -> Result<&IntegrationData<f64>, GroupError> {
        self.slave_integration
            .get(facet)
            .and_then(|tables| tables.get(orientation))
            .ok_or(GroupError::NoIntegrationTable {
                facet,
                orientation: Some(orientation),
            })
    }

    /// The topological element underlying element `e`.
    pub fn topology<'a>(&self, mesh: &'a Mesh, e: usize) -> &'a mesh::Element {
        match self.elements[e].source() {
            ElementSource::Volume(index) => mesh.element(index),
            ElementSource::Facet(index) => &mesh.facet(index).element,
        }
    }

    /// Jacobian `dx/dxi` of element `e` at integration point `k`, a
    /// `spatial_dim x reference_dim` matrix.
    pub fn jacobian(&self, mesh: &Mesh, e: usize, k: usize) -> DMatrix<f64> {
        let coordinates = mesh.element_coordinates(self.topology(mesh, e));
        coordinates * self.integration.dn_dxi(k).transpose()
    }

    /// Length, area or volume of element `e` by quadrature.
    pub fn element_measure(&self, mesh: &Mesh, e: usize) -> f64 {
        let weights = self.integration.weights();
        (0..weights.len())
            .map(|k| weights[k] * self.measure.evaluate(&self.jacobian(mesh, e, k)))
            .sum()
    }

    /// Fixes the dofs of the given type on every node of the group.
    ///
    /// Nodes are visited once, using the node flags of the mesh. Returns the number of fixed
    /// dofs; nodes without a dof of this type are skipped.
    pub fn impose_dirichlet(&self, mesh: &mut Mesh, dofs: &mut DofManager, dof_type: DofType, value: f64) -> usize {
        mesh.unflag_nodes();
        let nodes: Vec<Index> = {
            let mesh: &Mesh = mesh;
            (0..self.elements.len())
                .flat_map(|e| self.topology(mesh, e).nodes.iter().copied())
                .collect()
        };
        let mut count = 0;
        for node in nodes {
            let node = &mut mesh.nodes_mut()[node];
            if node.flag {
                continue;
            }
            node.flag = true;
            if let Some(handle) = dofs.find(EntityKey::node(node.id), dof_type, 0) {
                dofs.fix(handle, value);
                count += 1;
            }
        }
        debug!("Group {}: fixed {} dofs of type {:?}", self.id, count, dof_type);
        count
    }
}
