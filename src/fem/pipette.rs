//! Measurement of element lengths, areas and volumes.
//!
//! Besides plain quadrature of the Jacobian determinant, volumes can be measured
//! independently through the divergence theorem over the element facets,
//! $|\Omega| = \frac{1}{d} \oint_{\partial \Omega} x \cdot n \, dA$, which checks the facet
//! connectivity independently of the volume rule. Facets are integrated as elements of their
//! own type here. The facet tables of a side set group live in [`Group::master_integration`].
use nalgebra::{DMatrix, Vector3};
use serde::{Deserialize, Serialize};

use crate::connectivity;
use crate::element::ElementType;
use crate::error::GroupError;
use crate::fem::{Group, IntegrationData, Measure};
use crate::mesh;
use crate::mesh::{Id, Mesh};
use crate::quadrature::IntegrationScheme;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pipette {
    pub scheme: IntegrationScheme,
    /// Quadrature order used for all measurements.
    pub order: usize,
}

impl Default for Pipette {
    fn default() -> Self {
        Self {
            scheme: IntegrationScheme::Gauss,
            order: 6,
        }
    }
}

impl Pipette {
    pub fn with_order(order: usize) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    fn integration(&self, element_type: ElementType) -> eyre::Result<IntegrationData<f64>> {
        let mut data = IntegrationData::new(element_type);
        data.populate(self.scheme, self.order)?;
        Ok(data)
    }

    /// Length, area or volume of an element by quadrature of its Jacobian.
    pub fn element_measure(&self, mesh: &Mesh, element: &mesh::Element) -> eyre::Result<f64> {
        let data = self.integration(element.element_type)?;
        let coordinates = mesh.element_coordinates(element);
        let measure = Measure::for_dimensions(mesh.dimension(), element.element_type.dimension());
        Ok((0..data.num_points())
            .map(|k| {
                let jacobian = &coordinates * data.dn_dxi(k).transpose();
                data.weights()[k] * measure.evaluate(&jacobian)
            })
            .sum())
    }

    /// Node coordinates and integration data of facet `facet` of an element.
    fn facet_geometry(&self, mesh: &Mesh, element: &mesh::Element, facet: usize) -> eyre::Result<(DMatrix<f64>, IntegrationData<f64>)> {
        let facet_type = connectivity::facet_type(element.element_type, facet)
            .filter(|_| facet < connectivity::num_facets(element.element_type))
            .ok_or_else(|| eyre::eyre!("Element type {} has no facet {}", element.element_type, facet))?;
        let nodes = connectivity::facet_nodes(element.element_type, facet);
        let coordinates = DMatrix::from_fn(mesh.dimension(), nodes.len(), |i, j| {
            mesh.node(element.nodes[nodes[j]]).coords[i]
        });
        Ok((coordinates, self.integration(facet_type)?))
    }

    /// Area (or length, in two dimensions) of facet `facet` of an element.
    pub fn facet_area(&self, mesh: &Mesh, element: &mesh::Element, facet: usize) -> eyre::Result<f64> {
        let (coordinates, data) = self.facet_geometry(mesh, element, facet)?;
        let measure = Measure::for_dimensions(mesh.dimension(), mesh.dimension() - 1);
        Ok((0..data.num_points())
            .map(|k| {
                let jacobian = &coordinates * data.dn_dxi(k).transpose();
                data.weights()[k] * measure.evaluate(&jacobian)
            })
            .sum())
    }

    /// Volume (or area, in two dimensions) of an element by the divergence theorem over its
    /// facets.
    ///
    /// Relies on the facets being outward oriented.
    pub fn measure_by_boundary(&self, mesh: &Mesh, element: &mesh::Element) -> eyre::Result<f64> {
        let dim = mesh.dimension();
        let mut flux = 0.0;
        for facet in 0..connectivity::num_facets(element.element_type) {
            let (coordinates, data) = self.facet_geometry(mesh, element, facet)?;
            for k in 0..data.num_points() {
                let x = &coordinates * data.n(k).transpose();
                let jacobian = &coordinates * data.dn_dxi(k).transpose();
                // Normal scaled by the surface element
                let normal = if dim == 2 {
                    Vector3::new(jacobian[(1, 0)], -jacobian[(0, 0)], 0.0)
                } else {
                    let a = Vector3::new(jacobian[(0, 0)], jacobian[(1, 0)], jacobian[(2, 0)]);
                    let b = Vector3::new(jacobian[(0, 1)], jacobian[(1, 1)], jacobian[(2, 1)]);
                    a.cross(&b)
                };
                let x_dot_n: f64 = (0..dim).map(|i| x[i] * normal[i]).sum();
                flux += data.weights()[k] * x_dot_n;
            }
        }
        Ok(flux / dim as f64)
    }

    /// Total measure of the volume elements of a block.
    pub fn block_measure(&self, mesh: &Mesh, block: Id) -> eyre::Result<f64> {
        let block = mesh.block(block).ok_or(GroupError::UnknownBlock(block))?;
        block
            .elements
            .iter()
            .map(|&e| self.element_measure(mesh, mesh.element(e)))
            .sum()
    }

    /// Total measure of the elements of a group, using the group's own integration data.
    pub fn group_measure(&self, mesh: &Mesh, group: &Group) -> f64 {
        (0..group.elements().len())
            .map(|e| group.element_measure(mesh, e))
            .sum()
    }
}
