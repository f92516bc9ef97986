//! Degree-of-freedom linking and facet-consistent quadrature for finite element kernels.
//!
//! The crate turns a partitioned [`mesh::Mesh`] into groups of DOF-bearing elements
//! ([`fem::Group`]) whose degree-of-freedom lists are enumerated deterministically, and whose
//! facet quadrature is consistent across interior facets regardless of how the neighbouring
//! elements number their nodes.
use nalgebra::RealField;

pub mod connectivity;
pub mod dof;
pub mod element;
pub mod error;
pub mod fem;
pub mod mesh;
pub mod quadrature;

#[cfg(feature = "proptest")]
pub mod proptest;

pub extern crate nalgebra;

/// Scalar type used by the generic reference element and quadrature routines.
pub trait Real: RealField + Copy {}

impl<T> Real for T where T: RealField + Copy {}
