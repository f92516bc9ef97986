//! Rule selection by polynomial strength.
//!
//! Each function returns the smallest rule of its family that integrates every polynomial of
//! (total, for simplices, or per-dimension, for tensor domains) degree `strength` exactly.

use crate::simplex::{tetrahedron_collapsed, triangle_collapsed};
use crate::tensor::{hexahedron_gauss, quadrilateral_gauss};
use crate::univariate::gauss;
use crate::{Error, Rule};

/// Largest strength for which rules are handed out.
pub const MAX_STRENGTH: usize = 40;

fn check_strength(strength: usize) -> Result<(), Error> {
    if strength <= MAX_STRENGTH {
        Ok(())
    } else {
        Err(Error::NoRuleAvailable)
    }
}

/// Number of Gauss points needed per dimension for a tensor rule of the given strength.
pub fn gauss_points_for_strength(strength: usize) -> usize {
    (strength + 2) / 2
}

pub fn line(strength: usize) -> Result<Rule<1>, Error> {
    check_strength(strength)?;
    Ok(gauss(gauss_points_for_strength(strength)))
}

pub fn quadrilateral(strength: usize) -> Result<Rule<2>, Error> {
    check_strength(strength)?;
    Ok(quadrilateral_gauss(gauss_points_for_strength(strength)))
}

pub fn hexahedron(strength: usize) -> Result<Rule<3>, Error> {
    check_strength(strength)?;
    Ok(hexahedron_gauss(gauss_points_for_strength(strength)))
}

pub fn triangle(strength: usize) -> Result<Rule<2>, Error> {
    check_strength(strength)?;
    Ok(triangle_collapsed((strength + 3) / 2))
}

pub fn tetrahedron(strength: usize) -> Result<Rule<3>, Error> {
    check_strength(strength)?;
    Ok(tetrahedron_collapsed((strength + 4) / 2))
}

/// Tensor product of a triangle rule and a line rule on `[-1, 1]`.
pub fn prism(strength: usize) -> Result<Rule<3>, Error> {
    let (tri_weights, tri_points) = triangle(strength)?;
    let (line_weights, line_points) = line(strength)?;
    let mut weights = Vec::with_capacity(tri_weights.len() * line_weights.len());
    let mut points = Vec::with_capacity(weights.capacity());
    for (&w_tri, &[x, y]) in tri_weights.iter().zip(&tri_points) {
        for (&w_line, &[z]) in line_weights.iter().zip(&line_points) {
            weights.push(w_tri * w_line);
            points.push([x, y, z]);
        }
    }
    Ok((weights, points))
}
