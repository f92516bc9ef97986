//! Basic procedural mesh generation routines.
//!
//! The generators return a [`MeshBuilder`] so that side sets can be added before the mesh is
//! built. Node ids are one-based and enumerate the grid points with the x index varying
//! fastest.
use nalgebra::Point3;

use crate::element::ElementType;
use crate::mesh::{Id, MeshBuilder};

fn grid_node_id(n: [usize; 3], i: usize, j: usize, k: usize) -> Id {
    let [nx, ny, _] = n;
    (k * (ny + 1) * (nx + 1) + j * (nx + 1) + i) as Id + 1
}

fn add_grid_nodes(builder: &mut MeshBuilder, cells: [usize; 3], size: [f64; 3]) {
    let [nx, ny, nz] = cells;
    for k in 0..=nz {
        for j in 0..=ny {
            for i in 0..=nx {
                let x = size[0] * i as f64 / nx as f64;
                let y = size[1] * j as f64 / ny as f64;
                let z = if nz == 0 { 0.0 } else { size[2] * k as f64 / nz as f64 };
                builder
                    .add_node(grid_node_id(cells, i, j, k), Point3::new(x, y, z))
                    .expect("Grid node ids are unique");
            }
        }
    }
}

/// Generates an axis-aligned rectangle `[0, size[0]] x [0, size[1]]` of `QUAD4` elements.
pub fn create_rectangle_quad4(cells: [usize; 2], size: [f64; 2], block: Id) -> MeshBuilder {
    let grid = [cells[0], cells[1], 0];
    let mut builder = MeshBuilder::new(2);
    add_grid_nodes(&mut builder, grid, [size[0], size[1], 0.0]);
    for j in 0..cells[1] {
        for i in 0..cells[0] {
            let quad = [
                grid_node_id(grid, i, j, 0),
                grid_node_id(grid, i + 1, j, 0),
                grid_node_id(grid, i + 1, j + 1, 0),
                grid_node_id(grid, i, j + 1, 0),
            ];
            builder
                .add_element(block, ElementType::Quad4, &quad)
                .expect("Grid elements refer to existing nodes");
        }
    }
    builder
}

/// Generates an axis-aligned rectangle of `TRI3` elements, two per grid cell.
pub fn create_rectangle_tri3(cells: [usize; 2], size: [f64; 2], block: Id) -> MeshBuilder {
    let grid = [cells[0], cells[1], 0];
    let mut builder = MeshBuilder::new(2);
    add_grid_nodes(&mut builder, grid, [size[0], size[1], 0.0]);
    for j in 0..cells[1] {
        for i in 0..cells[0] {
            let a = grid_node_id(grid, i, j, 0);
            let b = grid_node_id(grid, i + 1, j, 0);
            let c = grid_node_id(grid, i + 1, j + 1, 0);
            let d = grid_node_id(grid, i, j + 1, 0);
            for triangle in [[a, b, c], [a, c, d]] {
                builder
                    .add_element(block, ElementType::Tri3, &triangle)
                    .expect("Grid elements refer to existing nodes");
            }
        }
    }
    builder
}

/// Generates an axis-aligned box of `HEX8` elements.
pub fn create_box_hex8(cells: [usize; 3], size: [f64; 3], block: Id) -> MeshBuilder {
    let mut builder = MeshBuilder::new(3);
    add_grid_nodes(&mut builder, cells, size);
    for k in 0..cells[2] {
        for j in 0..cells[1] {
            for i in 0..cells[0] {
                let hex = cube_corners(cells, i, j, k);
                builder
                    .add_element(block, ElementType::Hex8, &hex)
                    .expect("Grid elements refer to existing nodes");
            }
        }
    }
    builder
}

/// Generates an axis-aligned box of `TET4` elements.
///
/// Every grid cell is split into six tetrahedra around its main diagonal, which gives a
/// conforming mesh.
pub fn create_box_tet4(cells: [usize; 3], size: [f64; 3], block: Id) -> MeshBuilder {
    // Paths from corner 0 to corner 6 of the cube along the axes, with permutation parity
    const PATHS: [([usize; 3], bool); 6] = [
        ([0, 1, 2], true),
        ([1, 2, 0], true),
        ([2, 0, 1], true),
        ([0, 2, 1], false),
        ([2, 1, 0], false),
        ([1, 0, 2], false),
    ];

    let mut builder = MeshBuilder::new(3);
    add_grid_nodes(&mut builder, cells, size);
    for k in 0..cells[2] {
        for j in 0..cells[1] {
            for i in 0..cells[0] {
                for (axes, even) in PATHS {
                    let mut offset = [0; 3];
                    let mut path = [0; 4];
                    path[0] = grid_node_id(cells, i, j, k);
                    for (step, &axis) in axes.iter().enumerate() {
                        offset[axis] = 1;
                        path[step + 1] = grid_node_id(cells, i + offset[0], j + offset[1], k + offset[2]);
                    }
                    if !even {
                        path.swap(1, 2);
                    }
                    builder
                        .add_element(block, ElementType::Tet4, &path)
                        .expect("Grid elements refer to existing nodes");
                }
            }
        }
    }
    builder
}

fn cube_corners(cells: [usize; 3], i: usize, j: usize, k: usize) -> [Id; 8] {
    [
        grid_node_id(cells, i, j, k),
        grid_node_id(cells, i + 1, j, k),
        grid_node_id(cells, i + 1, j + 1, k),
        grid_node_id(cells, i, j + 1, k),
        grid_node_id(cells, i, j, k + 1),
        grid_node_id(cells, i + 1, j, k + 1),
        grid_node_id(cells, i + 1, j + 1, k + 1),
        grid_node_id(cells, i, j + 1, k + 1),
    ]
}
