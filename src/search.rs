use crate::{datatypes::TriangleMesh, error::ViewerError};

/// Vertex slots each triangle occupies in the search file's indexing scheme
pub const SLOTS_PER_TRIANGLE: f64 = 3.0;

/// Maps a search value to the triangle it references
///
/// # Arguments
/// * `value` - A vertex-slot reference read from the search file
/// * `triangle_count` - Number of triangles in the mesh
///
/// # Returns
/// `floor(value / 3)` as an index into the mesh
pub fn triangle_index(value: f64, triangle_count: usize) -> Result<usize, ViewerError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ViewerError::Search(format!(
            "search value {value} is not a valid vertex slot"
        )));
    }

    let index = (value / SLOTS_PER_TRIANGLE).floor();
    if index >= triangle_count as f64 {
        return Err(ViewerError::Search(format!(
            "search value {value} maps to triangle {index}, but the mesh has {triangle_count} triangles"
        )));
    }

    Ok(index as usize)
}

/// Maps every search value to a triangle index, keeping file order
pub fn select_triangles(mesh: &TriangleMesh, values: &[f64]) -> Result<Vec<usize>, ViewerError> {
    let indices = values
        .iter()
        .map(|value| triangle_index(*value, mesh.len()))
        .collect::<Result<Vec<usize>, ViewerError>>()?;

    println!(
        "info: {} search entries select {} triangles",
        values.len(),
        indices.len()
    );

    Ok(indices)
}
