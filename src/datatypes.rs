use nalgebra::{DMatrix, DVector, Point2, SMatrix};

use crate::error::ViewerError;

pub const VALUES_PER_TRIANGLE: usize = 6;

/// Boundary polyline stored as a `k x 2` matrix. Column 0 holds R, column 1 holds Z.
#[derive(Debug, Clone, PartialEq)]
pub struct Limiter {
    pub pairs: DMatrix<f64>,
}

impl Limiter {
    /// Splits a flat list into (R,Z) pairs. The first half of `values` holds
    /// every R coordinate and the second half every Z coordinate.
    pub fn from_flat(values: Vec<f64>) -> Result<Limiter, ViewerError> {
        if values.len() % 2 != 0 {
            return Err(ViewerError::Shape(format!(
                "limiter has {} values; expected an even count (R values followed by Z values)",
                values.len()
            )));
        }

        let num_pairs = values.len() / 2;
        let rr = DVector::from_column_slice(&values[..num_pairs]);
        let zz = DVector::from_column_slice(&values[num_pairs..]);

        Ok(Limiter {
            pairs: DMatrix::from_columns(&[rr, zz]),
        })
    }

    /// Builds pairs from interleaved `r0, z0, r1, z1, ...` values
    pub fn from_pairs(values: Vec<f64>) -> Result<Limiter, ViewerError> {
        if values.len() % 2 != 0 {
            return Err(ViewerError::Shape(format!(
                "{} values cannot be read as (R,Z) pairs",
                values.len()
            )));
        }

        Ok(Limiter {
            pairs: DMatrix::from_row_slice(values.len() / 2, 2, &values),
        })
    }

    pub fn len(&self) -> usize {
        self.pairs.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn r(&self) -> Vec<f64> {
        self.pairs.column(0).iter().copied().collect()
    }

    pub fn z(&self) -> Vec<f64> {
        self.pairs.column(1).iter().copied().collect()
    }

    pub fn points(&self) -> Vec<Point2<f64>> {
        self.pairs
            .row_iter()
            .map(|row| Point2::new(row[0], row[1]))
            .collect()
    }

    /// Row-major flattening: `r0, z0, r1, z1, ...`
    pub fn flatten(&self) -> Vec<f64> {
        self.pairs
            .row_iter()
            .flat_map(|row| [row[0], row[1]])
            .collect()
    }
}

/// One triangle as a 3x2 block, one vertex per row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: SMatrix<f64, 3, 2>,
}

impl Triangle {
    /// `values` must hold exactly six numbers
    pub(crate) fn from_row_slice(values: &[f64]) -> Triangle {
        Triangle {
            vertices: SMatrix::<f64, 3, 2>::from_row_slice(values),
        }
    }

    pub fn vertex(&self, i: usize) -> Point2<f64> {
        Point2::new(self.vertices[(i, 0)], self.vertices[(i, 1)])
    }

    pub fn vertices(&self) -> [Point2<f64>; 3] {
        [self.vertex(0), self.vertex(1), self.vertex(2)]
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TriangleMesh {
    pub triangles: Vec<Triangle>,
}

impl TriangleMesh {
    /// Reshapes a flat list into triangles, preserving row-major order.
    pub fn from_flat(values: Vec<f64>) -> Result<TriangleMesh, ViewerError> {
        if values.len() % VALUES_PER_TRIANGLE != 0 {
            return Err(ViewerError::Shape(format!(
                "triangle data has {} values; expected a multiple of {} (3 vertices x 2 coordinates)",
                values.len(),
                VALUES_PER_TRIANGLE
            )));
        }

        let triangles = values
            .chunks_exact(VALUES_PER_TRIANGLE)
            .map(Triangle::from_row_slice)
            .collect();

        Ok(TriangleMesh { triangles })
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Triangle> {
        self.triangles.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    pub fn flatten(&self) -> Vec<f64> {
        self.triangles
            .iter()
            .flat_map(|t| t.vertices().into_iter().flat_map(|v| [v.x, v.y]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limiter_splits_first_half_into_r_and_second_half_into_z() {
        let values: Vec<f64> = (0..10).map(|v| v as f64 * 1.5).collect();
        let limiter = Limiter::from_flat(values.clone()).unwrap();

        assert_eq!(limiter.len(), 5);
        for i in 0..5 {
            assert_eq!(limiter.r()[i], values[i]);
            assert_eq!(limiter.z()[i], values[5 + i]);
        }
        assert_eq!(limiter.points()[2], Point2::new(3.0, 10.5));
    }

    #[test]
    fn limiter_rejects_odd_counts() {
        let err = Limiter::from_flat(vec![1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, ViewerError::Shape(_)));
    }

    #[test]
    fn limiter_flatten_interleaves_pairs() {
        let limiter = Limiter::from_flat(vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        assert_eq!(limiter.flatten(), vec![0.0, 2.0, 1.0, 3.0]);

        let again = Limiter::from_pairs(limiter.flatten()).unwrap();
        assert_eq!(again, limiter);
    }

    #[test]
    fn empty_limiter_has_no_pairs() {
        let limiter = Limiter::from_flat(Vec::new()).unwrap();
        assert!(limiter.is_empty());
        assert!(limiter.points().is_empty());
    }

    #[test]
    fn mesh_reshapes_into_row_major_blocks() {
        let values: Vec<f64> = (0..12).map(|v| v as f64).collect();
        let mesh = TriangleMesh::from_flat(values).unwrap();

        assert_eq!(mesh.len(), 2);
        let second = mesh.get(1).unwrap();
        assert_eq!(second.vertex(0), Point2::new(6.0, 7.0));
        assert_eq!(second.vertex(1), Point2::new(8.0, 9.0));
        assert_eq!(second.vertex(2), Point2::new(10.0, 11.0));
        assert_eq!(second.vertices[(2, 1)], 11.0);
        assert_eq!(mesh.flatten(), (0..12).map(|v| v as f64).collect::<Vec<_>>());
    }

    #[test]
    fn mesh_rejects_partial_triangles() {
        let err = TriangleMesh::from_flat(vec![0.0; 8]).unwrap_err();
        assert!(matches!(err, ViewerError::Shape(_)));
    }

    #[test]
    fn empty_mesh_is_allowed() {
        let mesh = TriangleMesh::from_flat(Vec::new()).unwrap();
        assert!(mesh.is_empty());
        assert!(mesh.get(0).is_none());
    }
}
