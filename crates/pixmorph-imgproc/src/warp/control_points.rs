use pixmorph_image::ImageError;

/// Stiffness used when a triangulation warp falls back to the spline approximation.
pub const DEFAULT_STIFFNESS: f32 = 1.0;

/// Total weights below this value are considered degenerate.
const MIN_TOTAL_WEIGHT: f64 = 1e-12;

/// Two parallel lists of pixel positions: `src[i]` in the source image corresponds to
/// `dst[i]` in the destination image.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlPointSet {
    src: Vec<(i32, i32)>,
    dst: Vec<(i32, i32)>,
}

impl ControlPointSet {
    /// Create a set of correspondences.
    ///
    /// # Errors
    ///
    /// Fails with [`ImageError::InvalidParameter`] if the lists are empty or their lengths
    /// differ.
    pub fn new(src: Vec<(i32, i32)>, dst: Vec<(i32, i32)>) -> Result<Self, ImageError> {
        if src.len() != dst.len() {
            return Err(ImageError::InvalidParameter(format!(
                "control point count mismatch: {} source vs {} destination",
                src.len(),
                dst.len()
            )));
        }
        if src.is_empty() {
            return Err(ImageError::InvalidParameter(
                "at least one control point is required".to_string(),
            ));
        }
        Ok(Self { src, dst })
    }

    /// The source positions.
    pub fn src(&self) -> &[(i32, i32)] {
        &self.src
    }

    /// The destination positions.
    pub fn dst(&self) -> &[(i32, i32)] {
        &self.dst
    }

    /// Number of correspondences.
    pub fn len(&self) -> usize {
        self.src.len()
    }

    /// Always false, a set holds at least one correspondence.
    pub fn is_empty(&self) -> bool {
        self.src.is_empty()
    }
}

/// How a [`ControlPointSet`] is turned into a dense mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WarpMethod {
    /// Radial basis weighting of the control point displacements.
    ///
    /// Each control point is weighted by the inverse of `U(r) = r^2 ln(r) + stiffness * r^2`,
    /// where `r` is the pixel distance to its destination position. This approximates a
    /// thin-plate spline without solving the full linear system.
    ///
    /// The weight is `1 / U(r)`, not `U(r)`: near points must dominate so that identical
    /// source and destination points give the identity map.
    ThinPlateSpline {
        /// Regularization added to the kernel, `> 0`.
        stiffness: f32,
    },
    /// A regular grid of `(cols + 1) x (rows + 1)` correspondences stored row-major.
    ///
    /// Destination pixels are located in their grid cell and the four source corners of the
    /// cell are blended bilinearly.
    Mesh {
        /// Number of cells along x.
        cols: usize,
        /// Number of cells along y.
        rows: usize,
    },
    /// Piecewise mapping over a triangulation of the control points.
    ///
    /// Currently evaluated with the spline approximation and [`DEFAULT_STIFFNESS`], no
    /// Delaunay triangulation is built.
    Triangulation,
}

impl WarpMethod {
    /// Check that `points` can drive this method.
    pub fn validate(&self, points: &ControlPointSet) -> Result<(), ImageError> {
        match *self {
            WarpMethod::ThinPlateSpline { stiffness } => {
                if !stiffness.is_finite() || stiffness <= 0.0 {
                    return Err(ImageError::InvalidParameter(format!(
                        "spline stiffness must be > 0, got {stiffness}"
                    )));
                }
                require_spline_points(points)
            }
            WarpMethod::Triangulation => require_spline_points(points),
            WarpMethod::Mesh { cols, rows } => {
                if cols == 0 || rows == 0 {
                    return Err(ImageError::InvalidParameter(format!(
                        "mesh must have at least one cell, got {cols}x{rows}"
                    )));
                }
                let expected = (cols + 1) * (rows + 1);
                if points.len() != expected {
                    return Err(ImageError::InvalidParameter(format!(
                        "a {cols}x{rows} mesh needs {expected} control points, got {}",
                        points.len()
                    )));
                }
                let xs = mesh_columns(points, cols);
                let ys = mesh_rows(points, cols, rows);
                if !strictly_increasing(&xs) || !strictly_increasing(&ys) {
                    return Err(ImageError::InvalidParameter(
                        "mesh destination points must form an increasing grid".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Map a destination pixel to a source pixel.
    ///
    /// Returns `None` when the control points carry no usable weight at `(x, y)`, e.g. with
    /// an extreme stiffness; callers fall back to a plain scale between the two images.
    pub fn evaluate(&self, points: &ControlPointSet, x: f32, y: f32) -> Option<(f32, f32)> {
        match *self {
            WarpMethod::ThinPlateSpline { stiffness } => spline_evaluate(points, stiffness, x, y),
            WarpMethod::Triangulation => spline_evaluate(points, DEFAULT_STIFFNESS, x, y),
            WarpMethod::Mesh { cols, rows } => Some(mesh_evaluate(points, cols, rows, x, y)),
        }
    }
}

fn require_spline_points(points: &ControlPointSet) -> Result<(), ImageError> {
    if points.len() < 3 {
        return Err(ImageError::InvalidParameter(format!(
            "spline warps need at least 3 control points, got {}",
            points.len()
        )));
    }
    Ok(())
}

/// The radial kernel `r^2 ln(r) + stiffness * r^2`, zero at the origin.
fn rbf(r: f64, stiffness: f64) -> f64 {
    if r < 1e-6 {
        return 0.0;
    }
    r * r * r.ln() + stiffness * r * r
}

fn spline_evaluate(
    points: &ControlPointSet,
    stiffness: f32,
    x: f32,
    y: f32,
) -> Option<(f32, f32)> {
    let (x, y) = (x as f64, y as f64);
    let stiffness = stiffness as f64;

    let mut total = 0.0;
    let (mut shift_x, mut shift_y) = (0.0, 0.0);
    for (&(sx, sy), &(dx, dy)) in points.src.iter().zip(points.dst.iter()) {
        let (dx, dy) = (dx as f64, dy as f64);
        let (offset_x, offset_y) = (sx as f64 - dx, sy as f64 - dy);

        let r = (x - dx).hypot(y - dy);
        let energy = rbf(r, stiffness);
        if energy <= 0.0 {
            // on (or numerically at) a control point, follow it exactly
            return Some(((x + offset_x) as f32, (y + offset_y) as f32));
        }

        let weight = 1.0 / energy;
        total += weight;
        shift_x += weight * offset_x;
        shift_y += weight * offset_y;
    }

    if total < MIN_TOTAL_WEIGHT {
        return None;
    }

    Some(((x + shift_x / total) as f32, (y + shift_y / total) as f32))
}

fn mesh_columns(points: &ControlPointSet, cols: usize) -> Vec<f32> {
    points.dst[..=cols].iter().map(|p| p.0 as f32).collect()
}

fn mesh_rows(points: &ControlPointSet, cols: usize, rows: usize) -> Vec<f32> {
    (0..=rows)
        .map(|j| points.dst[j * (cols + 1)].1 as f32)
        .collect()
}

fn strictly_increasing(v: &[f32]) -> bool {
    v.windows(2).all(|w| w[0] < w[1])
}

/// Index of the cell containing `v` and the fractional position inside it.
///
/// Positions outside the grid use the closest border cell and extrapolate.
fn locate(edges: &[f32], v: f32) -> (usize, f32) {
    let cells = edges.len() - 1;
    let i = edges[1..cells]
        .iter()
        .take_while(|&&e| e <= v)
        .count();
    let (lo, hi) = (edges[i], edges[i + 1]);
    (i, (v - lo) / (hi - lo))
}

fn mesh_evaluate(points: &ControlPointSet, cols: usize, rows: usize, x: f32, y: f32) -> (f32, f32) {
    let (i, fu) = locate(&mesh_columns(points, cols), x);
    let (j, fv) = locate(&mesh_rows(points, cols, rows), y);

    let at = |c: usize, r: usize| {
        let p = points.src[r * (cols + 1) + c];
        (p.0 as f32, p.1 as f32)
    };
    let (p00, p10, p01, p11) = (at(i, j), at(i + 1, j), at(i, j + 1), at(i + 1, j + 1));

    let blend = |a: f32, b: f32, c: f32, d: f32| {
        a * (1.0 - fu) * (1.0 - fv) + b * fu * (1.0 - fv) + c * (1.0 - fu) * fv + d * fu * fv
    };

    (
        blend(p00.0, p10.0, p01.0, p11.0),
        blend(p00.1, p10.1, p01.1, p11.1),
    )
}
