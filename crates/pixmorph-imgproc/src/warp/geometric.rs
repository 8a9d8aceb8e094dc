use std::f32::consts::TAU;

use pixmorph_image::ImageError;

/// Closed-form distortions evaluated in normalized coordinates.
///
/// All variants map a normalized destination position to a normalized source position.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeometricKind {
    /// Unwrap the image around its center: destination x is the angle, y the radius.
    CartesianToPolar,
    /// Wrap a polar image (x = angle, y = radius) back around the center.
    PolarToCartesian,
    /// Barrel distortion, edges are pulled towards the center.
    Barrel {
        /// Radial coefficient, `>= 0`.
        strength: f32,
    },
    /// Pincushion distortion, edges are pushed away from the center.
    Pincushion {
        /// Radial coefficient, `>= 0`.
        strength: f32,
    },
    /// Fish-eye lens effect magnifying the center of the image.
    FishEye {
        /// Exponent offset applied to the radius inside the unit disc, `> -1`.
        strength: f32,
    },
    /// Map the destination rectangle onto a quadrilateral of the source.
    ///
    /// The four source corners (top-left, top-right, bottom-right, bottom-left) are blended
    /// bilinearly by the destination position. This is not a projective homography: straight
    /// lines that are not parallel to the image sides may bend.
    Perspective {
        /// Normalized source corners.
        corners: [(f32, f32); 4],
    },
}

impl GeometricKind {
    /// Check that the parameters are finite and inside their domain.
    pub fn validate(&self) -> Result<(), ImageError> {
        let invalid = |msg: String| Err(ImageError::InvalidParameter(msg));
        match *self {
            GeometricKind::CartesianToPolar | GeometricKind::PolarToCartesian => Ok(()),
            GeometricKind::Barrel { strength } | GeometricKind::Pincushion { strength } => {
                if !strength.is_finite() || strength < 0.0 {
                    return invalid(format!("distortion strength must be >= 0, got {strength}"));
                }
                Ok(())
            }
            GeometricKind::FishEye { strength } => {
                if !strength.is_finite() || strength <= -1.0 {
                    return invalid(format!("fish-eye strength must be > -1, got {strength}"));
                }
                Ok(())
            }
            GeometricKind::Perspective { corners } => {
                if corners.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
                    return invalid(format!("perspective corners must be finite: {corners:?}"));
                }
                Ok(())
            }
        }
    }

    /// Evaluate the inverse mapping at a normalized destination position.
    pub fn evaluate(&self, nx: f32, ny: f32) -> Option<(f32, f32)> {
        match *self {
            GeometricKind::CartesianToPolar => {
                let theta = nx * TAU;
                let r = ny * 0.5;
                Some((0.5 + r * theta.cos(), 0.5 + r * theta.sin()))
            }
            GeometricKind::PolarToCartesian => {
                let (dx, dy) = (nx - 0.5, ny - 0.5);
                let r = (dx * dx + dy * dy).sqrt() / 0.5;
                if r > 1.0 {
                    return None;
                }
                let theta = dy.atan2(dx).rem_euclid(TAU);
                Some((theta / TAU, r))
            }
            GeometricKind::Barrel { strength } => {
                Some(radial(nx, ny, |r2| 1.0 + strength * r2))
            }
            GeometricKind::Pincushion { strength } => {
                Some(radial(nx, ny, |r2| 1.0 / (1.0 + strength * r2)))
            }
            GeometricKind::FishEye { strength } => Some(radial(nx, ny, |r2| {
                let r = r2.sqrt();
                if r <= 0.0 || r >= 1.0 {
                    1.0
                } else {
                    r.powf(strength)
                }
            })),
            GeometricKind::Perspective { corners } => {
                let [tl, tr, br, bl] = corners;
                let w = [
                    (1.0 - nx) * (1.0 - ny),
                    nx * (1.0 - ny),
                    nx * ny,
                    (1.0 - nx) * ny,
                ];
                let x = w[0] * tl.0 + w[1] * tr.0 + w[2] * br.0 + w[3] * bl.0;
                let y = w[0] * tl.1 + w[1] * tr.1 + w[2] * br.1 + w[3] * bl.1;
                Some((x, y))
            }
        }
    }
}

/// Scale the offset from the image center by `factor(r^2)`, with `r = 1` at the mid-edges.
#[inline]
fn radial(nx: f32, ny: f32, factor: impl Fn(f32) -> f32) -> (f32, f32) {
    let (dx, dy) = (2.0 * nx - 1.0, 2.0 * ny - 1.0);
    let k = factor(dx * dx + dy * dy);
    (0.5 + 0.5 * dx * k, 0.5 + 0.5 * dy * k)
}

#[cfg(test)]
mod tests {
    use super::GeometricKind;
    use approx::assert_relative_eq;

    #[test]
    fn polar_roundtrip() {
        let (nx, ny) = (0.8, 0.3);
        let (px, py) = GeometricKind::PolarToCartesian.evaluate(nx, ny).unwrap();
        let (x, y) = GeometricKind::CartesianToPolar.evaluate(px, py).unwrap();
        assert_relative_eq!(x, nx, epsilon = 1e-5);
        assert_relative_eq!(y, ny, epsilon = 1e-5);
    }

    #[test]
    fn polar_outside_disc() {
        assert_eq!(GeometricKind::PolarToCartesian.evaluate(0.0, 0.0), None);
        let (_, r) = GeometricKind::PolarToCartesian.evaluate(0.5, 0.5).unwrap();
        assert_eq!(r, 0.0);
    }

    #[test]
    fn radial_distortions_keep_center() {
        for kind in [
            GeometricKind::Barrel { strength: 0.3 },
            GeometricKind::Pincushion { strength: 0.3 },
            GeometricKind::FishEye { strength: 0.5 },
        ] {
            assert_eq!(kind.evaluate(0.5, 0.5), Some((0.5, 0.5)));
        }
    }

    #[test]
    fn barrel_and_pincushion() {
        let (x, _) = GeometricKind::Barrel { strength: 0.5 }
            .evaluate(1.0, 0.5)
            .unwrap();
        assert_relative_eq!(x, 1.25);

        let (x, _) = GeometricKind::Pincushion { strength: 1.0 }
            .evaluate(1.0, 0.5)
            .unwrap();
        assert_relative_eq!(x, 0.75);

        let (x, y) = GeometricKind::Barrel { strength: 0.0 }
            .evaluate(0.2, 0.7)
            .unwrap();
        assert_relative_eq!(x, 0.2, epsilon = 1e-6);
        assert_relative_eq!(y, 0.7, epsilon = 1e-6);
    }

    #[test]
    fn fisheye_magnifies_center() {
        let (x, _) = GeometricKind::FishEye { strength: 1.0 }
            .evaluate(0.75, 0.5)
            .unwrap();
        // r = 0.5 -> source radius 0.25
        assert_relative_eq!(x, 0.625);
    }

    #[test]
    fn perspective_corners() {
        let corners = [(0.1, 0.0), (0.9, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let kind = GeometricKind::Perspective { corners };
        assert_eq!(kind.evaluate(0.0, 0.0), Some((0.1, 0.0)));
        assert_eq!(kind.evaluate(1.0, 0.0), Some((0.9, 0.0)));
        assert_eq!(kind.evaluate(1.0, 1.0), Some((1.0, 1.0)));
        let (x, y) = kind.evaluate(0.5, 0.5).unwrap();
        assert_relative_eq!(x, 0.5);
        assert_relative_eq!(y, 0.5);
    }

    #[test]
    fn validate_parameters() {
        assert!(GeometricKind::Barrel { strength: -0.1 }.validate().is_err());
        assert!(GeometricKind::FishEye { strength: -1.0 }.validate().is_err());
        assert!(GeometricKind::Perspective {
            corners: [(f32::NAN, 0.0); 4]
        }
        .validate()
        .is_err());
        assert!(GeometricKind::CartesianToPolar.validate().is_ok());
    }
}
