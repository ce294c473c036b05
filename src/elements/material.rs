//! Material properties

use serde::{Deserialize, Serialize};

use crate::error::{FEMError, FEMResult};
use crate::math::Mat3;

/// Linear-elastic isotropic material with a sheet thickness
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Modulus of elasticity (Young's modulus)
    pub young: f64,
    /// Poisson's ratio
    pub poisson: f64,
    /// Sheet thickness used for in-plane integration
    pub thickness: f64,
}

impl Material {
    /// Create a new material with given properties
    pub fn new(young: f64, poisson: f64, thickness: f64) -> Self {
        Self {
            young,
            poisson,
            thickness,
        }
    }

    /// Create a standard structural steel in MPa / mm units
    pub fn steel(thickness: f64) -> Self {
        Self::new(210_000.0, 0.3, thickness)
    }

    /// Create an aluminum (6061-T6) in MPa / mm units
    pub fn aluminum(thickness: f64) -> Self {
        Self::new(68_900.0, 0.33, thickness)
    }

    /// Check the properties needed to integrate a stiffness matrix.
    ///
    /// `element` is only used to label the error.
    pub fn validate(&self, element: usize) -> FEMResult<()> {
        if !(self.thickness > 0.0) {
            return Err(FEMError::InvalidMaterial {
                element,
                reason: format!("thickness must be positive, got {}", self.thickness),
            });
        }
        if !(self.young > 0.0) {
            return Err(FEMError::InvalidMaterial {
                element,
                reason: format!("Young's modulus must be positive, got {}", self.young),
            });
        }
        let denominator = (1.0 - 2.0 * self.poisson) * (1.0 + self.poisson);
        if denominator == 0.0 || !denominator.is_finite() {
            return Err(FEMError::InvalidMaterial {
                element,
                reason: format!(
                    "Poisson's ratio {} gives a zero constitutive denominator",
                    self.poisson
                ),
            });
        }
        Ok(())
    }

    /// Constitutive matrix relating (ex, ey, gxy) to (sx, sy, txy)
    ///
    /// D = E / ((1 - 2v)(1 + v)) * [[1 - v, v, 0], [v, 1 - v, 0], [0, 0, (1 - 2v) / 2]]
    pub fn constitutive_matrix(&self, element: usize) -> FEMResult<Mat3> {
        self.validate(element)?;

        let nu = self.poisson;
        let coef = self.young / ((1.0 - 2.0 * nu) * (1.0 + nu));

        #[rustfmt::skip]
        let d = Mat3::new(
            1.0 - nu, nu,       0.0,
            nu,       1.0 - nu, 0.0,
            0.0,      0.0,      (1.0 - 2.0 * nu) / 2.0,
        );

        Ok(d * coef)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::steel(1.0)
    }
}
