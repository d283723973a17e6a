//! Nozzle contour geometry and loss models.

pub mod angles;
pub mod contour;

pub use angles::{BellAngles, BellNozzleCurves, conical_exit_angle};
pub use contour::{
    FrictionInputs, NozzleContour, NozzleShape, divergence_efficiency, skin_friction_coefficient,
};
