//! pe-propellants: tabulated combustion properties for bipropellant mixtures.
//!
//! Provides:
//! - [`CombustionState`], the interpolable combustion-state vector
//! - [`MixtureRatioTable`], one O/F ratio tabulated over chamber pressure
//! - [`BiPropellantMixture`], a set of tables ordered by O/F with envelope limits
//! - [`PropellantProperties`], per-propellant liquid properties used by pumps
//! - [`MixtureLibrary`], lookup of loaded mixtures by title
//!
//! Tables are immutable after construction. Pressures and temperatures are SI
//! internally; table text rows carry pressures in MPa and are converted on load.

pub mod error;
pub mod library;
pub mod mixture;
pub mod properties;
pub mod state;
pub mod table;

pub use error::{PropellantError, PropellantResult};
pub use library::MixtureLibrary;
pub use mixture::BiPropellantMixture;
pub use properties::PropellantProperties;
pub use state::{CombustionState, ideal_gas_cp};
pub use table::{MixtureRatioTable, parse_row};
