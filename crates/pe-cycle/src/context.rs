//! Immutable reference data shared by every engine solver.

use pe_components::{BellNozzleCurves, TurbomachineryCorrelations};
use std::sync::Arc;

/// Bell nozzle angle tables and turbomachinery correlations, loaded once.
#[derive(Clone, Debug, Default)]
pub struct EngineDataContext {
    pub bell_curves: Arc<BellNozzleCurves>,
    pub correlations: Arc<TurbomachineryCorrelations>,
}

impl EngineDataContext {
    pub fn new(bell_curves: BellNozzleCurves, correlations: TurbomachineryCorrelations) -> Self {
        Self {
            bell_curves: Arc::new(bell_curves),
            correlations: Arc::new(correlations),
        }
    }
}
