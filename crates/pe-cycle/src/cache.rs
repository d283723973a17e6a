//! Change detection for solver inputs.

/// Remembers the last applied inputs of a derived computation.
///
/// Recomputation is all-or-nothing: any field difference invalidates the
/// whole result.
#[derive(Clone, Debug)]
pub struct ParameterCache<P> {
    last: Option<P>,
}

impl<P> Default for ParameterCache<P> {
    fn default() -> Self {
        Self { last: None }
    }
}

impl<P: PartialEq + Clone> ParameterCache<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `params`, returning `true` if they differ from the last set.
    pub fn update(&mut self, params: &P) -> bool {
        if self.last.as_ref() == Some(params) {
            return false;
        }
        self.last = Some(params.clone());
        true
    }

    /// Forget the stored inputs so the next update always reports a change.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn last(&self) -> Option<&P> {
        self.last.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_changes_only() {
        let mut cache = ParameterCache::new();
        assert!(cache.update(&(1.0, 2)));
        assert!(!cache.update(&(1.0, 2)));
        assert!(cache.update(&(1.5, 2)));
        assert_eq!(cache.last(), Some(&(1.5, 2)));
    }

    #[test]
    fn invalidate_forces_recompute() {
        let mut cache = ParameterCache::new();
        cache.update(&3_u32);
        cache.invalidate();
        assert!(cache.update(&3_u32));
    }
}
