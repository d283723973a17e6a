//! Mixture library: loaded mixtures, looked up by title.

use crate::error::{PropellantError, PropellantResult};
use crate::mixture::BiPropellantMixture;
use std::sync::Arc;

/// Read-only collection of mixtures shared between engine solvers.
#[derive(Clone, Debug, Default)]
pub struct MixtureLibrary {
    mixtures: Vec<Arc<BiPropellantMixture>>,
}

impl MixtureLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mixture; titles must be unique.
    pub fn insert(&mut self, mixture: BiPropellantMixture) -> PropellantResult<Arc<BiPropellantMixture>> {
        if self.get(mixture.title()).is_some() {
            return Err(PropellantError::DuplicateMixture {
                title: mixture.title().to_string(),
            });
        }
        let mixture = Arc::new(mixture);
        self.mixtures.push(Arc::clone(&mixture));
        Ok(mixture)
    }

    pub fn get(&self, title: &str) -> Option<Arc<BiPropellantMixture>> {
        self.mixtures
            .iter()
            .find(|m| m.title() == title)
            .map(Arc::clone)
    }

    /// Like [`get`](Self::get) but reports a missing title as an error.
    pub fn find(&self, title: &str) -> PropellantResult<Arc<BiPropellantMixture>> {
        self.get(title).ok_or_else(|| PropellantError::UnknownMixture {
            title: title.to_string(),
        })
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.mixtures.iter().map(|m| m.title())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<BiPropellantMixture>> {
        self.mixtures.iter()
    }

    pub fn len(&self) -> usize {
        self.mixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mixtures.is_empty()
    }
}
