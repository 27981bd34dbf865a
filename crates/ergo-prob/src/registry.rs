//! Tag -> constructor registry for destructured distributions.
//!
//! [`Destructured`] trees carry only string tags, so rebuilding a
//! `Box<dyn Distribution>` from one needs a lookup table of builders.

use std::collections::HashMap;

use ergo_core::{ClassNode, Destructured, Distribution, Error, Result, Structured};

use crate::logistic::{LOGISTIC_TAG, Logistic};

/// Builds a distribution from its destructured form.
pub type Builder = fn(&Destructured) -> Result<Box<dyn Distribution>>;

fn build_logistic(params: &Destructured) -> Result<Box<dyn Distribution>> {
    Ok(Box::new(Logistic::structure(params)?))
}

/// Registry of distribution builders keyed by tag.
#[derive(Debug, Clone)]
pub struct StructureRegistry {
    builders: HashMap<String, Builder>,
}

impl StructureRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self { builders: HashMap::new() }
    }

    /// Registry with every distribution family of this crate.
    pub fn with_defaults() -> Self {
        let mut r = Self::new();
        r.register(LOGISTIC_TAG, build_logistic);
        r
    }

    /// Register (or replace) the builder for `tag`.
    pub fn register(&mut self, tag: impl Into<String>, builder: Builder) {
        self.builders.insert(tag.into(), builder);
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.builders.contains_key(tag)
    }

    /// Rebuild a distribution from a destructured tree.
    pub fn structure(&self, params: &Destructured) -> Result<Box<dyn Distribution>> {
        let tag = params.tag();
        let builder = self
            .builders
            .get(tag)
            .ok_or_else(|| Error::Structure(format!("no builder registered for tag '{tag}'")))?;
        tracing::debug!(
            tag,
            n_values = params.values().len(),
            n_children = params.n_children(),
            "structuring distribution"
        );
        builder(params)
    }

    /// Rebuild a distribution from a class tree and flat numeric leaves.
    pub fn unflatten(&self, classes: &ClassNode, leaves: &[f64]) -> Result<Box<dyn Distribution>> {
        self.structure(&Destructured::unflatten(classes, leaves)?)
    }
}

impl Default for StructureRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
