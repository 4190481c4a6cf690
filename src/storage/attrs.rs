//! Named per-layer attribute storage.
//!
//! Each tracked attribute (age, composition, ...) gets its own
//! [`LayerBuffer`] shaped identically to the thickness buffer. The set of
//! tracked names is fixed once the first layer is populated; writes to
//! unknown names fail with [`AttributeError::Untracked`] so the caller can
//! report and move on instead of aborting a simulation loop.

use std::collections::HashMap;

use thiserror::Error;

use super::buffer::{LayerBuffer, LayerView};

/// Error type for attribute lookups and writes.
#[derive(Debug, Error)]
pub enum AttributeError {
    /// The attribute name was not established when the first layer was added
    #[error("layer attribute `{0}` is not being tracked")]
    Untracked(String),
}

/// Mapping from attribute name to a per-layer value buffer.
///
/// All buffers share the thickness buffer's row capacity and are grown in
/// lock-step with it; rows never written for an attribute hold the neutral
/// default of zero.
#[derive(Clone, Debug, Default)]
pub struct AttributeTable {
    buffers: HashMap<String, LayerBuffer>,
}

impl AttributeTable {
    /// Create an empty table tracking no attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the set of tracked names, one buffer per name.
    ///
    /// Replaces any previous (necessarily empty) establishment. Only legal
    /// while no layer is populated; the stack enforces that by calling this
    /// solely when its layer count is zero.
    pub fn establish<'a>(
        &mut self,
        names: impl IntoIterator<Item = &'a str>,
        n_stacks: usize,
        allocated: usize,
    ) {
        self.buffers = names
            .into_iter()
            .map(|name| (name.to_string(), LayerBuffer::new(n_stacks, allocated)))
            .collect();
    }

    /// Whether `name` is a tracked attribute.
    pub fn is_tracked(&self, name: &str) -> bool {
        self.buffers.contains_key(name)
    }

    /// Iterate over the tracked attribute names.
    pub fn tracking(&self) -> impl Iterator<Item = &str> {
        self.buffers.keys().map(String::as_str)
    }

    /// Broadcast one value across every stack of the given layer.
    pub fn fill_row(&mut self, name: &str, layer: usize, value: f64) -> Result<(), AttributeError> {
        let buffer = self
            .buffers
            .get_mut(name)
            .ok_or_else(|| AttributeError::Untracked(name.to_string()))?;
        buffer.fill_row(layer, value);
        Ok(())
    }

    /// Write one value per stack into the given layer.
    pub fn write_row(
        &mut self,
        name: &str,
        layer: usize,
        values: &[f64],
    ) -> Result<(), AttributeError> {
        let buffer = self
            .buffers
            .get_mut(name)
            .ok_or_else(|| AttributeError::Untracked(name.to_string()))?;
        buffer.write_row(layer, values);
        Ok(())
    }

    /// Zero the given layer in every tracked buffer.
    pub fn reset_row(&mut self, layer: usize) {
        for buffer in self.buffers.values_mut() {
            buffer.fill_row(layer, 0.0);
        }
    }

    /// Read-only view of the first `n_layers` rows of the named buffer.
    pub fn view(&self, name: &str, n_layers: usize) -> Result<LayerView<'_>, AttributeError> {
        self.buffers
            .get(name)
            .map(|buffer| buffer.view(n_layers))
            .ok_or_else(|| AttributeError::Untracked(name.to_string()))
    }

    /// Grow every tracked buffer to hold at least `rows` rows.
    ///
    /// Called whenever the thickness buffer grows, so capacities stay
    /// identical across all buffers.
    pub fn ensure_capacity(&mut self, rows: usize) {
        for buffer in self.buffers.values_mut() {
            buffer.ensure_capacity(rows);
        }
    }
}
