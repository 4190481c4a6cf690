//! Layer stacks that keep only layers with material in them.

use crate::storage::{AttributeError, LayerView};
use crate::types::{LayerIndex, StackIndex};

use super::delta::LayerDelta;
use super::event::EventLayers;

/// Layer stacks where every trailing layer holds some material.
///
/// Behaves like [`EventLayers`], except that after a pure-erosion event
/// any trailing layers that have become zero across every stack are
/// removed, so no artificial zero-thickness event rows persist at the
/// top. The base layer always remains, even when fully eroded.
///
/// # Examples
///
/// ```
/// use strata_rs::stack::MaterialLayers;
///
/// let mut layers = MaterialLayers::new(5);
/// layers.add(1.5, &[]);
/// layers.add(&[1.0, 2.0, 0.5, 5.0, 0.0], &[]);
/// assert_eq!(layers.number_of_layers(), 2);
///
/// // Erosion removes material but here both layers keep some, so the
/// // layer count is unchanged.
/// layers.add(-1.0, &[]);
/// assert_eq!(layers.thickness().to_vec(), vec![
///     vec![1.5, 1.5, 1.0, 1.5, 0.5],
///     vec![0.0, 1.0, 0.0, 4.0, 0.0],
/// ]);
///
/// let surface: Vec<usize> = layers.surface_index().iter().map(|i| i.get()).collect();
/// assert_eq!(surface, [0, 1, 0, 1, 0]);
/// ```
///
/// Eroding the whole of the top layer collapses it away:
///
/// ```
/// use strata_rs::stack::MaterialLayers;
///
/// let mut layers = MaterialLayers::new(3);
/// layers.add(1.0, &[]);
/// layers.add(0.5, &[]);
/// layers.add(-0.5, &[]);
/// assert_eq!(layers.number_of_layers(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct MaterialLayers {
    layers: EventLayers,
}

impl MaterialLayers {
    /// Create empty stacks with no preallocated rows.
    ///
    /// `number_of_stacks` must be positive.
    pub fn new(number_of_stacks: usize) -> Self {
        Self::with_capacity(number_of_stacks, 0)
    }

    /// Create empty stacks with an initial row-capacity hint.
    pub fn with_capacity(number_of_stacks: usize, allocated: usize) -> Self {
        Self {
            layers: EventLayers::with_capacity(number_of_stacks, allocated),
        }
    }

    /// Record one deposition/erosion event.
    ///
    /// Same contract as [`EventLayers::add`]; additionally, a pure-erosion
    /// event (no stack with a strictly positive delta) is followed by
    /// removal of trailing layers left zero across every stack. A
    /// deposition event never collapses the layer it just appended.
    pub fn add<'a>(&mut self, delta: impl Into<LayerDelta<'a>>, attrs: &[(&str, f64)]) {
        let delta = delta.into();
        let erosion_only = !delta.any_positive();
        self.layers.add(delta, attrs);
        if erosion_only {
            self.layers.collapse_trailing_empty();
        }
    }

    /// Number of populated layers.
    #[inline]
    pub fn number_of_layers(&self) -> usize {
        self.layers.number_of_layers()
    }

    /// Number of stacks (columns).
    #[inline]
    pub fn number_of_stacks(&self) -> usize {
        self.layers.number_of_stacks()
    }

    /// Row capacity currently allocated.
    #[inline]
    pub fn allocated(&self) -> usize {
        self.layers.allocated()
    }

    /// Whether no layer has been populated yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Read-only view of the populated thickness rows.
    pub fn thickness(&self) -> LayerView<'_> {
        self.layers.thickness()
    }

    /// Read-only view of a tracked attribute's populated rows.
    pub fn attribute(&self, name: &str) -> Result<LayerView<'_>, AttributeError> {
        self.layers.attribute(name)
    }

    /// Names of the attributes being tracked.
    pub fn tracking(&self) -> impl Iterator<Item = &str> {
        self.layers.tracking()
    }

    /// Total thickness of each stack, summed over its layers.
    pub fn total_thickness(&self) -> Vec<f64> {
        self.layers.total_thickness()
    }

    /// Index of the exposed surface layer of one stack.
    pub fn surface_index_at(&self, stack: StackIndex) -> LayerIndex {
        self.layers.surface_index_at(stack)
    }

    /// Index of the exposed surface layer of every stack.
    pub fn surface_index(&self) -> Vec<LayerIndex> {
        self.layers.surface_index()
    }

    /// Parallel variant of [`surface_index`](MaterialLayers::surface_index).
    #[cfg(feature = "parallel")]
    pub fn surface_index_parallel(&self) -> Vec<LayerIndex> {
        self.layers.surface_index_parallel()
    }

    /// Value of a tracked attribute at each stack's surface layer.
    pub fn surface_values(&self, name: &str) -> Result<Vec<f64>, AttributeError> {
        self.layers.surface_values(name)
    }
}
