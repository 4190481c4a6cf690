//! Base layer stack: one layer per deposition/erosion event.

use crate::storage::{AttributeError, AttributeTable, LayerBuffer, LayerView};
use crate::types::{LayerIndex, StackIndex};

use super::delta::LayerDelta;

/// Per-event layer stacks for a set of columns.
///
/// Tracks a vertical sequence of layers for every stack (column) of a
/// grid. Each call to [`add`](EventLayers::add) records one event: material
/// is deposited on top, or eroded downward through existing layers.
/// Layers eroded to zero thickness are kept, so the layer index remains a
/// shared event timeline across all stacks.
///
/// # Examples
///
/// Create an empty stack set with 5 stacks, then deposit a layer of
/// uniform thickness.
///
/// ```
/// use strata_rs::stack::EventLayers;
///
/// let mut layers = EventLayers::new(5);
/// assert_eq!(layers.number_of_layers(), 0);
///
/// layers.add(1.5, &[]);
/// assert_eq!(layers.number_of_layers(), 1);
/// assert_eq!(layers.thickness().row(0), &[1.5, 1.5, 1.5, 1.5, 1.5]);
/// ```
///
/// Add a second layer with uneven thickness, then erode. Erosion removes
/// material from the top of each stack and cascades into older layers
/// where the top is too thin.
///
/// ```
/// use strata_rs::stack::EventLayers;
///
/// let mut layers = EventLayers::new(5);
/// layers.add(1.5, &[]);
/// layers.add(&[1.0, 2.0, 0.5, 5.0, 0.0], &[]);
///
/// layers.add(-1.0, &[]);
/// assert_eq!(layers.thickness().row(1), &[0.0, 1.0, 0.0, 4.0, 0.0]);
/// assert_eq!(layers.thickness().row(0), &[1.5, 1.5, 1.0, 1.5, 0.5]);
///
/// let surface: Vec<usize> = layers.surface_index().iter().map(|i| i.get()).collect();
/// assert_eq!(surface, [0, 1, 0, 1, 0]);
/// ```
///
/// Use attribute pairs to track properties of each layer; values are
/// uniform per event across stacks. The tracked set is fixed by the first
/// populated event.
///
/// ```
/// use strata_rs::stack::EventLayers;
///
/// let mut layers = EventLayers::new(3);
/// layers.add(1.0, &[("age", 3.0)]);
/// layers.add(2.0, &[("age", 6.0)]);
/// layers.add(&[-2.0, -1.0, 1.0], &[("age", 8.0)]);
///
/// let age = layers.attribute("age").unwrap();
/// assert_eq!(age.row(2), &[8.0, 8.0, 8.0]);
/// assert_eq!(layers.surface_values("age").unwrap(), [3.0, 6.0, 8.0]);
/// ```
#[derive(Clone, Debug)]
pub struct EventLayers {
    /// Per-layer thickness for every stack
    dz: LayerBuffer,
    /// Named per-layer properties, in lock-step with `dz`
    attrs: AttributeTable,
    /// Number of populated layers
    number_of_layers: usize,
    /// Number of stacks; fixed at construction
    number_of_stacks: usize,
}

impl EventLayers {
    /// Create empty stacks with no preallocated rows.
    ///
    /// `number_of_stacks` must be positive.
    pub fn new(number_of_stacks: usize) -> Self {
        Self::with_capacity(number_of_stacks, 0)
    }

    /// Create empty stacks with an initial row-capacity hint.
    pub fn with_capacity(number_of_stacks: usize, allocated: usize) -> Self {
        assert!(number_of_stacks > 0, "need at least one stack");
        Self {
            dz: LayerBuffer::new(number_of_stacks, allocated),
            attrs: AttributeTable::new(),
            number_of_layers: 0,
            number_of_stacks,
        }
    }

    /// Number of populated layers.
    #[inline]
    pub fn number_of_layers(&self) -> usize {
        self.number_of_layers
    }

    /// Number of stacks (columns).
    #[inline]
    pub fn number_of_stacks(&self) -> usize {
        self.number_of_stacks
    }

    /// Row capacity currently allocated.
    #[inline]
    pub fn allocated(&self) -> usize {
        self.dz.allocated()
    }

    /// Whether no layer has been populated yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.number_of_layers == 0
    }

    /// Record one deposition/erosion event.
    ///
    /// `delta` is a uniform thickness change or one change per stack;
    /// `attrs` carries per-event attribute values written into the active
    /// top layer of every stack.
    ///
    /// If any stack receives a strictly positive delta a new layer is
    /// appended and the change is applied to it; otherwise the change is
    /// applied to the current top layer, so pure-erosion events do not
    /// record empty rows. Erosion that exceeds a layer's thickness zeroes
    /// the layer and carries the remainder into the next older one; the
    /// base layer clamps at zero (eroding past the recorded base is a
    /// silent non-event).
    ///
    /// Attribute names supplied here must match the set established by the
    /// first populated event. Unknown names are reported to stderr and
    /// dropped; the event itself is still recorded.
    pub fn add<'a>(&mut self, delta: impl Into<LayerDelta<'a>>, attrs: &[(&str, f64)]) {
        let delta = delta.into();
        delta.validate(self.number_of_stacks);

        if self.number_of_layers == 0 {
            self.attrs.establish(
                attrs.iter().map(|&(name, _)| name),
                self.number_of_stacks,
                self.dz.allocated(),
            );
        }

        if delta.any_positive() {
            self.append_layer();
            deposit_or_erode(&mut self.dz, self.number_of_layers, &delta);
        } else if self.number_of_layers > 0 {
            deposit_or_erode(&mut self.dz, self.number_of_layers, &delta);
        }

        if self.number_of_layers > 0 {
            let top = self.number_of_layers - 1;
            for &(name, value) in attrs {
                if let Err(err) = self.attrs.fill_row(name, top, value) {
                    eprintln!("Warning: {err}; ignoring");
                }
            }
        }
    }

    /// Read-only view of the populated thickness rows.
    pub fn thickness(&self) -> LayerView<'_> {
        self.dz.view(self.number_of_layers)
    }

    /// Read-only view of a tracked attribute's populated rows.
    pub fn attribute(&self, name: &str) -> Result<LayerView<'_>, AttributeError> {
        self.attrs.view(name, self.number_of_layers)
    }

    /// Names of the attributes being tracked.
    pub fn tracking(&self) -> impl Iterator<Item = &str> {
        self.attrs.tracking()
    }

    /// Total thickness of each stack, summed over its layers.
    pub fn total_thickness(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.number_of_stacks];
        for layer in 0..self.number_of_layers {
            for (total, &dz) in totals.iter_mut().zip(self.dz.row(layer)) {
                *total += dz;
            }
        }
        totals
    }

    /// Index of the exposed surface layer of one stack.
    ///
    /// The greatest populated layer with strictly positive thickness,
    /// scanned from the top down; the base layer if none is positive.
    pub fn surface_index_at(&self, stack: StackIndex) -> LayerIndex {
        let c = stack.get();
        for layer in (0..self.number_of_layers).rev() {
            if self.dz.get(layer, c) > 0.0 {
                return LayerIndex::new(layer);
            }
        }
        LayerIndex::ZERO
    }

    /// Index of the exposed surface layer of every stack.
    ///
    /// Recomputed by scanning rather than maintained incrementally: a
    /// single erosion event can move the surface of arbitrary stacks.
    pub fn surface_index(&self) -> Vec<LayerIndex> {
        StackIndex::iter(self.number_of_stacks)
            .map(|stack| self.surface_index_at(stack))
            .collect()
    }

    /// Parallel variant of [`surface_index`](EventLayers::surface_index).
    #[cfg(feature = "parallel")]
    pub fn surface_index_parallel(&self) -> Vec<LayerIndex> {
        use rayon::prelude::*;

        (0..self.number_of_stacks)
            .into_par_iter()
            .map(|c| self.surface_index_at(StackIndex::new(c)))
            .collect()
    }

    /// Value of a tracked attribute at each stack's surface layer.
    ///
    /// An empty stack set reports the base-row default of zero.
    pub fn surface_values(&self, name: &str) -> Result<Vec<f64>, AttributeError> {
        let view = self.attrs.view(name, self.number_of_layers)?;
        if self.number_of_layers == 0 {
            return Ok(vec![0.0; self.number_of_stacks]);
        }
        Ok(StackIndex::iter(self.number_of_stacks)
            .map(|stack| view.get(self.surface_index_at(stack).get(), stack.get()))
            .collect())
    }

    /// Append one zero-thickness layer, growing all buffers as needed.
    fn append_layer(&mut self) {
        self.dz.ensure_capacity(self.number_of_layers + 1);
        self.attrs.ensure_capacity(self.dz.allocated());

        // Rows can be reused after a collapse; start from a clean slate.
        let row = self.number_of_layers;
        self.dz.fill_row(row, 0.0);
        self.attrs.reset_row(row);

        self.number_of_layers += 1;
    }

    /// Drop trailing layers that are zero across every stack.
    ///
    /// The base layer is never dropped: a fully eroded stack set keeps one
    /// zero-thickness base row.
    pub(crate) fn collapse_trailing_empty(&mut self) {
        if self.number_of_layers == 0 {
            return;
        }
        let highest_occupied = (0..self.number_of_layers)
            .rev()
            .find(|&layer| self.dz.row(layer).iter().any(|&v| v > 0.0));
        let needed = match highest_occupied {
            Some(layer) => layer + 1,
            None => 1,
        };
        if needed < self.number_of_layers {
            self.number_of_layers = needed;
        }
    }
}

/// Apply a thickness delta to the top layer of every stack.
///
/// Deposition adds to the target row. Erosion that drives a layer
/// negative zeroes it and carries the remainder into the next older
/// layer; layer 0 clamps at zero. No negative thickness is ever stored.
fn deposit_or_erode(dz: &mut LayerBuffer, number_of_layers: usize, delta: &LayerDelta<'_>) {
    debug_assert!(number_of_layers > 0);
    for c in 0..dz.n_stacks() {
        let amount = delta.get(c);
        if amount >= 0.0 {
            let top = number_of_layers - 1;
            dz.set(top, c, dz.get(top, c) + amount);
            continue;
        }

        let mut remainder = amount;
        let mut layer = number_of_layers;
        while remainder < 0.0 && layer > 0 {
            layer -= 1;
            let updated = dz.get(layer, c) + remainder;
            if updated < 0.0 {
                dz.set(layer, c, 0.0);
                remainder = updated;
            } else {
                dz.set(layer, c, updated);
                remainder = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "at least one stack")]
    fn test_zero_stacks_rejected() {
        EventLayers::new(0);
    }

    #[test]
    fn test_first_deposit() {
        let mut layers = EventLayers::new(5);
        layers.add(1.5, &[]);

        assert_eq!(layers.number_of_layers(), 1);
        assert_eq!(layers.thickness().row(0), &[1.5; 5]);
    }

    #[test]
    fn test_pure_erosion_does_not_append() {
        let mut layers = EventLayers::new(3);
        layers.add(2.0, &[]);
        layers.add(-0.5, &[]);
        layers.add(0.0, &[]);

        assert_eq!(layers.number_of_layers(), 1);
        assert_eq!(layers.thickness().row(0), &[1.5, 1.5, 1.5]);
    }

    #[test]
    fn test_erosion_on_empty_stacks_is_a_noop() {
        let mut layers = EventLayers::new(3);
        layers.add(-1.0, &[]);

        assert_eq!(layers.number_of_layers(), 0);
        assert!(layers.is_empty());
    }

    #[test]
    fn test_erosion_cascades_into_older_layers() {
        let mut layers = EventLayers::new(2);
        layers.add(1.0, &[]);
        layers.add(0.25, &[]);
        layers.add(-0.75, &[]);

        // Top layer exhausted, remainder taken from the base
        assert_eq!(layers.thickness().row(1), &[0.0, 0.0]);
        assert_eq!(layers.thickness().row(0), &[0.5, 0.5]);
    }

    #[test]
    fn test_erosion_clamps_at_base() {
        let mut layers = EventLayers::new(2);
        layers.add(1.0, &[]);
        layers.add(-100.0, &[]);

        assert_eq!(layers.number_of_layers(), 1);
        assert_eq!(layers.thickness().row(0), &[0.0, 0.0]);
    }

    #[test]
    fn test_mixed_delta_appends_and_erodes() {
        let mut layers = EventLayers::new(3);
        layers.add(1.0, &[]);
        layers.add(2.0, &[]);
        layers.add(&[-2.0, -1.0, 1.0], &[]);

        assert_eq!(layers.number_of_layers(), 3);
        assert_eq!(
            layers.thickness().to_vec(),
            vec![
                vec![1.0, 1.0, 1.0],
                vec![0.0, 1.0, 2.0],
                vec![0.0, 0.0, 1.0],
            ]
        );
    }

    #[test]
    fn test_surface_index_empty_is_base() {
        let layers = EventLayers::new(4);
        assert!(layers.surface_index().iter().all(|&i| i == LayerIndex::ZERO));
    }

    #[test]
    fn test_total_thickness() {
        let mut layers = EventLayers::new(2);
        layers.add(1.0, &[]);
        layers.add(&[0.5, 2.0], &[]);

        assert_eq!(layers.total_thickness(), [1.5, 3.0]);
    }

    #[test]
    fn test_attribute_tracking_fixed_by_first_event() {
        let mut layers = EventLayers::new(2);
        layers.add(1.0, &[("age", 1.0)]);
        // "porosity" was not established; the value is dropped
        layers.add(1.0, &[("age", 2.0), ("porosity", 0.3)]);

        assert!(layers.attribute("porosity").is_err());
        let age = layers.attribute("age").unwrap();
        assert_eq!(age.row(0), &[1.0, 1.0]);
        assert_eq!(age.row(1), &[2.0, 2.0]);
    }

    #[test]
    fn test_attribute_overwritten_on_reused_top_row() {
        let mut layers = EventLayers::new(2);
        layers.add(1.0, &[("age", 1.0)]);
        layers.add(-0.5, &[("age", 4.0)]);

        // Pure erosion reuses the top row; its attribute is rewritten
        assert_eq!(layers.number_of_layers(), 1);
        let age = layers.attribute("age").unwrap();
        assert_eq!(age.row(0), &[4.0, 4.0]);
    }

    #[test]
    fn test_collapse_trailing_empty_keeps_base() {
        let mut layers = EventLayers::new(2);
        layers.add(1.0, &[]);
        layers.add(1.0, &[]);
        layers.add(-5.0, &[]);

        assert_eq!(layers.number_of_layers(), 2);
        layers.collapse_trailing_empty();
        assert_eq!(layers.number_of_layers(), 1);
        layers.collapse_trailing_empty();
        assert_eq!(layers.number_of_layers(), 1);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_surface_index_parallel_matches_serial() {
        let mut layers = EventLayers::new(64);
        layers.add(1.0, &[]);
        let uneven: Vec<f64> = (0..64).map(|c| (c % 3) as f64 - 1.0).collect();
        layers.add(&uneven, &[]);

        assert_eq!(layers.surface_index(), layers.surface_index_parallel());
    }
}
