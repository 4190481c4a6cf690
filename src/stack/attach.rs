//! Lazy attachment of layer stacks to a grid.
//!
//! Grids own their layer stacks but most grids never use them, so the
//! stack is constructed on first access rather than up front. The grid
//! only has to know its cell count; no inheritance or mix-in machinery
//! is involved.

use super::event::EventLayers;
use super::material::MaterialLayers;

/// Constructor seam for the layer-stack variants.
///
/// Lets [`LayersAttachment`] build whichever variant the grid asked for
/// from nothing but the column count.
pub trait LayerStack {
    /// Create empty stacks for `number_of_stacks` columns.
    fn with_stacks(number_of_stacks: usize) -> Self;
}

impl LayerStack for EventLayers {
    fn with_stacks(number_of_stacks: usize) -> Self {
        Self::new(number_of_stacks)
    }
}

impl LayerStack for MaterialLayers {
    fn with_stacks(number_of_stacks: usize) -> Self {
        Self::new(number_of_stacks)
    }
}

/// Optionally-owned layer stacks for a grid, created on first access.
///
/// # Example
///
/// ```
/// use strata_rs::stack::{LayersAttachment, MaterialLayers};
///
/// let mut attachment: LayersAttachment<MaterialLayers> = LayersAttachment::new(5);
/// assert!(!attachment.is_attached());
///
/// attachment.layers().add(1.5, &[]);
/// assert!(attachment.is_attached());
/// assert_eq!(attachment.get().unwrap().number_of_layers(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct LayersAttachment<S> {
    number_of_cells: usize,
    stack: Option<S>,
}

impl<S: LayerStack> LayersAttachment<S> {
    /// Attachment for a grid with `number_of_cells` cells; no stack is
    /// built yet.
    pub fn new(number_of_cells: usize) -> Self {
        Self {
            number_of_cells,
            stack: None,
        }
    }

    /// Number of cells the stacks will cover.
    #[inline]
    pub fn number_of_cells(&self) -> usize {
        self.number_of_cells
    }

    /// Whether the stack has been constructed.
    #[inline]
    pub fn is_attached(&self) -> bool {
        self.stack.is_some()
    }

    /// The layer stacks, constructed on first call.
    pub fn layers(&mut self) -> &mut S {
        self.stack
            .get_or_insert_with(|| S::with_stacks(self.number_of_cells))
    }

    /// The layer stacks, if already constructed.
    pub fn get(&self) -> Option<&S> {
        self.stack.as_ref()
    }
}
