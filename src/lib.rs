//! # strata-rs
//!
//! A layer-stack storage engine for grid-based stratigraphy models.
//!
//! Each cell of a spatial grid gets a vertical stack of layers that grows
//! as material is deposited and shrinks as it is eroded. This crate
//! provides the core building blocks:
//!
//! - Growable 2D storage with amortized-doubling reallocation
//! - Named per-layer attributes kept in lock-step with thickness
//! - The deposit-or-erode cascade (no negative thickness, base clamped)
//! - Per-stack surface tracking
//! - Event-preserving and material-only stack variants
//! - Lazy attachment of stacks to a grid
//!
//! The engine knows nothing about grid geometry; it is told how many
//! columns exist and is handed thickness deltas per event.
//!
//! # Example
//!
//! ```
//! use strata_rs::MaterialLayers;
//!
//! let mut layers = MaterialLayers::new(3);
//! layers.add(1.0, &[("age", 3.0)]);
//! layers.add(2.0, &[("age", 6.0)]);
//! layers.add(&[-2.0, -1.0, 1.0], &[("age", 8.0)]);
//!
//! assert_eq!(layers.surface_values("age").unwrap(), [3.0, 6.0, 8.0]);
//! ```

pub mod stack;
pub mod storage;
pub mod types;

// Re-export main types for convenience
pub use stack::{EventLayers, LayerDelta, LayerStack, LayersAttachment, MaterialLayers};
pub use storage::{AttributeError, AttributeTable, LayerBuffer, LayerView};
pub use types::{LayerIndex, StackIndex};
