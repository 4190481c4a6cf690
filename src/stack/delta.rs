//! Per-operation thickness delta.

/// Thickness change for one deposition/erosion event.
///
/// Either a single value broadcast to every stack, or one value per
/// stack. Positive values deposit, negative values erode, zero is a
/// no-op for that stack.
///
/// # Example
///
/// ```
/// use strata_rs::stack::LayerDelta;
///
/// let uniform: LayerDelta = 1.5.into();
/// assert!(uniform.any_positive());
///
/// let per_stack: LayerDelta = (&[-1.0, 0.0, 2.0][..]).into();
/// assert_eq!(per_stack.get(2), 2.0);
/// ```
#[derive(Clone, Copy, Debug)]
pub enum LayerDelta<'a> {
    /// One value applied identically to every stack
    Uniform(f64),
    /// One value per stack, length must equal the number of stacks
    PerStack(&'a [f64]),
}

impl LayerDelta<'_> {
    /// The delta applied to stack c.
    #[inline]
    pub fn get(&self, c: usize) -> f64 {
        match self {
            LayerDelta::Uniform(value) => *value,
            LayerDelta::PerStack(values) => values[c],
        }
    }

    /// Whether any stack receives a strictly positive delta.
    ///
    /// Decides whether an event appends a new layer.
    pub fn any_positive(&self) -> bool {
        match self {
            LayerDelta::Uniform(value) => *value > 0.0,
            LayerDelta::PerStack(values) => values.iter().any(|&v| v > 0.0),
        }
    }

    /// Assert that a per-stack delta matches the stack count.
    ///
    /// A mismatched length is a configuration error, not a data condition.
    pub fn validate(&self, n_stacks: usize) {
        if let LayerDelta::PerStack(values) = self {
            assert!(
                values.len() == n_stacks,
                "delta length {} does not match number of stacks {}",
                values.len(),
                n_stacks
            );
        }
    }
}

impl From<f64> for LayerDelta<'_> {
    #[inline]
    fn from(value: f64) -> Self {
        LayerDelta::Uniform(value)
    }
}

impl<'a> From<&'a [f64]> for LayerDelta<'a> {
    #[inline]
    fn from(values: &'a [f64]) -> Self {
        LayerDelta::PerStack(values)
    }
}

impl<'a> From<&'a Vec<f64>> for LayerDelta<'a> {
    #[inline]
    fn from(values: &'a Vec<f64>) -> Self {
        LayerDelta::PerStack(values)
    }
}

impl<'a, const N: usize> From<&'a [f64; N]> for LayerDelta<'a> {
    #[inline]
    fn from(values: &'a [f64; N]) -> Self {
        LayerDelta::PerStack(values)
    }
}
