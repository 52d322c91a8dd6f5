/// Weight kept from the previous value by the waveform and polar layers.
pub const RESPONSIVE: f32 = 0.3;
/// Weight kept from the previous value by the grid; slower to react.
pub const SLUGGISH: f32 = 0.7;

/// Exponential blend of `prev` towards `input`.
#[inline]
pub fn blend(prev: f32, input: f32, prev_weight: f32) -> f32 {
    prev * prev_weight + input * (1.0 - prev_weight)
}

/// Per-index smoothed values carried from frame to frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SmoothingBuffer {
    values: Vec<f32>,
    prev_weight: f32,
}

impl SmoothingBuffer {
    pub fn new(len: usize, initial: f32, prev_weight: f32) -> Self {
        Self {
            values: vec![initial; len],
            prev_weight,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Blends `input` into slot `i` and returns the smoothed value.
    pub fn update(&mut self, i: usize, input: f32) -> f32 {
        let slot = &mut self.values[i];
        *slot = blend(*slot, input, self.prev_weight);
        *slot
    }

    /// Fresh buffer of `len` values when the length changed, so no slot
    /// carries history from a different layout.
    pub fn refit(&mut self, len: usize, initial: f32) {
        if self.values.len() != len {
            *self = Self::new(len, initial, self.prev_weight);
        }
    }
}
