use anyhow::{anyhow, ensure, Result};
use ndarray::Array1;
use rand::Rng;

/// Window and padding decision shared by every channel of one example.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPlan {
    /// First source unit kept
    pub offset: usize,
    /// Number of source units kept
    pub length: usize,
    pub pad_pre: usize,
    pub pad_post: usize,
}

impl WindowPlan {
    /// Draws a window of `sampling_length` units over a sequence of `source_length` units.
    ///
    /// Longer sequences get a uniformly random offset in `[0, L - S]`. Shorter ones
    /// are kept whole and padded to `S`, with the split between the two ends drawn
    /// uniformly from `[0, S - L]`.
    pub fn sample<R: Rng + ?Sized>(
        source_length: usize,
        sampling_length: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let length = sampling_length.min(source_length);
        let padding_length = sampling_length - length;

        let max_offset = source_length.checked_sub(length).ok_or_else(|| {
            anyhow!("window of {length} units does not fit in {source_length} units")
        })?;
        let offset = rng.gen_range(0..=max_offset);

        let pad_pre = if padding_length > 0 {
            rng.gen_range(0..=padding_length)
        } else {
            0
        };

        Ok(Self {
            offset,
            length,
            pad_pre,
            pad_post: padding_length - pad_pre,
        })
    }

    /// Length of every channel after the plan is applied.
    pub fn output_length(&self) -> usize {
        self.pad_pre + self.length + self.pad_post
    }

    /// Slices `values` to the window and pads both ends with `T::default()`.
    pub fn apply<T: Copy + Default>(&self, values: &[T]) -> Result<Array1<T>> {
        ensure!(
            self.offset + self.length <= values.len(),
            "channel of {} units is shorter than window end {}",
            values.len(),
            self.offset + self.length
        );
        let mut output = Vec::with_capacity(self.output_length());
        output.extend(std::iter::repeat(T::default()).take(self.pad_pre));
        output.extend_from_slice(&values[self.offset..self.offset + self.length]);
        output.extend(std::iter::repeat(T::default()).take(self.pad_post));
        Ok(Array1::from_vec(output))
    }

    /// `true` on padding positions, `false` on real content.
    pub fn padded_mask(&self) -> Array1<bool> {
        let mut mask = vec![true; self.output_length()];
        mask[self.pad_pre..self.pad_pre + self.length].fill(false);
        Array1::from_vec(mask)
    }
}
