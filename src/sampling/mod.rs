//! Random windowing and span masking applied to full-length feature arrays

pub mod mask;
pub mod window;

pub use mask::{mask_accents, mask_phonemes, MaskConfig, MASKED_PHONEME_ID};
pub use window::WindowPlan;
