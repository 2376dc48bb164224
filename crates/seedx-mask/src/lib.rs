//! Sequence masking: algorithms plus a race-free "masked at most once"
//! guard.

pub mod algo;
pub mod guard;

pub use algo::{build_masker, Masker, NoneMasker, SegMasker, TantanMasker};
pub use guard::{apply_lazy_mask, MaskGuard};
