//! Color analysis: dominant-color extraction, macaron adjustment and palette helpers.

pub(crate) mod analyze;
pub(crate) mod convert;
pub(crate) mod palette;
