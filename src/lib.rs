//! mediacover renders cover images for media-server libraries.
//!
//! Three styles are available:
//!
//! - `single_1`: a stack of three rotated cards cut from one backdrop
//! - `single_2`: the backdrop split along a diagonal against a tinted, blurred copy of itself
//! - `multi_1`: a wall of nine posters in three rotated columns
//!
//! Build a [`CoverRequest`] with decoded-ready image bytes, fonts and a [`Title`], then call
//! [`generate_cover`]. Everything runs on the calling thread (pixel loops use rayon) and the
//! result is an [`EncodedCover`] or a [`CoverError`] whose [`FailureReason`] names the failure.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod color;
pub(crate) mod compose;
pub(crate) mod effects;
pub(crate) mod geometry;
pub(crate) mod pipeline;
pub(crate) mod text;

pub use crate::foundation::core::{Rgb8, Rgba8};
pub use crate::foundation::error::{CoverError, CoverResult, FailureReason};

pub use crate::color::analyze::{ColorAnalyzer, ExtractMode, MacaronRange, is_chromatic, poster_primary_colors};
pub use crate::color::convert::{hls_to_rgb, hsv_to_rgb, rgb_to_hls, rgb_to_hsv};
pub use crate::color::palette::{
    CARD_STACK_SOFT_COLORS, ColorSource, DIAGONAL_SOFT_COLORS, HslBands, darken, hsl_lightness, hsv_distance,
    is_mid_lightness, is_mid_luminance, lighten, pad_with_fallbacks, random_hsl_color, select_suitable_color,
};

pub use crate::geometry::crop::{crop_to_aspect, crop_to_square, fit_cover, resize_exact};
pub use crate::geometry::raster::{apply_alpha_mask, path_coverage, polygon_mask, round_corners, rounded_rect_mask};
pub use crate::geometry::rotate::{rotate_expand, rotated_bounds};

pub use crate::effects::blur::{gaussian_blur, gaussian_blur_gray};
pub use crate::effects::composite::{
    PremulRgba8, alpha_composite, blend_with_color, fill_rect, fill_through_mask, over, over_straight, overlay_at,
    select_by_mask,
};
pub use crate::effects::gradient::{GradientParams, gradient_background, whiten_towards_right};
pub use crate::effects::grain::add_film_grain;
pub use crate::effects::masks::{DiagonalSplit, diagonal_shadow_mask, diagonal_split_mask};
pub use crate::effects::shadow::{DropShadow, ShadowPadding, Shadowed};

pub use crate::text::draw::{ShadowSteps, TextShadow, draw_multiline_text, draw_text};
pub use crate::text::engine::{FontAsset, TextExtent, TextRenderer};

pub use crate::compose::stage::{MultiStage, SingleStage};

pub use crate::pipeline::encode::{CoverFormat, EncodedCover, JPEG_QUALITY};
pub use crate::pipeline::generate_cover;
pub use crate::pipeline::history::{CoverHistory, HistoryRecord, HistoryUpdate};
pub use crate::pipeline::request::{CoverFonts, CoverRequest, CoverSources, Style, StyleOptions, Title};
pub use crate::pipeline::slots::{
    POSTER_SLOTS, VISUAL_ORDER, is_slot_file_name, is_source_image_name, prepare_poster_slots,
};
pub use crate::pipeline::titles::TitleMap;

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
mod test_support;
