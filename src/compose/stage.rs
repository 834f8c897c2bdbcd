use crate::foundation::error::{CoverError, CoverResult};

/// A named step of a composer's straight-line state machine.
pub(crate) trait Stage: Copy + std::fmt::Debug {
    fn name(self) -> &'static str;
}

/// `ColorExtract → BackgroundBuild → ForegroundBuild → Compose → TextOverlay → Encode`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SingleStage {
    ColorExtract,
    BackgroundBuild,
    ForegroundBuild,
    Compose,
    TextOverlay,
    Encode,
}

impl Stage for SingleStage {
    fn name(self) -> &'static str {
        match self {
            Self::ColorExtract => "color_extract",
            Self::BackgroundBuild => "background_build",
            Self::ForegroundBuild => "foreground_build",
            Self::Compose => "compose",
            Self::TextOverlay => "text_overlay",
            Self::Encode => "encode",
        }
    }
}

/// `ResolvePrimaryColor → BuildBackground → BuildColumns → RotateColumns → PlaceColumns →
/// DrawTitles → Encode`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MultiStage {
    ResolvePrimaryColor,
    BuildBackground,
    BuildColumns,
    RotateColumns,
    PlaceColumns,
    DrawTitles,
    Encode,
}

impl Stage for MultiStage {
    fn name(self) -> &'static str {
        match self {
            Self::ResolvePrimaryColor => "resolve_primary_color",
            Self::BuildBackground => "build_background",
            Self::BuildColumns => "build_columns",
            Self::RotateColumns => "rotate_columns",
            Self::PlaceColumns => "place_columns",
            Self::DrawTitles => "draw_titles",
            Self::Encode => "encode",
        }
    }
}

/// Runs one stage, tagging any error with the stage name.
pub(crate) fn run_stage<S: Stage, T>(stage: S, f: impl FnOnce() -> CoverResult<T>) -> CoverResult<T> {
    tracing::debug!(stage = stage.name(), "enter stage");
    f().map_err(|err| {
        tracing::debug!(stage = stage.name(), error = %err, "stage failed");
        CoverError::stage(stage.name(), err)
    })
}
