//! Request handling around the composers: decoding, dispatch, encoding, plus the orchestration
//! helpers (titles, poster slots, history).

pub(crate) mod encode;
pub(crate) mod history;
pub(crate) mod request;
pub(crate) mod slots;
pub(crate) mod titles;

use image::RgbaImage;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::compose::multi::{PosterWallParams, render_poster_wall};
use crate::compose::single::{CardStackParams, DiagonalParams, render_card_stack, render_diagonal};
use crate::compose::stage::{MultiStage, SingleStage, run_stage};
use crate::compose::{CoverText, opaque};
use crate::foundation::error::{CoverError, CoverResult};
use crate::pipeline::encode::{CoverFormat, EncodedCover, encode};
use crate::pipeline::request::{CoverRequest, CoverSources, Style};
use crate::pipeline::slots::POSTER_SLOTS;
use crate::text::engine::TextRenderer;

fn decode(bytes: &[u8]) -> CoverResult<RgbaImage> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// Renders and encodes one cover.
///
/// Single styles produce a JPEG, the poster wall a PNG. On failure nothing is produced and the
/// error's [`reason`](CoverError::reason) tells why.
#[tracing::instrument(skip(request), fields(style = %request.style, library = %request.library_name))]
pub fn generate_cover(request: &CoverRequest) -> CoverResult<EncodedCover> {
    request.validate()?;
    let mut rng = StdRng::seed_from_u64(request.options.seed);
    let mut renderer = TextRenderer::new();
    let text = CoverText {
        title: &request.title,
        library_name: &request.library_name,
        fonts: &request.fonts,
    };

    let result = match &request.sources {
        CoverSources::Single(bytes) => compose_single(request.style, bytes, text, request, &mut renderer, &mut rng),
        CoverSources::Posters(posters) => compose_multi(posters, text, request, &mut renderer, &mut rng),
    };
    match &result {
        Ok(cover) => tracing::info!(bytes = cover.bytes.len(), format = ?cover.format, "cover generated"),
        Err(err) => tracing::warn!(reason = %err.reason(), error = %err, "cover generation failed"),
    }
    result
}

#[tracing::instrument(level = "debug", skip_all)]
fn compose_single(
    style: Style,
    bytes: &[u8],
    text: CoverText<'_>,
    request: &CoverRequest,
    renderer: &mut TextRenderer,
    rng: &mut StdRng,
) -> CoverResult<EncodedCover> {
    let source = opaque(decode(bytes)?);
    let canvas = match style {
        Style::Single1 => {
            render_card_stack(renderer, &source, text, &CardStackParams::default(), &request.options, rng)?
        }
        Style::Single2 => {
            render_diagonal(renderer, &source, text, &DiagonalParams::default(), &request.options, rng)?
        }
        Style::Multi1 => {
            return Err(CoverError::input("poster wall needs a poster set"));
        }
    };
    run_stage(SingleStage::Encode, || encode(canvas, CoverFormat::Jpeg))
}

#[tracing::instrument(level = "debug", skip_all, fields(count = posters.len()))]
fn compose_multi(
    posters: &[Vec<u8>],
    text: CoverText<'_>,
    request: &CoverRequest,
    renderer: &mut TextRenderer,
    rng: &mut StdRng,
) -> CoverResult<EncodedCover> {
    if posters.len() != POSTER_SLOTS {
        return Err(CoverError::input(format!(
            "poster wall needs exactly {POSTER_SLOTS} images, got {}",
            posters.len()
        )));
    }
    let decoded: Vec<Option<RgbaImage>> = posters
        .iter()
        .enumerate()
        .map(|(i, bytes)| match decode(bytes) {
            Ok(img) => Some(img),
            Err(err) => {
                tracing::warn!(slot = i + 1, error = %err, "poster could not be decoded, skipping");
                None
            }
        })
        .collect();
    let canvas = render_poster_wall(
        renderer,
        &decoded,
        text,
        &PosterWallParams::default(),
        &request.options,
        rng,
    )?;
    run_stage(MultiStage::Encode, || encode(canvas, CoverFormat::Png))
}
