use rand::Rng;
use rand::seq::SliceRandom;

use crate::foundation::error::{CoverError, CoverResult};

/// Number of posters on the wall.
pub const POSTER_SLOTS: usize = 9;

/// Slot numbers in wall order, three columns read top to bottom. Slots 1 and 2 land in the
/// middle of the first two columns; slot 9 goes to the mostly hidden corner.
pub const VISUAL_ORDER: [usize; POSTER_SLOTS] = [3, 1, 5, 4, 2, 6, 9, 8, 7];

const SOURCE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Chooses exactly nine posters from `sources`.
///
/// Nine or more: the first nine in sorted order. Fewer: all of them, sorted, then random
/// repeats until nine. None: an input error.
pub fn prepare_poster_slots<T, R>(sources: &[T], rng: &mut R) -> CoverResult<Vec<T>>
where
    T: Clone + Ord,
    R: Rng + ?Sized,
{
    if sources.is_empty() {
        return Err(CoverError::input("no source images to fill poster slots"));
    }
    let mut sorted = sources.to_vec();
    sorted.sort();
    if sorted.len() >= POSTER_SLOTS {
        sorted.truncate(POSTER_SLOTS);
        return Ok(sorted);
    }

    let needed = POSTER_SLOTS - sorted.len();
    tracing::debug!(available = sorted.len(), needed, "padding poster slots with repeats");
    let mut slots = sorted.clone();
    for _ in 0..needed {
        if let Some(pick) = sorted.choose(rng) {
            slots.push(pick.clone());
        }
    }
    Ok(slots)
}

/// Reorders slot-ordered posters (`1..=9`) into three wall columns.
pub(crate) fn arrange_columns<T>(slots: Vec<T>) -> CoverResult<[Vec<T>; 3]> {
    if slots.len() != POSTER_SLOTS {
        return Err(CoverError::input(format!(
            "poster wall needs exactly {POSTER_SLOTS} images, got {}",
            slots.len()
        )));
    }
    let mut by_slot: Vec<Option<T>> = slots.into_iter().map(Some).collect();
    let mut visual = Vec::with_capacity(POSTER_SLOTS);
    for slot in VISUAL_ORDER {
        let poster = by_slot[slot - 1]
            .take()
            .ok_or_else(|| CoverError::input(format!("poster slot {slot} used twice")))?;
        visual.push(poster);
    }
    let mut it = visual.into_iter();
    let mut column = || it.by_ref().take(3).collect::<Vec<T>>();
    Ok([column(), column(), column()])
}

/// `1.jpg` .. `9.jpg`, case-insensitive.
pub fn is_slot_file_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    match lower.strip_suffix(".jpg") {
        Some(stem) => stem.len() == 1 && matches!(stem.as_bytes()[0], b'1'..=b'9'),
        None => false,
    }
}

/// Candidate source for slot preparation: a supported image that is not already a slot.
pub fn is_source_image_name(name: &str) -> bool {
    if is_slot_file_name(name) {
        return false;
    }
    let lower = name.to_ascii_lowercase();
    lower
        .rsplit_once('.')
        .is_some_and(|(_, ext)| SOURCE_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/slots.rs"]
mod tests;
