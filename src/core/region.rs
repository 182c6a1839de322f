//! Cuts a billboard image into per-weekday regions.
//!
//! Anchor mode is the primary strategy: the weekday names found by OCR bound
//! each day's column, so the crops follow the layout of whatever image is
//! currently on the billboard. Coordinate mode crops fixed pixel offsets and is
//! kept for the legacy text output.

use crate::config::toml_config::AnchorConfig;
use crate::core::text::word_key;
use crate::domain::model::{PixelRect, WeekdayAnchor, WordBox};
use crate::utils::error::Result;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::collections::HashMap;
use std::io::Cursor;

/// OCR words keyed by [`word_key`]. The first occurrence of a word wins.
#[derive(Debug, Default)]
pub struct WordIndex {
    words: HashMap<String, WordBox>,
}

impl WordIndex {
    pub fn build(words: &[WordBox]) -> Self {
        let mut index = HashMap::new();
        for word in words {
            let key = word_key(&word.word);
            if key.is_empty() {
                continue;
            }
            index.entry(key).or_insert_with(|| word.clone());
        }
        Self { words: index }
    }

    pub fn get(&self, word: &str) -> Option<&WordBox> {
        self.words.get(&word_key(word))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Looks up each weekday name; days whose name was not detected are `None`.
pub fn find_anchors(index: &WordIndex, weekday_names: &[String]) -> Vec<Option<WeekdayAnchor>> {
    weekday_names
        .iter()
        .map(|name| {
            index.get(name).map(|word| WeekdayAnchor {
                name: name.clone(),
                rect: PixelRect {
                    x: word.x,
                    y: word.y,
                    width: word.width,
                    height: word.height,
                },
            })
        })
        .collect()
}

/// Crop rectangles for each anchor within an image of the given size.
///
/// A day spans from its name (minus the margin) to the next detected weekday
/// name, or to the right edge for the last one, and from just below its name
/// down to the footer band.
pub fn anchor_rects(
    image_width: u32,
    image_height: u32,
    anchors: &[Option<WeekdayAnchor>],
    config: &AnchorConfig,
) -> Vec<Option<PixelRect>> {
    let bottom = image_height.saturating_sub(config.footer_inset);

    anchors
        .iter()
        .enumerate()
        .map(|(i, anchor)| {
            let anchor = anchor.as_ref()?;
            let left = anchor.rect.x.saturating_sub(config.margin);
            let right = anchors[i + 1..]
                .iter()
                .flatten()
                .next()
                .map(|next| next.rect.x)
                .unwrap_or(image_width)
                .min(image_width);
            let top = anchor.rect.bottom() + config.top_offset;

            if right <= left || bottom <= top {
                tracing::debug!(
                    "Empty region for {} ({}..{} x {}..{})",
                    anchor.name,
                    left,
                    right,
                    top,
                    bottom
                );
                return None;
            }

            Some(PixelRect {
                x: left,
                y: top,
                width: right - left,
                height: bottom - top,
            })
        })
        .collect()
}

/// Crops one region per weekday name, `None` where the name was not found.
pub fn extract_by_anchors(
    image: &DynamicImage,
    index: &WordIndex,
    weekday_names: &[String],
    config: &AnchorConfig,
) -> Vec<Option<DynamicImage>> {
    let anchors = find_anchors(index, weekday_names);
    for (name, anchor) in weekday_names.iter().zip(&anchors) {
        if anchor.is_none() {
            tracing::warn!("Weekday anchor '{}' not found in OCR output", name);
        }
    }

    let (width, height) = image.dimensions();
    anchor_rects(width, height, &anchors, config)
        .into_iter()
        .map(|rect| rect.map(|r| image.crop_imm(r.x, r.y, r.width, r.height)))
        .collect()
}

/// Crops a `width` x `height` box at each x offset on row `y`.
/// Boxes that start outside the image are `None`; the rest are clamped.
pub fn extract_by_coordinates(
    image: &DynamicImage,
    xs: &[u32],
    y: u32,
    width: u32,
    height: u32,
) -> Vec<Option<DynamicImage>> {
    let (image_width, image_height) = image.dimensions();

    xs.iter()
        .map(|&x| {
            if x >= image_width || y >= image_height {
                return None;
            }
            let w = width.min(image_width - x);
            let h = height.min(image_height - y);
            Some(image.crop_imm(x, y, w, h))
        })
        .collect()
}

pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    image.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
