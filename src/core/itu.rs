//! Menus from the ITU digital signage billboard.
//!
//! The billboard page embeds an "infoscreen" image of the week's menu. Each
//! candidate page is tried in order; the first image whose printed week number
//! matches the current ISO week is cut into per-day regions.

use crate::adapters::http::{fetch_bytes, fetch_text};
use crate::config::toml_config::{ExtractionMode, ItuConfig};
use crate::core::region::{encode_png, extract_by_anchors, extract_by_coordinates, WordIndex};
use crate::core::text::collapse_newlines;
use crate::core::week::{extract_week_number, iso_week};
use crate::domain::model::{MenuSource, SourceCandidate};
use crate::domain::ports::{MenuPipeline, OcrEngine};
use crate::utils::error::{KantineError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use image::DynamicImage;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

pub struct ItuPipeline<O: OcrEngine> {
    client: Client,
    config: ItuConfig,
    ocr: O,
}

impl<O: OcrEngine> ItuPipeline<O> {
    pub fn new(client: Client, config: ItuConfig, ocr: O) -> Self {
        Self {
            client,
            config,
            ocr,
        }
    }

    pub fn candidates(&self) -> Vec<SourceCandidate> {
        self.config
            .candidates
            .iter()
            .map(|url| SourceCandidate::from(url.as_str()))
            .collect()
    }

    /// Runs every candidate until one yields a current-week menu; otherwise a placeholder.
    pub async fn fetch_menus(&self, today: NaiveDate) -> Vec<MenuSource> {
        let expected_week = iso_week(today);

        for candidate in self.candidates() {
            tracing::info!("ITU: trying {}", candidate.url);
            match self.try_candidate(&candidate, expected_week).await {
                Ok(menus) => return menus,
                Err(e) => tracing::warn!("ITU: candidate {} failed: {}", candidate.url, e),
            }
        }

        tracing::warn!("ITU: no menu for week {} on any candidate", expected_week);
        vec![MenuSource::placeholder(&self.config.title)]
    }

    async fn try_candidate(
        &self,
        candidate: &SourceCandidate,
        expected_week: u32,
    ) -> Result<Vec<MenuSource>> {
        let html = fetch_text(&self.client, &candidate.url).await?;
        let image_urls = find_image_urls(&html, &candidate.url, &self.config)?;
        tracing::debug!("ITU: {} billboard images on {}", image_urls.len(), candidate.url);

        let mut last_error = KantineError::NoSourceImage {
            url: candidate.url.clone(),
        };
        for image_url in image_urls {
            match self.try_image(&image_url, expected_week).await {
                Ok(menus) => return Ok(menus),
                Err(e) => {
                    tracing::debug!("ITU: skipping {}: {}", image_url, e);
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }

    async fn try_image(&self, image_url: &str, expected_week: u32) -> Result<Vec<MenuSource>> {
        let bytes = fetch_bytes(&self.client, image_url).await?;
        self.process_image(&bytes, expected_week)
    }

    /// Decodes the image, checks its week number and extracts the per-day content.
    pub fn process_image(&self, bytes: &[u8], expected_week: u32) -> Result<Vec<MenuSource>> {
        let image = image::load_from_memory(bytes)?;

        let raw_text = self.ocr.image_to_string(&image)?;
        let found = extract_week_number(&raw_text);
        tracing::debug!("ITU: image shows week {:?}, expected {}", found, expected_week);
        if found != Some(expected_week) {
            return Err(KantineError::StaleWeek {
                found,
                expected: expected_week,
            });
        }

        match self.config.mode {
            ExtractionMode::Anchors => self.extract_images(&image).map(|menu| vec![menu]),
            ExtractionMode::Coordinates => Ok(self.extract_texts(&image)),
        }
    }

    fn extract_images(&self, image: &DynamicImage) -> Result<MenuSource> {
        let words = self.ocr.image_to_words(image)?;
        let index = WordIndex::build(&words);
        tracing::debug!("ITU: {} distinct words detected", index.len());

        let days = extract_by_anchors(image, &index, &self.config.weekdays, &self.config.anchors)
            .into_iter()
            .map(|crop| {
                crop.and_then(|crop| match encode_png(&crop) {
                    Ok(bytes) => Some(bytes),
                    Err(e) => {
                        tracing::warn!("ITU: failed to encode crop: {}", e);
                        None
                    }
                })
            })
            .collect();

        Ok(MenuSource::images(&self.config.title, days))
    }

    fn extract_texts(&self, image: &DynamicImage) -> Vec<MenuSource> {
        let coords = &self.config.coordinates;
        let rows = [
            ("Warm Dishes", coords.warm_dish_y),
            ("Warm Veggie", coords.veggie_dish_y),
        ];

        rows.iter()
            .map(|(label, y)| {
                let crops =
                    extract_by_coordinates(image, &coords.xs, *y, coords.width, coords.height);
                let dishes = crops
                    .into_iter()
                    .map(|crop| self.crop_text(crop))
                    .collect();
                MenuSource::text(format!("{} - {}", self.config.title, label), dishes)
            })
            .collect()
    }

    fn crop_text(&self, crop: Option<DynamicImage>) -> String {
        let Some(crop) = crop else {
            return String::new();
        };
        match self.ocr.image_to_string(&crop) {
            Ok(text) => collapse_newlines(&text),
            Err(e) => {
                tracing::warn!("ITU: OCR failed for dish region: {}", e);
                String::new()
            }
        }
    }
}

#[async_trait]
impl<O: OcrEngine> MenuPipeline for ItuPipeline<O> {
    fn name(&self) -> &str {
        "ITU"
    }

    async fn menus(&self, today: NaiveDate) -> Vec<MenuSource> {
        self.fetch_menus(today).await
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    Selector::parse(selector).ok()
}

/// Absolute URLs of the billboard images in the menu container, in page order.
///
/// The container is looked up by class first, then by id. Images whose URL
/// does not contain the marker (decorations, logos) are ignored.
pub fn find_image_urls(html: &str, page_url: &str, config: &ItuConfig) -> Result<Vec<String>> {
    let base = Url::parse(page_url)?;
    let document = Html::parse_document(html);

    let container = [
        format!(".{}", config.container_class),
        format!("#{}", config.container_id),
    ]
    .iter()
    .filter_map(|s| parse_selector(s))
    .find_map(|selector| document.select(&selector).next())
    .ok_or_else(|| KantineError::ContainerNotFound {
        url: page_url.to_string(),
    })?;

    let Some(img) = parse_selector("img") else {
        return Ok(Vec::new());
    };
    let marker = config.image_marker.to_lowercase();

    Ok(container
        .select(&img)
        .filter_map(|el| el.value().attr("src"))
        .filter_map(|src| base.join(src.trim()).ok())
        .map(String::from)
        .filter(|url| url.to_lowercase().contains(&marker))
        .collect())
}
