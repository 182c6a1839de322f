//! Menus from the KUA (Søndre Campus) content page.
//!
//! Each `ContentBlock` section holds one stand's week: a title, some front
//! matter (address, opening hours), then the weekday names each followed by
//! that day's dishes.

use crate::adapters::http::fetch_text;
use crate::config::toml_config::KuaConfig;
use crate::core::text::{ensure_period, normalize_spaces, starts_with_ignore_case};
use crate::domain::model::{MenuSource, WEEKDAYS};
use crate::domain::ports::MenuPipeline;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use scraper::{ElementRef, Html, Node, Selector};

pub struct KuaPipeline {
    client: Client,
    config: KuaConfig,
}

impl KuaPipeline {
    pub fn new(client: Client, config: KuaConfig) -> Self {
        Self { client, config }
    }

    pub async fn fetch_menus(&self) -> Result<Vec<MenuSource>> {
        let html = fetch_text(&self.client, &self.config.url).await?;
        let menus = parse_menus(&html, &self.config);
        tracing::info!("KUA: parsed {} menu blocks from {}", menus.len(), self.config.url);
        Ok(menus)
    }
}

#[async_trait]
impl MenuPipeline for KuaPipeline {
    fn name(&self) -> &str {
        "KUA"
    }

    async fn menus(&self, _today: NaiveDate) -> Vec<MenuSource> {
        match self.fetch_menus().await {
            Ok(menus) => menus,
            Err(e) => {
                tracing::warn!("KUA: {} ({})", e, e.recovery_suggestion());
                Vec::new()
            }
        }
    }
}

/// Parses every content block of the page; blocks without menu structure are skipped.
pub fn parse_menus(html: &str, config: &KuaConfig) -> Vec<MenuSource> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(&format!(".{}", config.block_class)) else {
        tracing::warn!("KUA: invalid block class '{}'", config.block_class);
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|block| {
            let lines = block_lines(&block_text(block));
            parse_block(&lines, config)
        })
        .collect()
}

/// Text content of a block. Line breaks and block-level elements start a new line.
fn block_text(block: ElementRef) -> String {
    let mut text = String::new();
    for node in block.descendants() {
        match node.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(e)
                if matches!(
                    e.name(),
                    "br" | "p" | "div" | "li" | "tr" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
                ) =>
            {
                text.push('\n')
            }
            _ => {}
        }
    }
    text
}

/// Splits block text into trimmed, non-blank lines.
pub fn block_lines(text: &str) -> Vec<String> {
    normalize_spaces(text)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

fn is_weekday(line: &str, weekdays: &[String]) -> bool {
    let token = line.trim().trim_end_matches(':').trim().to_lowercase();
    weekdays.iter().any(|day| day.to_lowercase() == token)
}

/// Turns one block's lines into a menu: title, then one entry per weekday.
pub fn parse_block(lines: &[String], config: &KuaConfig) -> Option<MenuSource> {
    if lines.len() < 5 {
        tracing::debug!("KUA: skipping block with {} lines", lines.len());
        return None;
    }

    let mut title = lines[0].clone();
    if starts_with_ignore_case(&title, &config.brand_prefix) {
        title = format!("{} {}", title, lines[1]);
    }
    if starts_with_ignore_case(&title, &config.community_kitchen_prefix) {
        title = config.community_kitchen_title.clone();
    }

    let Some(first_day) = lines.iter().position(|l| is_weekday(l, &config.weekdays)) else {
        tracing::debug!("KUA: skipping block '{}' without weekday names", title);
        return None;
    };

    let marker = config.disclaimer_marker.to_lowercase();
    let mut days = Vec::with_capacity(WEEKDAYS);
    let mut dishes: Vec<String> = Vec::new();

    for line in &lines[first_day + 1..] {
        if !marker.is_empty() && line.to_lowercase().contains(&marker) {
            break;
        }
        if is_weekday(line, &config.weekdays) {
            days.push(dishes.join(" "));
            dishes.clear();
            continue;
        }
        dishes.push(ensure_period(line));
    }
    days.push(dishes.join(" "));
    days.truncate(WEEKDAYS);

    Some(MenuSource::text(title, days))
}
