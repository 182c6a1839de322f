use crate::adapters::http::build_client;
use crate::adapters::tesseract::TesseractCli;
use crate::config::toml_config::MenuConfig;
use crate::core::itu::ItuPipeline;
use crate::core::kua::KuaPipeline;
use crate::domain::model::{DayContent, EntryContent, MenuEntry, MenuSource};
use crate::domain::ports::MenuPipeline;
use crate::utils::error::Result;
use chrono::NaiveDate;

/// Entry point for callers: runs the pipelines and picks out one weekday.
///
/// Built once at start-up and shared by reference; holds no per-query state.
pub struct MenuService {
    pipelines: Vec<Box<dyn MenuPipeline>>,
    min_text_len: usize,
}

impl MenuService {
    pub fn new(pipelines: Vec<Box<dyn MenuPipeline>>, min_text_len: usize) -> Self {
        Self {
            pipelines,
            min_text_len,
        }
    }

    /// KUA (text) first, then ITU (images), with tesseract as the OCR engine.
    pub fn from_config(config: &MenuConfig) -> Result<Self> {
        let client = build_client(config.query.timeout_seconds)?;
        let kua = KuaPipeline::new(client.clone(), config.kua.clone());
        let itu = ItuPipeline::new(client, config.itu.clone(), TesseractCli::new(&config.ocr));

        let pipelines: Vec<Box<dyn MenuPipeline>> = vec![Box::new(kua), Box::new(itu)];
        Ok(Self::new(pipelines, config.query.min_text_len))
    }

    /// Every source's full week, in pipeline order.
    pub async fn weekly_menus(&self, today: NaiveDate) -> Vec<MenuSource> {
        let mut sources = Vec::new();
        for pipeline in &self.pipelines {
            let menus = pipeline.menus(today).await;
            tracing::debug!("{}: {} sources", pipeline.name(), menus.len());
            sources.extend(menus);
        }
        sources
    }

    /// The menus for weekday `day` (0 = Monday); sources without content that day are left out.
    pub async fn menu_for_day(&self, day: usize, today: NaiveDate) -> Vec<MenuEntry> {
        let sources = self.weekly_menus(today).await;
        select_day(&sources, day, self.min_text_len)
    }
}

/// Picks day `day` out of each source.
///
/// Text shorter than `min_text_len` and absent images are skipped. A placeholder
/// source is kept as [`EntryContent::Unavailable`] so callers can say so.
pub fn select_day(sources: &[MenuSource], day: usize, min_text_len: usize) -> Vec<MenuEntry> {
    sources
        .iter()
        .filter_map(|source| {
            if !source.available {
                return Some(MenuEntry {
                    title: source.title.clone(),
                    content: EntryContent::Unavailable,
                });
            }

            let content = source.day(day).filter(|d| d.is_present(min_text_len))?;
            let content = match content {
                DayContent::Text(text) => EntryContent::Text(text.clone()),
                DayContent::Image(image) => EntryContent::Image(image.clone()?),
            };
            Some(MenuEntry {
                title: source.title.clone(),
                content,
            })
        })
        .collect()
}
