use crate::domain::model::{MenuSource, WordBox};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use image::DynamicImage;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Text recognition over decoded images.
pub trait OcrEngine: Send + Sync {
    /// Whole-image text.
    fn image_to_string(&self, image: &DynamicImage) -> Result<String>;

    /// Every recognized word with its bounding box, in reading order.
    fn image_to_words(&self, image: &DynamicImage) -> Result<Vec<WordBox>>;
}

/// A source of weekly menus. Implementations never fail: problems degrade to
/// fewer or placeholder sources.
#[async_trait]
pub trait MenuPipeline: Send + Sync {
    fn name(&self) -> &str;

    async fn menus(&self, today: NaiveDate) -> Vec<MenuSource>;
}
