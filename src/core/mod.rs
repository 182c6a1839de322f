pub mod itu;
pub mod kua;
pub mod query;
pub mod region;
pub mod render;
pub mod text;
pub mod week;

pub use crate::domain::model::{DayContent, EntryContent, MenuEntry, MenuSource};
pub use crate::domain::ports::{MenuPipeline, OcrEngine, Storage};
pub use crate::utils::error::Result;
