use serde::Serialize;

/// Number of weekday slots in a menu (Monday..Friday).
pub const WEEKDAYS: usize = 5;

/// One day's menu as produced by a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayContent {
    /// Punctuation-normalized dish sentences, possibly empty.
    Text(String),
    /// PNG-encoded crop of the day's dish region, absent if extraction failed.
    Image(Option<Vec<u8>>),
}

impl DayContent {
    pub fn is_present(&self, min_text_len: usize) -> bool {
        match self {
            DayContent::Text(text) => text.chars().count() >= min_text_len,
            DayContent::Image(image) => image.is_some(),
        }
    }
}

/// A cafeteria's menu for the current week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSource {
    pub title: String,
    pub days: Vec<DayContent>,
    /// False for the placeholder emitted when no current-week source was found.
    pub available: bool,
}

impl MenuSource {
    pub fn text(title: impl Into<String>, days: Vec<String>) -> Self {
        Self {
            title: title.into(),
            days: days.into_iter().map(DayContent::Text).collect(),
            available: true,
        }
    }

    pub fn images(title: impl Into<String>, days: Vec<Option<Vec<u8>>>) -> Self {
        Self {
            title: title.into(),
            days: days.into_iter().map(DayContent::Image).collect(),
            available: true,
        }
    }

    /// A source whose five days are all absent.
    pub fn placeholder(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            days: vec![DayContent::Image(None); WEEKDAYS],
            available: false,
        }
    }

    pub fn day(&self, day: usize) -> Option<&DayContent> {
        self.days.get(day)
    }
}

/// A word reported by OCR together with its pixel bounding box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordBox {
    pub word: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Pixel rectangle: left, top, width, height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// Detected position of a weekday name on a billboard image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekdayAnchor {
    pub name: String,
    pub rect: PixelRect,
}

/// One alternative URL for a logical source, tried in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCandidate {
    pub url: String,
}

impl From<&str> for SourceCandidate {
    fn from(url: &str) -> Self {
        Self {
            url: url.to_string(),
        }
    }
}

/// What the facade hands to a caller for one source on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryContent {
    /// Ready-to-display text (KUA pipeline, legacy ITU coordinate mode).
    Text(String),
    /// Ready-to-send PNG bytes (ITU anchor mode).
    Image(Vec<u8>),
    /// The source has no current-week menu at all.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub title: String,
    pub content: EntryContent,
}

/// Serializable overview of a source, used by the diagnostic output.
#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub title: String,
    pub available: bool,
    pub days: Vec<DaySummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DaySummary {
    Text { text: String },
    Image { bytes: Option<usize> },
}

impl From<&MenuSource> for SourceSummary {
    fn from(source: &MenuSource) -> Self {
        Self {
            title: source.title.clone(),
            available: source.available,
            days: source
                .days
                .iter()
                .map(|day| match day {
                    DayContent::Text(text) => DaySummary::Text { text: text.clone() },
                    DayContent::Image(image) => DaySummary::Image {
                        bytes: image.as_ref().map(Vec::len),
                    },
                })
                .collect(),
        }
    }
}
