use crate::utils::error::{KantineError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub itu: ItuConfig,
    pub kua: KuaConfig,
    pub ocr: OcrConfig,
    pub query: QueryConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// Crop between OCR-detected weekday names.
    Anchors,
    /// Legacy fixed pixel offsets, OCR'd into text.
    Coordinates,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ItuConfig {
    pub title: String,
    /// Tried in order; the first one with a current-week image wins.
    pub candidates: Vec<String>,
    pub container_class: String,
    pub container_id: String,
    pub image_marker: String,
    pub weekdays: Vec<String>,
    pub mode: ExtractionMode,
    pub anchors: AnchorConfig,
    pub coordinates: CoordinateConfig,
}

impl Default for ItuConfig {
    fn default() -> Self {
        Self {
            title: "ITU".to_string(),
            candidates: vec![
                "https://billboard.itu.dk/canteen-menu".to_string(),
                "https://billboard.itu.dk/".to_string(),
            ],
            container_class: "canteen".to_string(),
            container_id: "canteen".to_string(),
            image_marker: "infoscreen".to_string(),
            weekdays: ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            mode: ExtractionMode::Anchors,
            anchors: AnchorConfig::default(),
            coordinates: CoordinateConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorConfig {
    /// Pixels added to the left of each weekday name.
    pub margin: u32,
    /// Gap between the bottom of a weekday name and the top of its crop.
    pub top_offset: u32,
    /// Footer band excluded at the bottom of the image.
    pub footer_inset: u32,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            margin: 20,
            top_offset: 10,
            footer_inset: 80,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinateConfig {
    pub xs: Vec<u32>,
    pub width: u32,
    pub height: u32,
    pub warm_dish_y: u32,
    pub veggie_dish_y: u32,
}

impl Default for CoordinateConfig {
    fn default() -> Self {
        Self {
            xs: vec![350, 670, 955, 1240, 1530],
            width: 225,
            height: 120,
            warm_dish_y: 662,
            veggie_dish_y: 788,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KuaConfig {
    pub url: String,
    pub block_class: String,
    pub weekdays: Vec<String>,
    pub disclaimer_marker: String,
    pub brand_prefix: String,
    pub community_kitchen_prefix: String,
    pub community_kitchen_title: String,
}

impl Default for KuaConfig {
    fn default() -> Self {
        Self {
            url: "https://www.foodandco.dk/besog-os-her/restauranter/ku/sondre-campus/"
                .to_string(),
            block_class: "ContentBlock".to_string(),
            weekdays: ["Mandag", "Tirsdag", "Onsdag", "Torsdag", "Fredag"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            disclaimer_marker: "forbehold for ændringer".to_string(),
            brand_prefix: "wicked".to_string(),
            community_kitchen_prefix: "folke".to_string(),
            community_kitchen_title: "FOLKEKØKKEN".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub command: String,
    pub language: String,
    /// Tesseract page segmentation mode.
    pub psm: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: "tesseract".to_string(),
            language: "eng".to_string(),
            psm: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Shorter day texts are treated as noise and skipped.
    pub min_text_len: usize,
    pub timeout_seconds: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            min_text_len: 3,
            timeout_seconds: 30,
        }
    }
}

impl MenuConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| KantineError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid")
        });

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        if self.itu.candidates.is_empty() {
            return Err(KantineError::MissingConfigError {
                field: "itu.candidates".to_string(),
            });
        }
        for candidate in &self.itu.candidates {
            validation::validate_url("itu.candidates", candidate)?;
        }
        validation::validate_non_empty_string("itu.image_marker", &self.itu.image_marker)?;
        if self.itu.container_class.trim().is_empty() && self.itu.container_id.trim().is_empty()
        {
            return Err(KantineError::MissingConfigError {
                field: "itu.container_class".to_string(),
            });
        }
        validation::validate_weekdays("itu.weekdays", &self.itu.weekdays)?;

        let coords = &self.itu.coordinates;
        if self.itu.mode == ExtractionMode::Coordinates {
            if coords.xs.is_empty() {
                return Err(KantineError::MissingConfigError {
                    field: "itu.coordinates.xs".to_string(),
                });
            }
            validation::validate_positive_number("itu.coordinates.width", coords.width, 1)?;
            validation::validate_positive_number("itu.coordinates.height", coords.height, 1)?;
        }

        validation::validate_url("kua.url", &self.kua.url)?;
        validation::validate_non_empty_string("kua.block_class", &self.kua.block_class)?;
        validation::validate_weekdays("kua.weekdays", &self.kua.weekdays)?;

        validation::validate_non_empty_string("ocr.command", &self.ocr.command)?;
        validation::validate_range("ocr.psm", self.ocr.psm, 0, 13)?;
        validation::validate_range("query.timeout_seconds", self.query.timeout_seconds, 1, 600)?;

        Ok(())
    }
}

impl Validate for MenuConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = MenuConfig::from_toml_str("").unwrap();

        assert_eq!(config.itu.title, "ITU");
        assert_eq!(config.itu.candidates.len(), 2);
        assert_eq!(config.itu.mode, ExtractionMode::Anchors);
        assert_eq!(config.kua.weekdays[0], "Mandag");
        assert_eq!(config.query.min_text_len, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let config = MenuConfig::from_toml_str(include_str!("../../kantine.example.toml")).unwrap();
        let defaults = MenuConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.itu.candidates, defaults.itu.candidates);
        assert_eq!(config.itu.anchors, defaults.itu.anchors);
        assert_eq!(config.itu.coordinates, defaults.itu.coordinates);
        assert_eq!(config.kua.weekdays, defaults.kua.weekdays);
        assert_eq!(config.kua.community_kitchen_title, defaults.kua.community_kitchen_title);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
[itu]
candidates = ["https://billboard.example.com/menu"]
mode = "coordinates"

[itu.anchors]
margin = 5

[kua]
url = "https://kua.example.com/"

[ocr]
language = "dan"
"#;

        let config = MenuConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.itu.candidates, vec!["https://billboard.example.com/menu"]);
        assert_eq!(config.itu.mode, ExtractionMode::Coordinates);
        assert_eq!(config.itu.anchors.margin, 5);
        assert_eq!(config.itu.anchors.footer_inset, 80);
        assert_eq!(config.itu.container_class, "canteen");
        assert_eq!(config.ocr.language, "dan");
        assert_eq!(config.ocr.command, "tesseract");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("KANTINE_TEST_KUA_URL", "https://kua.test.dk/");

        let toml_content = r#"
[kua]
url = "${KANTINE_TEST_KUA_URL}"
"#;

        let config = MenuConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.kua.url, "https://kua.test.dk/");

        std::env::remove_var("KANTINE_TEST_KUA_URL");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[kua]
url = "invalid-url"
"#;
        let config = MenuConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[itu]
weekdays = ["Monday", "Tuesday"]
"#;
        let config = MenuConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[itu]
candidates = []
"#;
        let config = MenuConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = MenuConfig::from_toml_str("[itu\ncandidates = ").unwrap_err();
        assert!(matches!(err, KantineError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[itu]\ntitle = \"ITU Canteen\"\n")
            .unwrap();

        let config = MenuConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.itu.title, "ITU Canteen");
    }
}
