//! OCR through the `tesseract` command-line tool.

use crate::config::toml_config::OcrConfig;
use crate::domain::model::WordBox;
use crate::domain::ports::OcrEngine;
use crate::utils::error::{KantineError, Result};
use image::DynamicImage;
use std::process::Command;
use tempfile::NamedTempFile;

#[derive(Debug, Clone)]
pub struct TesseractCli {
    command: String,
    language: String,
    psm: u32,
}

impl TesseractCli {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            command: config.command.clone(),
            language: config.language.clone(),
            psm: config.psm,
        }
    }

    /// Runs tesseract on the image and returns its stdout.
    /// `extra` selects an output config such as `tsv`.
    fn run(&self, image: &DynamicImage, extra: &[&str]) -> Result<String> {
        let input = NamedTempFile::with_suffix(".png")?;
        image.save_with_format(input.path(), image::ImageFormat::Png)?;

        let output = Command::new(&self.command)
            .arg(input.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .arg("--psm")
            .arg(self.psm.to_string())
            .args(extra)
            .output()
            .map_err(|e| KantineError::Ocr {
                message: format!("failed to run {}: {}", self.command, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(KantineError::Ocr {
                message: format!("{} exited with {}: {}", self.command, output.status, stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl OcrEngine for TesseractCli {
    fn image_to_string(&self, image: &DynamicImage) -> Result<String> {
        self.run(image, &[])
    }

    fn image_to_words(&self, image: &DynamicImage) -> Result<Vec<WordBox>> {
        let tsv = self.run(image, &["tsv"])?;
        Ok(parse_tsv_words(&tsv))
    }
}

/// Parses tesseract TSV output into word boxes.
///
/// Columns: level, page_num, block_num, par_num, line_num, word_num,
/// left, top, width, height, conf, text. Only level 5 rows are words.
pub fn parse_tsv_words(tsv: &str) -> Vec<WordBox> {
    let mut words = Vec::new();

    for line in tsv.lines().skip(1) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 {
            continue;
        }
        if fields[0].parse::<i32>().ok() != Some(5) {
            continue;
        }

        let text = fields[11].trim();
        if text.is_empty() {
            continue;
        }

        let coords: Option<Vec<u32>> = fields[6..10].iter().map(|f| f.parse().ok()).collect();
        let Some(coords) = coords else {
            tracing::debug!("Skipping malformed TSV row: {}", line);
            continue;
        };

        words.push(WordBox {
            word: text.to_string(),
            x: coords[0],
            y: coords[1],
            width: coords[2],
            height: coords[3],
        });
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    const TSV: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
1\t1\t0\t0\t0\t0\t0\t0\t1920\t1080\t-1\t
4\t1\t1\t1\t1\t0\t170\t140\t210\t60\t-1\t
5\t1\t1\t1\t1\t1\t170\t140\t90\t60\t96.1\tWEEK
5\t1\t1\t1\t1\t2\t280\t140\t60\t60\t95.3\t38
5\t1\t2\t1\t1\t1\t350\t600\t140\t30\t91.0\tMonday
5\t1\t2\t1\t1\t2\t670\t600\t150\t30\t90.2\tTuesday
5\t1\t2\t1\t1\t3\t955\t600\t10\t30\t12.0\t
5\t1\t2\t1\t1\t4\tx\t600\t10\t30\t50.0\tbroken
";

    #[test]
    fn test_parse_tsv_words() {
        let words = parse_tsv_words(TSV);

        assert_eq!(words.len(), 4);
        assert_eq!(words[0].word, "WEEK");
        assert_eq!(
            words[2],
            WordBox {
                word: "Monday".to_string(),
                x: 350,
                y: 600,
                width: 140,
                height: 30,
            }
        );
        assert_eq!(words[3].x, 670);
    }

    #[test]
    fn test_parse_tsv_ignores_short_rows() {
        assert!(parse_tsv_words("level\ttext\n5\tMonday\n").is_empty());
        assert!(parse_tsv_words("").is_empty());
    }

    #[test]
    fn test_missing_binary_is_ocr_error() {
        let engine = TesseractCli::new(&OcrConfig {
            command: "kantine-no-such-tesseract".to_string(),
            ..OcrConfig::default()
        });
        let image = DynamicImage::ImageRgb8(image::RgbImage::new(2, 2));

        let err = engine.image_to_string(&image).unwrap_err();
        assert!(matches!(err, KantineError::Ocr { .. }));
    }
}
