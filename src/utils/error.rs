use thiserror::Error;

#[derive(Error, Debug)]
pub enum KantineError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("No menu container found on {url}")]
    ContainerNotFound { url: String },

    #[error("No billboard image found on {url}")]
    NoSourceImage { url: String },

    #[error("Stale billboard image: found week {found:?}, expected week {expected}")]
    StaleWeek { found: Option<u32>, expected: u32 },

    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("OCR failed: {message}")]
    Ocr { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Source,
    Image,
    Ocr,
    Config,
    Io,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl KantineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Http(_) | Self::HttpStatus { .. } | Self::InvalidUrl(_) => ErrorCategory::Network,
            Self::ContainerNotFound { .. } | Self::NoSourceImage { .. } | Self::StaleWeek { .. } => {
                ErrorCategory::Source
            }
            Self::Image(_) => ErrorCategory::Image,
            Self::Ocr { .. } => ErrorCategory::Ocr,
            Self::Io(_) => ErrorCategory::Io,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Config,
            Self::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // Expected while the billboard still shows last week's image.
            ErrorCategory::Source => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Image => ErrorSeverity::Medium,
            ErrorCategory::Ocr | ErrorCategory::Processing | ErrorCategory::Config => {
                ErrorSeverity::High
            }
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Http(_) | Self::HttpStatus { .. } => {
                "Check the network connection and that the menu pages are online"
            }
            Self::InvalidUrl(_) => "Fix the URL in the configuration file",
            Self::ContainerNotFound { .. } | Self::NoSourceImage { .. } => {
                "The page layout may have changed; update container_class, container_id or image_marker"
            }
            Self::StaleWeek { .. } => "The billboard has not been updated yet; try again later",
            Self::Image(_) => "The source image could not be decoded; check the image URL",
            Self::Ocr { .. } => "Make sure tesseract is installed and the [ocr] command is correct",
            Self::Io(_) => "Check file permissions and free disk space",
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Review the configuration file",
            Self::ProcessingError { .. } => "Run with --verbose to see the failing step",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach a menu source ({})", self),
            ErrorCategory::Source => format!("No usable menu found ({})", self),
            ErrorCategory::Image => format!("Could not read the billboard image ({})", self),
            ErrorCategory::Ocr => format!("Text recognition failed ({})", self),
            ErrorCategory::Config => format!("Invalid configuration ({})", self),
            ErrorCategory::Io => format!("File operation failed ({})", self),
            ErrorCategory::Processing => format!("Menu processing failed ({})", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, KantineError>;
