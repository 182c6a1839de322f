// Concrete implementations for external systems: HTTP, OCR, local files.

pub mod http;
pub mod storage;
pub mod tesseract;
