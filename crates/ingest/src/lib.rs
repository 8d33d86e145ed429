pub mod convert;
pub mod document;
pub mod fetch;
pub mod filename;

pub use document::{extract_text, ExtractedDocument, ExtractionError};
pub use filename::sanitize_filename;
