//! Input file reading

use std::path::Path;

use tracing::debug;

use crate::error::{IngestionError, Result};

/// Read a whole input file as UTF-8 text
pub fn read_text(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestionError::read(path, e))?;
    debug!(path = %path.display(), bytes = text.len(), "Input file read");
    Ok(text)
}
