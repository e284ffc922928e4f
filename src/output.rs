use std::{io::Write, path::Path};

use tracing::info;

use crate::error::ReportError;

/// Writes the rendered report to `path` if given, otherwise to `writer`.
///
/// An existing file at `path` is overwritten.
pub fn write_report<W: Write>(
    markdown: &str,
    path: Option<&Path>,
    writer: &mut W,
) -> Result<(), ReportError> {
    match path {
        Some(path) => {
            std::fs::write(path, markdown).map_err(|source| ReportError::FileWrite {
                path: path.to_path_buf(),
                source,
            })?;
            info!("Output written to {}", path.display());
        }
        None => {
            writer
                .write_all(markdown.as_bytes())
                .and_then(|()| writer.flush())
                .map_err(ReportError::Stdout)?;
        }
    }
    Ok(())
}
