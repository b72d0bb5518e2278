use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::errors::ConvertResult;

/// Assembles the CSV text: one header line, one line per row, each
/// terminated by a single `\n`.
///
/// Fields are joined with commas verbatim. No quoting or escaping is
/// applied, so a field value containing a comma or newline corrupts the
/// row structure; statement field values do not contain them in practice.
pub fn render_csv(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    out.push_str(&headers.join(","));
    out.push('\n');

    for row in rows {
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Writes `content` to `path` through a temp file in the same directory,
/// renamed into place on success. A failed conversion never leaves a
/// truncated output file behind.
pub fn write_atomic(path: &Path, content: &str) -> ConvertResult<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = match dir {
        Some(dir) => NamedTempFile::new_in(dir)?,
        None => NamedTempFile::new_in(".")?,
    };

    tmp.write_all(content.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
