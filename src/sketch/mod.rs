//! Sketch preparation: fill `<<KEY>>` placeholders from an environment file
//!
//! The original sketch is never modified. The processed copy is written to a
//! separate output path, so re-running with the same environment file gives
//! the same result.

pub mod env;
pub mod template;

pub use env::EnvMap;
pub use template::{placeholders, substitute, PlaceholderStats};

use crate::config::ProjectLayout;
use crate::error::{Error, FileKind, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Result of a successful apply run
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub output_path: PathBuf,
    pub stats: PlaceholderStats,
}

/// Check that both inputs exist and the output does not alias the sketch.
/// Nothing is read or written before this passes.
pub fn check_layout(layout: &ProjectLayout) -> Result<()> {
    if !layout.env_path.is_file() {
        return Err(Error::MissingFile {
            kind: FileKind::Env,
            path: layout.env_path.clone(),
        });
    }
    if !layout.sketch_path.is_file() {
        return Err(Error::MissingFile {
            kind: FileKind::Sketch,
            path: layout.sketch_path.clone(),
        });
    }

    let same_path = match (
        fs::canonicalize(&layout.sketch_path),
        fs::canonicalize(&layout.output_path),
    ) {
        (Ok(sketch), Ok(output)) => sketch == output,
        _ => layout.sketch_path == layout.output_path,
    };
    if same_path {
        return Err(Error::OutputIsSource {
            path: layout.output_path.clone(),
        });
    }

    Ok(())
}

/// Write the processed sketch for `layout`
pub fn apply(layout: &ProjectLayout) -> Result<Applied> {
    check_layout(layout)?;

    let env = EnvMap::load(&layout.env_path)?;
    log::debug!("Loaded {} env entries from {}", env.len(), layout.env_path.display());

    let content = fs::read_to_string(&layout.sketch_path).map_err(|source| Error::Io {
        path: layout.sketch_path.clone(),
        source,
    })?;

    let stats = PlaceholderStats::count(&content, &env);
    let processed = substitute(&content, &env);

    write_replacing(&layout.output_path, processed.as_bytes())?;
    log::info!(
        "Wrote {} ({} resolved, {} unresolved placeholders)",
        layout.output_path.display(),
        stats.resolved,
        stats.unresolved
    );

    Ok(Applied {
        output_path: layout.output_path.clone(),
        stats,
    })
}

/// Write `contents` to a temporary file beside `path` and rename it over
/// `path`, so a failed write never leaves a truncated output behind
fn write_replacing(path: &Path, contents: &[u8]) -> Result<()> {
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(contents).map_err(io_err)?;
    tmp.flush().map_err(io_err)?;

    // Temp files are created 0600; keep the existing output's mode, or a
    // regular 0644 for a new one
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::metadata(path)
            .map(|m| m.permissions())
            .unwrap_or_else(|_| fs::Permissions::from_mode(0o644));
        tmp.as_file().set_permissions(perms).map_err(io_err)?;
    }

    tmp.persist(path).map_err(|e| io_err(e.error))?;

    Ok(())
}
