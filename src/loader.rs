use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::TemplateSource;
use crate::error::LoadError;
use crate::template::{self, Template};

/// Read and parse every template described by `source`, in file name order.
///
/// Fails as a whole on the first unreadable or unparsable file, and when no
/// file matches at all.
pub fn load_all(source: &TemplateSource) -> Result<Vec<Template>, LoadError> {
    let paths = discover(source)?;
    if paths.is_empty() {
        return Err(LoadError::NoTemplatesFound {
            dir: source.dir.clone(),
            prefix: source.prefix.clone(),
            extension: source.extension.clone(),
        });
    }

    let mut templates = Vec::with_capacity(paths.len());
    for path in paths {
        let data = std::fs::read(&path).map_err(|source| LoadError::FileReadFailure {
            path: path.clone(),
            source,
        })?;
        let template = template::parse(&data)
            .map_err(|source| LoadError::ParseFailure {
                path: path.clone(),
                source,
            })?
            .named(template_name(&path));

        tracing::info!(
            "loaded template {} ({} {})",
            template.name(),
            template.method(),
            template.url()
        );
        templates.push(template);
    }

    Ok(templates)
}

fn discover(source: &TemplateSource) -> Result<Vec<PathBuf>, LoadError> {
    let entries = match std::fs::read_dir(&source.dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            return Err(LoadError::FileReadFailure {
                path: source.dir.clone(),
                source: err,
            })
        }
    };

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| LoadError::FileReadFailure {
            path: source.dir.clone(),
            source: err,
        })?;
        let path = entry.path();
        if path.is_file() && matches(source, &path) {
            paths.push(path);
        }
    }
    paths.sort();

    Ok(paths)
}

fn matches(source: &TemplateSource, path: &Path) -> bool {
    let prefixed = path
        .file_name()
        .and_then(OsStr::to_str)
        .map_or(false, |name| name.starts_with(&source.prefix));

    prefixed && path.extension() == Some(OsStr::new(&source.extension))
}

fn template_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
