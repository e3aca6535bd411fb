//! Source archive inspection for upstream version autodetection
//!
//! When a template does not state its upstream version explicitly, the
//! version is read from a source archive lying next to the output, the
//! template, or in the working directory:
//! - archives named after the package and ending in `.tar.gz`, `.tgz`,
//!   `.tar.bz2` or `.zip` are candidates, newest first
//! - each candidate is extracted to a temporary directory and searched for
//!   a `PKG-INFO` metadata file, whose `Version:` header wins

use crate::error::RenderError;
use std::fs::File;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Accepted archive file suffixes
const ARCHIVE_SUFFIXES: &[&str] = &[".tar.gz", ".tgz", ".tar.bz2", ".zip"];

/// Collect candidate archives for a package in the given directories
///
/// Directories are scanned in order; within the combined result the most
/// recently modified archive comes first.
pub fn find_archives(directories: &[Option<&Path>], basename: &str) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for dir in directories.iter().flatten() {
        let Ok(entries) = std::fs::read_dir(dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.starts_with(basename)
                && ARCHIVE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
            {
                found.push(entry.path());
            }
        }
    }
    found.sort_by_key(|path| {
        std::cmp::Reverse(
            std::fs::metadata(path)
                .and_then(|metadata| metadata.modified())
                .ok(),
        )
    });
    found
}

/// Read the upstream version recorded in an archive's PKG-INFO file
///
/// Returns `Ok(None)` when the archive contains no PKG-INFO or the file
/// has no version header.
pub fn version_from_archive(archive: &Path) -> Result<Option<String>, RenderError> {
    let tempdir = tempfile::tempdir().map_err(|e| archive_error(archive, e))?;
    extract(archive, tempdir.path())?;

    let Some(pkg_info) = find_pkg_info(tempdir.path()) else {
        return Ok(None);
    };
    let content =
        std::fs::read_to_string(&pkg_info).map_err(|e| archive_error(archive, e))?;
    Ok(version_header(&content))
}

/// Extract a supported archive into the destination directory
fn extract(archive: &Path, dest: &Path) -> Result<(), RenderError> {
    let name = archive
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let file = File::open(archive).map_err(|e| archive_error(archive, e))?;

    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        tar::Archive::new(flate2::read::GzDecoder::new(file))
            .unpack(dest)
            .map_err(|e| archive_error(archive, e))
    } else if name.ends_with(".tar.bz2") {
        tar::Archive::new(bzip2::read::BzDecoder::new(file))
            .unpack(dest)
            .map_err(|e| archive_error(archive, e))
    } else if name.ends_with(".zip") {
        zip::ZipArchive::new(file)
            .and_then(|mut zip| zip.extract(dest))
            .map_err(|e| archive_error(archive, e))
    } else {
        Err(RenderError::Archive {
            path: archive.to_path_buf(),
            message: "not a supported archive format".to_string(),
        })
    }
}

fn archive_error(archive: &Path, error: impl std::fmt::Display) -> RenderError {
    RenderError::Archive {
        path: archive.to_path_buf(),
        message: error.to_string(),
    }
}

/// Find the first PKG-INFO file below the given directory
fn find_pkg_info(dir: &Path) -> Option<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .flatten()
        .find(|entry| entry.file_type().is_file() && entry.file_name() == "PKG-INFO")
        .map(|entry| entry.path().to_path_buf())
}

/// Read the Version header from PKG-INFO content
///
/// Headers end at the first blank line; the body may mention "Version:"
/// and must not be consulted.
fn version_header(content: &str) -> Option<String> {
    for line in content.lines() {
        if line.trim().is_empty() {
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            if key.eq_ignore_ascii_case("version") {
                return Some(value.trim().to_string());
            }
        }
    }
    None
}
