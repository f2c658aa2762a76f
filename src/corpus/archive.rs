// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extraction of the vector file from downloaded archives.
//!
//! The member is copied into the cache next to the archive so that decoding
//! can stream a plain file. Extraction is idempotent and atomic: a partially
//! extracted member is never left at the destination.

use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tracing::info;

use crate::errors::{Error, Result};
use crate::fetch::{is_cached, persist};

/// Copies the first zip member whose name satisfies `select` to `dest`.
pub fn extract_zip_member<F>(archive: &Path, select: F, dest: &Path) -> Result<()>
where
    F: Fn(&str) -> bool,
{
    if is_cached(dest) {
        return Ok(());
    }

    let file = File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| zip_error(archive, e))?;

    let index = (0..zip.len())
        .find(|&i| zip.name_for_index(i).map(&select).unwrap_or(false))
        .ok_or_else(|| archive_error(archive, "no matching member"))?;

    let mut member = zip.by_index(index).map_err(|e| zip_error(archive, e))?;
    info!("Extracting {} from {}", member.name(), archive.display());
    copy_atomically(&mut member, dest)
}

/// Copies the member named `name` of a `.tar.gz` archive to `dest`.
pub fn extract_tar_gz_member(archive: &Path, name: &str, dest: &Path) -> Result<()> {
    if is_cached(dest) {
        return Ok(());
    }

    let mut tar = tar::Archive::new(GzDecoder::new(File::open(archive)?));
    for entry in tar.entries()? {
        let mut entry = entry?;
        let matches = entry
            .path()?
            .file_name()
            .map(|file_name| file_name == name)
            .unwrap_or(false);
        if matches {
            info!("Extracting {} from {}", name, archive.display());
            return copy_atomically(&mut entry, dest);
        }
    }

    Err(archive_error(archive, format!("no member named {}", name)))
}

fn copy_atomically<R: io::Read>(reader: &mut R, dest: &Path) -> Result<()> {
    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".extract-")
        .tempfile_in(parent)?;
    io::copy(reader, &mut tmp)?;
    persist(tmp, dest)
}

fn zip_error(archive: &Path, err: zip::result::ZipError) -> Error {
    match err {
        zip::result::ZipError::Io(e) => Error::Io(e),
        other => archive_error(archive, other.to_string()),
    }
}

fn archive_error(archive: &Path, message: impl Into<String>) -> Error {
    Error::Archive {
        path: archive.to_path_buf(),
        message: message.into(),
    }
}
