//! Bundling frozen executables into wheels
//!
//! Executables are appended under `<name>.data/scripts/` of each universal
//! (`*-py3-none-any.whl`) wheel, after which the wheel's platform tag is
//! replaced since it now carries native code.

use crate::console::Console;
use crate::error::{Error, Result};
use crate::utils::path::to_archive_name;
use regex::Regex;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const WHEEL_METADATA: &str = "dist-info/WHEEL";
const DATA_SCRIPTS: &str = "data/scripts/";

const UNIVERSAL_WHEEL: &str = r"^.+-py3-none-any\.whl$";

/// File names of universal wheels directly under `dir`, sorted
pub fn universal_wheels(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let pattern =
        Regex::new(UNIVERSAL_WHEEL).map_err(|e| Error::ConfigError(e.to_string()))?;
    let mut wheels = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if pattern.is_match(&name) {
            wheels.push(name);
        }
    }
    wheels.sort();
    Ok(wheels)
}

/// `<name>.data/scripts/` prefix derived from the wheel's `dist-info/WHEEL`
pub fn data_scripts_prefix(wheel: &Path) -> Result<String> {
    let mut archive = ZipArchive::new(File::open(wheel)?)?;
    let mut prefix = None;
    for index in 0..archive.len() {
        let name = archive.by_index_raw(index)?.name().to_string();
        if name.contains(WHEEL_METADATA) {
            prefix = Some(name.replace(WHEEL_METADATA, DATA_SCRIPTS));
        }
    }
    prefix.ok_or_else(|| {
        Error::InvalidWheel(format!(
            "'{}' has no {WHEEL_METADATA} entry",
            wheel.display()
        ))
    })
}

/// Append a single file, or every file below a directory, to the wheel's
/// data scripts. Returns the archive names written.
pub fn append_to_data_scripts(wheel: &Path, artifact: &Path) -> Result<Vec<String>> {
    let prefix = data_scripts_prefix(wheel)?;

    let mut files: Vec<(PathBuf, String)> = Vec::new();
    if artifact.is_file() {
        let name = artifact
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        files.push((artifact.to_path_buf(), format!("{prefix}{name}")));
    } else if artifact.is_dir() {
        for entry in WalkDir::new(artifact).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::IoError(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(artifact)
                .map_err(|e| Error::InvalidWheel(e.to_string()))?;
            files.push((
                entry.path().to_path_buf(),
                format!("{prefix}{}", to_archive_name(relative)),
            ));
        }
    } else {
        return Err(Error::IoError(io::Error::new(
            io::ErrorKind::NotFound,
            format!("artifact '{}' does not exist", artifact.display()),
        )));
    }

    let handle = OpenOptions::new().read(true).write(true).open(wheel)?;
    let mut writer = ZipWriter::new_append(handle)?;
    let mut written = Vec::with_capacity(files.len());
    for (path, name) in files {
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(permissions(&path)?);
        writer.start_file(name.as_str(), options)?;
        io::copy(&mut File::open(&path)?, &mut writer)?;
        debug!("Appended {:?} as {}", path, name);
        written.push(name);
    }
    writer.finish()?;
    Ok(written)
}

#[cfg(unix)]
fn permissions(path: &Path) -> Result<u32> {
    use std::os::unix::fs::PermissionsExt;
    Ok(fs::metadata(path)?.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
fn permissions(_path: &Path) -> Result<u32> {
    Ok(0o755)
}

/// Retag every universal wheel in `dir` for `platform`.
///
/// Returns the new file names; nothing is printed when no wheel matches.
pub fn replace_platform_tag(dir: &Path, platform: &str, console: &Console) -> Result<Vec<String>> {
    let wheels = universal_wheels(dir)?;
    if wheels.is_empty() {
        return Ok(Vec::new());
    }

    console.log(&format!("Replacing platform in wheels ({platform})"));
    let mut renamed = Vec::with_capacity(wheels.len());
    for wheel in wheels {
        let Some(stem) = wheel.strip_suffix("-any.whl") else {
            continue;
        };
        let new = format!("{stem}-{platform}.whl");
        fs::rename(dir.join(&wheel), dir.join(&new))?;
        console.log(&format!("  - {new}"));
        renamed.push(new);
    }
    Ok(renamed)
}
