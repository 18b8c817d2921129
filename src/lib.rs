//! Fixtures shared by the end-to-end tests under `tests/`

pub mod fixtures {
    use pyinstaller_runner_core::RecordingEnvironment;
    use std::fs::{self, File};
    use std::io::{self, Write};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use zip::write::FileOptions;
    use zip::{CompressionMethod, ZipWriter};

    /// A temporary project holding `pyproject.toml` and the given files
    pub fn project(manifest: &str, files: &[(&str, &str)]) -> io::Result<TempDir> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("pyproject.toml"), manifest)?;
        for (path, contents) in files {
            let path = dir.path().join(path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, contents)?;
        }
        Ok(dir)
    }

    /// Write a minimal pure-Python wheel for `dist_name`
    pub fn universal_wheel(dir: &Path, dist_name: &str, version: &str) -> zip::result::ZipResult<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{dist_name}-{version}-py3-none-any.whl"));
        let mut zip = ZipWriter::new(File::create(&path)?);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file(format!("{dist_name}/__init__.py"), options)?;
        zip.write_all(b"")?;
        zip.start_file(format!("{dist_name}-{version}.dist-info/METADATA"), options)?;
        zip.write_all(format!("Metadata-Version: 2.1\nName: {dist_name}\nVersion: {version}\n").as_bytes())?;
        zip.start_file(format!("{dist_name}-{version}.dist-info/WHEEL"), options)?;
        zip.write_all(b"Wheel-Version: 1.0\nRoot-Is-Purelib: true\nTag: py3-none-any\n")?;
        zip.finish()?;
        Ok(path)
    }

    /// An environment whose `pyinstaller` writes fake executables where the
    /// real tool would
    pub fn freezing_environment(path: impl Into<PathBuf>) -> RecordingEnvironment {
        RecordingEnvironment::new(path)
            .with_output("python", "3.12\n")
            .with_handler("pyinstaller", |args| {
                if args.first().map(String::as_str) == Some("--version") {
                    return Ok("6.11.1\n".to_string());
                }
                let value = |flag: &str| {
                    args.iter()
                        .position(|a| a == flag)
                        .and_then(|i| args.get(i + 1))
                        .cloned()
                        .unwrap_or_default()
                };
                let dist = PathBuf::from(value("--distpath"));
                let name = value("--name");
                if args.iter().any(|a| a == "--onefile") {
                    fs::create_dir_all(&dist)?;
                    fs::write(dist.join(&name), b"\x7fELF onefile")?;
                } else {
                    let internal = dist.join(&name).join(value("--contents-directory"));
                    fs::create_dir_all(&internal)?;
                    fs::write(dist.join(&name).join(&name), b"\x7fELF onedir")?;
                    fs::write(internal.join("base_library.zip"), b"lib")?;
                }
                Ok(format!("Building {name}\n"))
            })
    }
}
