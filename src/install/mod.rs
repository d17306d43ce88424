use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use log::{debug, info, warn};
use tar::Archive;
use zip::read::ZipArchive;

use crate::error::{Result, UpdateError};

/// Entries whose presence marks a directory as a server installation.
const INSTALL_MARKERS: [&str; 3] = ["forge.jar", "server.properties", "mods"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ArchiveKind {
    TarGz,
    Zip,
}

impl ArchiveKind {
    fn for_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            ArchiveKind::TarGz
        } else {
            ArchiveKind::Zip
        }
    }
}

/// Immediate subdirectories of `root` that look like server installations.
///
/// Heuristic only: an install whose marker files are named differently is missed.
pub fn discover_installations(root: &Path) -> Result<Vec<PathBuf>> {
    let read_failed = |e: io::Error| UpdateError::ExtractionFailed {
        path: root.to_path_buf(),
        reason: format!("failed to scan for installations: {e}"),
    };

    let mut found = Vec::new();
    for entry in fs::read_dir(root).map_err(read_failed)? {
        let entry = entry.map_err(read_failed)?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if INSTALL_MARKERS.iter().any(|marker| path.join(marker).exists()) {
            debug!("install: {} looks like a server install", path.display());
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

/// Unpack `artifact` into `target`, overwriting files with the same relative path.
///
/// Not transactional: a failure part way leaves `target` partially updated.
pub fn install(artifact: &Path, target: &Path) -> Result<()> {
    let kind = ArchiveKind::for_path(artifact);
    info!(
        "install: extracting {} as {:?} into {}",
        artifact.display(),
        kind,
        target.display()
    );
    fs::create_dir_all(target).map_err(|e| failed(target, format!("create target dir: {e}")))?;
    match kind {
        ArchiveKind::TarGz => extract_targz(artifact, target),
        ArchiveKind::Zip => extract_zip(artifact, target),
    }
}

fn extract_targz(archive_path: &Path, target: &Path) -> Result<()> {
    let file = fs::File::open(archive_path)
        .map_err(|e| failed(archive_path, format!("tar.gz open error: {e}")))?;
    let mut archive = Archive::new(GzDecoder::new(file));
    archive.set_overwrite(true);
    archive
        .unpack(target)
        .map_err(|e| failed(archive_path, format!("tar.gz extract error: {e}")))
}

fn extract_zip(archive_path: &Path, target: &Path) -> Result<()> {
    let file = fs::File::open(archive_path)
        .map_err(|e| failed(archive_path, format!("zip open error: {e}")))?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| failed(archive_path, format!("zip parse error: {e}")))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| failed(archive_path, format!("zip entry error: {e}")))?;
        let Some(relative) = entry.enclosed_name() else {
            warn!("install: skipping unsafe zip entry {}", entry.name());
            continue;
        };
        let out_path = target.join(relative);
        if entry.is_dir() {
            fs::create_dir_all(&out_path)
                .map_err(|e| failed(&out_path, format!("zip dir create error: {e}")))?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| failed(parent, format!("zip parent dir error: {e}")))?;
        }
        let mut out_file = fs::File::create(&out_path)
            .map_err(|e| failed(&out_path, format!("zip create file error: {e}")))?;
        io::copy(&mut entry, &mut out_file)
            .map_err(|e| failed(&out_path, format!("zip write error: {e}")))?;
    }
    Ok(())
}

fn failed(path: &Path, reason: String) -> UpdateError {
    UpdateError::ExtractionFailed {
        path: path.to_path_buf(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::{SimpleFileOptions, ZipWriter};

    use super::*;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let mut writer = ZipWriter::new(fs::File::create(path).unwrap());
        for (name, contents) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn discovers_only_marked_directories() {
        let root = tempfile::tempdir().unwrap();
        let server = root.path().join("server-a");
        let other = root.path().join("photos");
        fs::create_dir_all(&server).unwrap();
        fs::create_dir_all(&other).unwrap();
        fs::write(server.join("server.properties"), "motd=hi").unwrap();
        fs::write(other.join("readme.txt"), "nothing").unwrap();
        fs::write(root.path().join("server.properties"), "top level file").unwrap();

        assert_eq!(discover_installations(root.path()).unwrap(), vec![server]);
    }

    #[test]
    fn mods_directory_and_launcher_jar_are_markers() {
        let root = tempfile::tempdir().unwrap();
        let with_mods = root.path().join("a");
        let with_jar = root.path().join("b");
        fs::create_dir_all(with_mods.join("mods")).unwrap();
        fs::create_dir_all(&with_jar).unwrap();
        fs::write(with_jar.join("forge.jar"), "").unwrap();

        assert_eq!(
            discover_installations(root.path()).unwrap(),
            vec![with_mods, with_jar]
        );
    }

    #[test]
    fn missing_root_is_reported() {
        let root = tempfile::tempdir().unwrap();
        assert!(discover_installations(&root.path().join("absent")).is_err());
    }

    #[test]
    fn extracts_and_overwrites_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("Server-Files-1.0.zip");
        write_zip(
            &archive,
            &[
                ("config/server.toml", "new = true"),
                ("mods/pack.jar", "jar"),
                ("startserver.sh", "#!/bin/sh"),
            ],
        );
        let target = dir.path().join("server");
        fs::create_dir_all(target.join("config")).unwrap();
        fs::write(target.join("config/server.toml"), "new = false").unwrap();
        fs::write(target.join("world.dat"), "keep me").unwrap();

        install(&archive, &target).unwrap();

        assert_eq!(
            fs::read_to_string(target.join("config/server.toml")).unwrap(),
            "new = true"
        );
        assert_eq!(fs::read_to_string(target.join("mods/pack.jar")).unwrap(), "jar");
        assert_eq!(fs::read_to_string(target.join("world.dat")).unwrap(), "keep me");
    }

    #[test]
    fn extracts_tar_gz_and_overwrites_existing_files() {
        use flate2::Compression;
        use flate2::write::GzEncoder;

        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("Server-Files-1.0.tar.gz");
        let mut builder = tar::Builder::new(GzEncoder::new(
            fs::File::create(&archive).unwrap(),
            Compression::default(),
        ));
        for (name, contents) in [("config/server.toml", "new = true"), ("mods/pack.jar", "jar")] {
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, name, contents.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();

        let target = dir.path().join("server");
        fs::create_dir_all(target.join("config")).unwrap();
        fs::write(target.join("config/server.toml"), "new = false").unwrap();
        fs::write(target.join("world.dat"), "keep me").unwrap();

        install(&archive, &target).unwrap();

        assert_eq!(
            fs::read_to_string(target.join("config/server.toml")).unwrap(),
            "new = true"
        );
        assert_eq!(fs::read_to_string(target.join("mods/pack.jar")).unwrap(), "jar");
        assert_eq!(fs::read_to_string(target.join("world.dat")).unwrap(), "keep me");
    }

    #[test]
    fn skips_entries_escaping_the_target() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("evil.zip");
        write_zip(&archive, &[("../escape.txt", "x"), ("ok.txt", "y")]);
        let target = dir.path().join("server");

        install(&archive, &target).unwrap();

        assert!(!dir.path().join("escape.txt").exists());
        assert!(target.join("ok.txt").exists());
    }

    #[test]
    fn corrupt_archive_is_extraction_failed() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("broken.zip");
        fs::write(&archive, b"definitely not a zip").unwrap();

        let err = install(&archive, &dir.path().join("server")).unwrap_err();
        assert!(matches!(err, UpdateError::ExtractionFailed { .. }));
        assert!(err.to_string().contains("broken.zip"));
    }

    #[test]
    fn picks_archive_kind_by_extension() {
        assert_eq!(ArchiveKind::for_path(Path::new("a.tar.gz")), ArchiveKind::TarGz);
        assert_eq!(ArchiveKind::for_path(Path::new("a.TGZ")), ArchiveKind::TarGz);
        assert_eq!(ArchiveKind::for_path(Path::new("a.zip")), ArchiveKind::Zip);
    }
}
