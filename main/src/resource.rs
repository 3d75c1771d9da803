// Copyright 2023-2024, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/cargo-stylus/blob/main/licenses/COPYRIGHT.md

use crate::constants::MANIFEST_FILE_NAME;
use alloy_primitives::B256;
use eyre::{Result, WrapErr};
use md5::{Digest, Md5};
use std::{fs, path::Path};
use walkdir::WalkDir;

/// Content digest of a resource directory, plus the files that went into it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fingerprint {
    pub digest: [u8; 16],
    /// Root-relative, `/`-separated paths in the order they were hashed.
    pub manifest: Vec<String>,
}

impl Fingerprint {
    /// The digest, left-padded with zeros to 32 bytes.
    pub fn prevhash(&self) -> B256 {
        B256::left_padding_from(&self.digest)
    }

    pub fn manifest_text(&self) -> String {
        self.manifest.iter().map(|path| format!("{path}\n")).collect()
    }

    pub fn write_manifest(&self, root: &Path) -> Result<()> {
        let path = root.join(MANIFEST_FILE_NAME);
        fs::write(&path, self.manifest_text())
            .wrap_err_with(|| format!("failed to write {}", path.display()))
    }
}

/// Hashes every file under `root`, including symlinks to files. Within a
/// directory, files are visited before subdirectories, each sorted by name.
/// Returns `None` when `root` is not a directory.
pub fn fingerprint(root: &Path) -> Result<Option<Fingerprint>> {
    if !root.is_dir() {
        return Ok(None);
    }

    let walk = WalkDir::new(root).sort_by(|a, b| {
        let key = |e: &walkdir::DirEntry| e.file_type().is_dir();
        key(a).cmp(&key(b)).then_with(|| a.file_name().cmp(b.file_name()))
    });

    let mut hasher = Md5::new();
    let mut manifest = vec![];
    for entry in walk {
        let entry = entry.wrap_err_with(|| format!("failed to walk {}", root.display()))?;
        // symlinked files are hashed, symlinked directories are not entered
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }
        // a previous run's manifest
        if entry.depth() == 1 && entry.file_name() == MANIFEST_FILE_NAME {
            continue;
        }

        let path = entry.path();
        let data = fs::read(path).wrap_err_with(|| format!("failed to read {}", path.display()))?;
        hasher.update(&data);

        let relative = path.strip_prefix(root)?;
        let relative: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect();
        manifest.push(relative.join("/"));
    }

    Ok(Some(Fingerprint {
        digest: hasher.finalize().into(),
        manifest,
    }))
}
