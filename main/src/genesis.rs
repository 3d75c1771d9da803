// Copyright 2023-2024, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/cargo-stylus/blob/main/licenses/COPYRIGHT.md

use crate::{chain::AccountState, deploy::Alloc};
use alloy_primitives::B256;
use create_genesis_util::text;
use eyre::{Result, WrapErr};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::{collections::BTreeMap, io::Write, path::Path};
use tempfile::NamedTempFile;
use tiny_keccak::{Hasher, Keccak};

/// The state a node loads at height zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Genesis {
    pub prevhash: B256,
    pub timestamp: u64,
    /// Keyed by lowercase `0x` address.
    pub alloc: BTreeMap<String, AccountState>,
}

impl Genesis {
    pub fn assemble(timestamp: u64, prevhash: B256, alloc: Alloc) -> Self {
        let alloc = alloc
            .into_iter()
            .map(|(address, account)| (text::encode0x(address), account))
            .collect();
        Self {
            prevhash,
            timestamp,
            alloc,
        }
    }

    /// Renders the document as JSON indented by four spaces.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        let mut json = vec![];
        let mut ser = Serializer::with_formatter(&mut json, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut ser)?;
        json.push(b'\n');
        Ok(json)
    }

    /// Writes the document to `path` by renaming a finished temp file over it.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)
            .wrap_err_with(|| format!("failed to create temp file in {}", dir.display()))?;
        file.write_all(&json)?;
        file.persist(path)
            .wrap_err_with(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Keccak-256 of the compact JSON of `alloc`.
    pub fn alloc_hash(&self) -> Result<B256> {
        let json = serde_json::to_vec(&self.alloc)?;
        let mut keccak = Keccak::v256();
        keccak.update(&json);
        let mut hash = [0u8; 32];
        keccak.finalize(&mut hash);
        Ok(hash.into())
    }
}
