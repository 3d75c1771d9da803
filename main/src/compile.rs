// Copyright 2023-2024, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/cargo-stylus/blob/main/licenses/COPYRIGHT.md

use crate::{constants::SOLC_INSTALL_LINK, macros::*};
use alloy_json_abi::JsonAbi;
use create_genesis_util::{color::Color, sys, text};
use eyre::{bail, eyre, Result, WrapErr};
use serde::Deserialize;
use serde_json::Value;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

/// Output of compiling one contract.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Artifact {
    /// Creation bytecode.
    pub bytecode: Vec<u8>,
    pub abi: JsonAbi,
}

/// Turns contract source into creation bytecode and an ABI.
pub trait Compiler {
    fn compile(&self, file: &str, name: &str) -> Result<Artifact>;
}

#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum CompileError {
    #[error("{binary} not found, please see {}", SOLC_INSTALL_LINK)]
    SolcMissing { binary: String },
    #[error("solc failed to compile {file}")]
    SolcFailed { file: String },
    #[error("contract {name} not found in solc output for {file}")]
    NotFound { file: String, name: String },
    #[error("contract {name} has invalid bytecode: {reason}")]
    InvalidBytecode { name: String, reason: String },
    #[error("contract {name} compiled to empty creation bytecode")]
    EmptyBytecode { name: String },
}

/// The solc command-line compiler, run from the contracts directory.
pub struct Solc {
    binary: PathBuf,
    contracts_dir: PathBuf,
    verbose: bool,
}

impl Solc {
    pub fn new(binary: impl Into<PathBuf>, contracts_dir: impl Into<PathBuf>, verbose: bool) -> Result<Self> {
        let mut binary = binary.into();
        if !sys::command_exists(&binary) {
            bail!(CompileError::SolcMissing {
                binary: binary.display().to_string()
            });
        }
        // solc runs from the contracts directory, so a path must not stay relative.
        // Bare names are still looked up on PATH.
        if binary.components().count() > 1 {
            binary = fs::canonicalize(&binary)
                .wrap_err_with(|| format!("failed to resolve {}", binary.display()))?;
        }
        let contracts_dir = contracts_dir.into();
        if !contracts_dir.is_dir() {
            bail!("contracts directory {} does not exist", contracts_dir.display());
        }
        Ok(Self {
            binary,
            contracts_dir,
            verbose,
        })
    }
}

impl Compiler for Solc {
    fn compile(&self, file: &str, name: &str) -> Result<Artifact> {
        verboseln!(self.verbose, "compiling {} from {}", name.lavender(), file);
        let output = Command::new(&self.binary)
            .current_dir(&self.contracts_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .arg("--combined-json")
            .arg("abi,bin")
            .arg(file)
            .output()
            .wrap_err("failed to run solc")?;

        if !output.status.success() {
            egreyln!("solc exited with {}", output.status.red());
            bail!(CompileError::SolcFailed {
                file: file.to_owned()
            });
        }
        parse_combined_json(&output.stdout, file, name)
    }
}

#[derive(Deserialize)]
struct CombinedJson {
    contracts: BTreeMap<String, CombinedContract>,
}

#[derive(Deserialize)]
struct CombinedContract {
    /// A JSON array, or a string holding one on older solc releases.
    abi: Value,
    bin: String,
}

/// Picks `<file>:<name>` out of `solc --combined-json abi,bin` output.
fn parse_combined_json(output: &[u8], file: &str, name: &str) -> Result<Artifact> {
    let combined: CombinedJson =
        serde_json::from_slice(output).wrap_err("failed to parse solc output")?;

    let contract = combined
        .contracts
        .into_iter()
        .find_map(|(key, contract)| {
            let (path, contract_name) = key.rsplit_once(':')?;
            let matches = contract_name == name && Path::new(path).ends_with(file);
            matches.then_some(contract)
        })
        .ok_or_else(|| CompileError::NotFound {
            file: file.to_owned(),
            name: name.to_owned(),
        })?;

    let abi: JsonAbi = match contract.abi {
        Value::String(json) => serde_json::from_str(&json),
        other => serde_json::from_value(other),
    }
    .map_err(|e| eyre!("invalid ABI for {name}: {e}"))?;

    // Unlinked library references show up as `__$...$__` placeholders.
    let bytecode = text::decode0x(&contract.bin).map_err(|e| CompileError::InvalidBytecode {
        name: name.to_owned(),
        reason: e.to_string(),
    })?;
    Ok(Artifact { bytecode, abi })
}
