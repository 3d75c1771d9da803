// Copyright 2023-2024, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/cargo-stylus/blob/main/licenses/COPYRIGHT.md

use crate::registry::{NODE_MANAGER, NODE_MANAGER_ADDRESS};
use alloy_primitives::Address;
use create_genesis_util::text;
use serde_json::{Map, Value};
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("could not parse init data {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid address {text:?}")]
    InvalidAddress { text: String },
    #[error("init data has more than one entry for {address}")]
    DuplicateEntry { address: Address },
    #[error("missing init data for {contract} ({address})")]
    Missing { contract: String, address: Address },
    #[error("mismatch number of constructor arguments for {contract} (want {want}; got {got})")]
    Arity {
        contract: String,
        want: usize,
        got: usize,
    },
    #[error("invalid init data for {contract}: {reason}")]
    Invalid { contract: String, reason: String },
    #[error("address {address} would be deployed twice")]
    DuplicateDeployment { address: Address },
}

impl ConfigError {
    pub fn invalid(contract: impl Into<String>, reason: impl ToString) -> Self {
        Self::Invalid {
            contract: contract.into(),
            reason: reason.to_string(),
        }
    }
}

/// Raw constructor configuration, keyed by contract address.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InitData(BTreeMap<Address, Value>);

impl InitData {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: BTreeMap<String, Value> =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_entries(entries)
    }

    /// Builds init data from hex-string keys. Keys are case-insensitive.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Value)>) -> Result<Self, ConfigError> {
        let mut data = BTreeMap::new();
        for (key, value) in entries {
            let address = parse_address(&key)?;
            if data.insert(address, value).is_some() {
                return Err(ConfigError::DuplicateEntry { address });
            }
        }
        Ok(Self(data))
    }

    pub fn get(&self, address: &Address) -> Option<&Value> {
        self.0.get(address)
    }

    /// Appends each authority to the node manager's initial node list,
    /// the first of its two constructor values.
    pub fn append_authorities(&mut self, authorities: &[Address]) -> Result<(), ConfigError> {
        if authorities.is_empty() {
            return Ok(());
        }
        let entry = self
            .0
            .get_mut(&NODE_MANAGER_ADDRESS)
            .ok_or_else(|| ConfigError::Missing {
                contract: NODE_MANAGER.to_owned(),
                address: NODE_MANAGER_ADDRESS,
            })?;
        let Some(nodes) = entry
            .as_array_mut()
            .and_then(|values| values.first_mut())
            .and_then(Value::as_array_mut)
        else {
            return Err(ConfigError::invalid(
                NODE_MANAGER,
                "expected a list whose first element is the node list",
            ));
        };
        nodes.extend(
            authorities
                .iter()
                .map(|authority| Value::String(text::encode0x(authority))),
        );
        Ok(())
    }

    /// The init data as a JSON object with lowercase hex keys.
    pub fn to_json(&self) -> Value {
        let entries: Map<String, Value> = self
            .0
            .iter()
            .map(|(address, value)| (text::encode0x(address), value.clone()))
            .collect();
        Value::Object(entries)
    }
}

/// Reads a newline-separated list of authority addresses. Blank lines are skipped.
pub fn read_authorities(path: &Path) -> Result<Vec<Address>, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_address)
        .collect()
}

pub fn parse_address(text: &str) -> Result<Address, ConfigError> {
    Address::from_str(text.trim()).map_err(|_| ConfigError::InvalidAddress {
        text: text.to_owned(),
    })
}
