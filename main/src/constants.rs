// Copyright 2023-2024, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/cargo-stylus/blob/main/licenses/COPYRIGHT.md

use alloy_primitives::{address, Address};

/// Gas limit of the simulated block every deployment runs in.
pub const BLOCK_GAS_LIMIT: u64 = 471_238_800;

/// Gas limit of a single contract creation. Large enough for every registered contract.
pub const DEPLOY_GAS_LIMIT: u64 = 30_000_000;

/// Account that sends the creation transactions on the simulated chain.
pub const DEPLOYER_ADDRESS: Address = address!("0000000000000000000000000000000000000bad");

/// Name of the manifest written into the resource directory.
pub const MANIFEST_FILE_NAME: &str = "file_list";

/// Default name of the genesis document.
pub const GENESIS_FILE_NAME: &str = "genesis.json";

/// Where to get solc when it is missing.
pub const SOLC_INSTALL_LINK: &str = "https://docs.soliditylang.org/en/latest/installing-solidity.html";
