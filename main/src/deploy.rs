// Copyright 2023-2024, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/cargo-stylus/blob/main/licenses/COPYRIGHT.md

use crate::{
    chain::{AccountState, Chain},
    compile::{CompileError, Compiler},
    config::{ConfigError, InitData},
    macros::*,
    registry::ContractSpec,
};
use alloy_primitives::Address;
use create_genesis_util::color::{Color, DebugColor};
use eyre::{bail, eyre, Result, WrapErr};
use std::collections::BTreeMap;

/// Account state of every deployed contract, by genesis address.
pub type Alloc = BTreeMap<Address, AccountState>;

/// Compiles and deploys the system contracts against an injected chain.
pub struct Deployer<C, X> {
    compiler: C,
    chain: X,
    verbose: bool,
}

impl<C: Compiler, X: Chain> Deployer<C, X> {
    pub fn new(compiler: C, chain: X) -> Self {
        Self {
            compiler,
            chain,
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Deploys each registry entry in order. Any failure aborts the whole run.
    pub fn deploy_all(&mut self, registry: &[ContractSpec], init: &InitData) -> Result<Alloc> {
        let mut alloc = Alloc::new();
        for spec in registry {
            self.deploy_contract(spec, init, &mut alloc)?;
        }
        Ok(alloc)
    }

    fn deploy_contract(&mut self, spec: &ContractSpec, init: &InitData, alloc: &mut Alloc) -> Result<()> {
        let artifact = self
            .compiler
            .compile(spec.file, spec.name)
            .wrap_err_with(|| format!("failed to compile {}", spec.name))?;
        if artifact.bytecode.is_empty() {
            bail!(CompileError::EmptyBytecode {
                name: spec.name.to_owned()
            });
        }

        let deployments = spec.deployments(&artifact.abi, init)?;
        for deployment in deployments {
            let address = deployment.address;
            if alloc.contains_key(&address) {
                bail!(ConfigError::DuplicateDeployment { address });
            }
            verboseln!(
                self.verbose,
                "deploying {} at {} with args 0x{}",
                spec.name.mint(),
                address.debug_lavender(),
                hex::encode(&deployment.args)
            );

            let mut init_code = artifact.bytecode.clone();
            init_code.extend(&deployment.args);
            let created = self
                .chain
                .deploy(&init_code)
                .wrap_err_with(|| format!("failed to deploy {} at {address}", spec.name))?;
            self.chain.commit();

            let account = self
                .chain
                .account(created)
                .ok_or_else(|| eyre!("no account state for {} at {address}", spec.name))?;
            alloc.insert(address, account);
        }
        Ok(())
    }
}
