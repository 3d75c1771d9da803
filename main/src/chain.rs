// Copyright 2023-2024, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/cargo-stylus/blob/main/licenses/COPYRIGHT.md

use crate::constants::{BLOCK_GAS_LIMIT, DEPLOYER_ADDRESS, DEPLOY_GAS_LIMIT};
use alloy_primitives::{Address, Bytes, B256, U256};
use eyre::{bail, eyre, Result};
use revm::{
    context::{BlockEnv, CfgEnv, Context, Evm, TxEnv},
    context_interface::result::{EVMError, ExecutionResult, Output},
    database::in_memory_db::CacheDB,
    database_interface::{DatabaseCommit, EmptyDB},
    handler::{instructions::EthInstructions, EthFrame, EthPrecompiles, Handler, MainnetHandler},
    interpreter::interpreter::EthInterpreter,
    primitives::TxKind,
    state::{Account, EvmState},
    Journal, JournalEntry, MainBuilder, MainContext,
};
use serde::Serialize;
use std::{collections::BTreeMap, convert::Infallible};

/// Code, storage, and nonce of a deployed account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AccountState {
    pub code: Bytes,
    pub storage: BTreeMap<B256, B256>,
    pub nonce: u64,
}

impl AccountState {
    fn from_account(account: &Account) -> Self {
        let code = account
            .info
            .code
            .as_ref()
            .map(|code| code.original_bytes())
            .unwrap_or_default();
        let storage = account
            .storage
            .iter()
            .filter(|(_, slot)| !slot.present_value.is_zero())
            .map(|(key, slot)| (word(*key), word(slot.present_value)))
            .collect();
        Self {
            code,
            storage,
            nonce: account.info.nonce,
        }
    }
}

fn word(value: U256) -> B256 {
    B256::new(value.to_be_bytes::<32>())
}

/// A chain that contract creations run against.
pub trait Chain {
    /// Runs creation code, returning the address of the new account.
    fn deploy(&mut self, init_code: &[u8]) -> Result<Address>;

    /// Makes every account touched since the last commit observable.
    fn commit(&mut self);

    fn account(&self, address: Address) -> Option<AccountState>;
}

type SimDb<'a> = &'a mut CacheDB<EmptyDB>;
type SimCtx<'a> = Context<BlockEnv, TxEnv, CfgEnv, SimDb<'a>, Journal<SimDb<'a>, JournalEntry>>;
type SimEvm<'a> = Evm<SimCtx<'a>, (), EthInstructions<EthInterpreter, SimCtx<'a>>, EthPrecompiles>;
type SimError = EVMError<Infallible>;
type SimHandler<'a> = MainnetHandler<SimEvm<'a>, SimError, EthFrame<SimEvm<'a>, SimError, EthInterpreter>>;

/// An in-memory chain backed by revm. Creations are sent from a fixed
/// deployer account at zero gas price.
#[derive(Default)]
pub struct SimChain {
    db: CacheDB<EmptyDB>,
    nonce: u64,
    pending: Vec<EvmState>,
    accounts: BTreeMap<Address, AccountState>,
}

impl SimChain {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Chain for SimChain {
    fn deploy(&mut self, init_code: &[u8]) -> Result<Address> {
        let tx = TxEnv {
            caller: DEPLOYER_ADDRESS,
            gas_limit: DEPLOY_GAS_LIMIT,
            gas_price: 0,
            kind: TxKind::Create,
            value: U256::ZERO,
            data: Bytes::copy_from_slice(init_code),
            nonce: self.nonce,
            ..Default::default()
        };
        let block = BlockEnv {
            gas_limit: BLOCK_GAS_LIMIT,
            basefee: 0,
            ..Default::default()
        };
        let mut evm = Context::mainnet()
            .with_db(&mut self.db)
            .with_tx(tx)
            .with_block(block)
            .build_mainnet();

        let mut handler = SimHandler::default();
        let outcome = handler
            .run(&mut evm)
            .map_err(|e| eyre!("creation failed: {e:?}"))?;
        drop(evm);

        // the deployer's nonce advances even when creation reverts
        self.db.commit(outcome.state.clone());
        self.nonce += 1;

        match outcome.result {
            ExecutionResult::Success {
                output: Output::Create(_, Some(address)),
                ..
            } => {
                self.pending.push(outcome.state);
                Ok(address)
            }
            ExecutionResult::Success { .. } => bail!("creation produced no account"),
            ExecutionResult::Revert { output, .. } => {
                bail!("creation reverted: 0x{}", hex::encode(output))
            }
            ExecutionResult::Halt { reason, .. } => bail!("creation halted: {reason:?}"),
        }
    }

    fn commit(&mut self) {
        for state in self.pending.drain(..) {
            for (address, account) in &state {
                if *address == DEPLOYER_ADDRESS {
                    continue;
                }
                self.accounts
                    .insert(*address, AccountState::from_account(account));
            }
        }
    }

    fn account(&self, address: Address) -> Option<AccountState> {
        self.accounts.get(&address).cloned()
    }
}
