// Copyright 2023-2024, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/cargo-stylus/blob/main/licenses/COPYRIGHT.md

use crate::{
    chain::SimChain,
    compile::{Compiler, Solc},
    config::InitData,
    constants::GENESIS_FILE_NAME,
    deploy::Deployer,
    genesis::Genesis,
    macros::*,
    registry::REGISTRY,
};
use alloy_primitives::B256;
use clap::Parser;
use create_genesis_util::color::{Color, DebugColor};
use eyre::{eyre, Result, WrapErr};
use std::{
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

mod chain;
mod compile;
mod config;
mod constants;
mod deploy;
mod encode;
mod genesis;
mod macros;
mod registry;
mod resource;

#[derive(Parser, Debug)]
#[command(name = "create-genesis")]
#[command(author = "Offchain Labs, Inc.")]
#[command(about = "Builds the genesis document of a permissioned chain", long_about = None)]
#[command(version)]
struct Opts {
    /// File of newline-separated authority addresses.
    #[arg(long)]
    authorities: PathBuf,
    /// JSON document of constructor arguments, keyed by contract address.
    #[arg(long = "init_data", visible_alias = "init-data")]
    init_data: PathBuf,
    /// Directory of resource files to fingerprint.
    #[arg(long)]
    resource: Option<PathBuf>,
    /// Directory the contract sources are found in.
    #[arg(long, default_value = "contracts")]
    contracts: PathBuf,
    /// Solidity compiler to invoke.
    #[arg(long, default_value = "solc")]
    solc: PathBuf,
    /// Where to write the genesis document.
    #[arg(short, long, default_value = GENESIS_FILE_NAME)]
    output: PathBuf,
    /// Unix timestamp to use instead of the current time.
    #[arg(long)]
    timestamp: Option<u64>,
    /// Print verbose debug info.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Opts::parse();
    main_impl(args)
}

fn main_impl(args: Opts) -> Result<()> {
    let compiler = Solc::new(&args.solc, &args.contracts, args.verbose)?;
    let genesis = create_genesis(&args, compiler)?;

    mintln!(
        "wrote {} with {} accounts",
        args.output.display(),
        genesis.alloc.len()
    );
    greyln!("prevhash: {}", genesis.prevhash.debug_lavender());
    greyln!("alloc hash: {}", genesis.alloc_hash()?.debug_lavender());
    Ok(())
}

/// Runs the whole pipeline. Nothing is written unless every contract deploys.
fn create_genesis<C: Compiler>(args: &Opts, compiler: C) -> Result<Genesis> {
    macro_rules! run {
        ($expr:expr, $($msg:expr),+) => {
            $expr.wrap_err_with(|| eyre!($($msg),+))?
        };
    }
    let verbose = args.verbose;

    let authorities = run!(
        config::read_authorities(&args.authorities),
        "failed to read authorities"
    );
    let mut init = run!(InitData::load(&args.init_data), "failed to load init data");
    run!(
        init.append_authorities(&authorities),
        "failed to add authorities"
    );
    if verbose {
        greyln!("authorities: {}", authorities.debug_lavender());
        greyln!("init data: {}", serde_json::to_string_pretty(&init.to_json())?);
    }

    let fingerprint = match &args.resource {
        Some(root) => run!(
            resource::fingerprint(root),
            "failed to fingerprint {}",
            root.display()
        ),
        None => None,
    };
    let prevhash = fingerprint
        .as_ref()
        .map(|print| print.prevhash())
        .unwrap_or(B256::ZERO);

    let timestamp = match args.timestamp {
        Some(timestamp) => timestamp,
        None => SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs(),
    };

    let mut deployer = Deployer::new(compiler, SimChain::new()).verbose(verbose);
    let alloc = run!(
        deployer.deploy_all(REGISTRY, &init),
        "failed to deploy system contracts"
    );
    let genesis = Genesis::assemble(timestamp, prevhash, alloc);

    if let (Some(root), Some(print)) = (&args.resource, &fingerprint) {
        for path in &print.manifest {
            verboseln!(verbose, "resource file: {path}");
        }
        run!(print.write_manifest(root), "failed to write resource manifest");
    }
    run!(
        genesis.write(&args.output),
        "failed to write {}",
        args.output.display()
    );
    Ok(genesis)
}
