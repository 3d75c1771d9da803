// Copyright 2024, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/cargo-stylus/blob/main/licenses/COPYRIGHT.md

use eyre::Result;

/// Decodes a hex string, with or without a `0x` prefix. Every two hex
/// characters become one byte.
pub fn decode0x<T: AsRef<str>>(text: T) -> Result<Vec<u8>> {
    let text = text.as_ref().trim();
    let text = text.strip_prefix("0x").unwrap_or(text);
    Ok(hex::decode(text)?)
}

pub fn encode0x<T: AsRef<[u8]>>(data: T) -> String {
    format!("0x{}", hex::encode(data))
}
