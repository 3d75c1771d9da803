// Copyright 2023-2024, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/cargo-stylus/blob/main/licenses/COPYRIGHT.md

//! Constructor argument encoding for the system contracts.
//!
//! Each registry entry carries a [`ConstructorArgs`] shape that decides how its raw
//! init data becomes ABI-encoded constructor arguments. The per-address permission
//! shape expands into one [`Deployment`] per configured address.

use crate::{
    config::{parse_address, ConfigError, InitData},
    registry::ContractSpec,
};
use alloy_dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier};
use alloy_json_abi::{Constructor, JsonAbi, Param};
use alloy_primitives::{Address, B256};
use create_genesis_util::text;
use serde_json::Value;
use std::collections::BTreeMap;

/// The shape of a contract's constructor configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstructorArgs {
    /// A list of exactly two values, encoded positionally.
    Pair,
    /// A single value. Absent or empty configuration encodes no arguments.
    Optional,
    /// A list of exactly three values, encoded positionally.
    Triple,
    /// A map from address to `[owner, resource, [selectors]]`, deployed once per address.
    Permissions,
    /// No constructor arguments, whatever is configured.
    None,
}

/// A single contract creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deployment {
    /// Address the created account is recorded under in genesis.
    pub address: Address,
    /// ABI-encoded constructor arguments, appended to the creation bytecode.
    pub args: Vec<u8>,
}

impl ContractSpec {
    /// Resolves the creations this contract needs. Every shape yields one creation at the
    /// contract's own address, except [`ConstructorArgs::Permissions`], which yields one per
    /// configured address with the contract's own (template) address last.
    pub fn deployments(&self, abi: &JsonAbi, init: &InitData) -> Result<Vec<Deployment>, ConfigError> {
        let constructor = abi.constructor.as_ref();
        let raw = init.get(&self.address);

        if self.args != ConstructorArgs::Permissions {
            let args = self.args.encode(self.name, constructor, raw)?;
            return Ok(vec![Deployment {
                address: self.address,
                args,
            }]);
        }

        let raw = raw.ok_or_else(|| ConfigError::Missing {
            contract: self.name.to_owned(),
            address: self.address,
        })?;
        let entries = raw.as_object().ok_or_else(|| {
            ConfigError::invalid(self.name, "expected an object mapping addresses to permissions")
        })?;

        let mut permissions = BTreeMap::new();
        for (key, payload) in entries {
            let address = parse_address(key)?;
            if permissions.insert(address, payload).is_some() {
                return Err(ConfigError::DuplicateEntry { address });
            }
        }
        let Some(template) = permissions.remove(&self.address) else {
            return Err(ConfigError::invalid(
                self.name,
                format!("no permission configured for the template address {}", self.address),
            ));
        };

        let mut deployments = Vec::with_capacity(permissions.len() + 1);
        for (address, payload) in permissions {
            let contract = format!("{} at {address}", self.name);
            let args = self.args.encode(&contract, constructor, Some(payload))?;
            deployments.push(Deployment { address, args });
        }
        let args = self.args.encode(self.name, constructor, Some(template))?;
        deployments.push(Deployment {
            address: self.address,
            args,
        });
        Ok(deployments)
    }
}

impl ConstructorArgs {
    /// Encodes one raw configuration value against the constructor. For
    /// [`ConstructorArgs::Permissions`], `raw` is a single permission payload.
    pub fn encode(
        self,
        contract: &str,
        constructor: Option<&Constructor>,
        raw: Option<&Value>,
    ) -> Result<Vec<u8>, ConfigError> {
        let want = match self {
            Self::None => return Ok(vec![]),
            Self::Optional => {
                return match raw {
                    Some(value) if !is_empty(value) => {
                        encode_values(contract, constructor, std::slice::from_ref(value))
                    }
                    _ => Ok(vec![]),
                };
            }
            Self::Permissions => {
                let raw = raw.ok_or_else(|| ConfigError::invalid(contract, "missing permission"))?;
                return encode_permission(contract, constructor, raw);
            }
            Self::Pair => 2,
            Self::Triple => 3,
        };

        let Some(raw) = raw else {
            return Err(ConfigError::invalid(contract, "no constructor arguments configured"));
        };
        if is_empty(raw) {
            return Ok(vec![]);
        }
        let values = raw.as_array().ok_or_else(|| {
            ConfigError::invalid(contract, format!("expected a list of {want} values, got {raw}"))
        })?;
        if values.len() != want {
            return Err(ConfigError::Arity {
                contract: contract.to_owned(),
                want,
                got: values.len(),
            });
        }
        encode_values(contract, constructor, values)
    }
}

/// Decodes a function selector given as hex character pairs, e.g. `"a9059cbb"`.
pub fn decode_selector(selector: &str) -> eyre::Result<Vec<u8>> {
    text::decode0x(selector)
}

fn encode_values(
    contract: &str,
    constructor: Option<&Constructor>,
    values: &[Value],
) -> Result<Vec<u8>, ConfigError> {
    let params = constructor.map(|c| c.inputs.as_slice()).unwrap_or_default();
    if params.len() != values.len() {
        return Err(ConfigError::Arity {
            contract: contract.to_owned(),
            want: params.len(),
            got: values.len(),
        });
    }
    let Some(constructor) = constructor else {
        return Ok(vec![]);
    };

    let mut arg_values = Vec::<DynSolValue>::with_capacity(values.len());
    for (param, value) in params.iter().zip(values) {
        arg_values.push(coerce_param(contract, param, value)?);
    }
    encode_input(contract, constructor, &arg_values)
}

fn encode_permission(
    contract: &str,
    constructor: Option<&Constructor>,
    raw: &Value,
) -> Result<Vec<u8>, ConfigError> {
    let values = raw.as_array().ok_or_else(|| {
        ConfigError::invalid(contract, format!("expected [owner, resource, selectors], got {raw}"))
    })?;
    if values.len() != 3 {
        return Err(ConfigError::Arity {
            contract: contract.to_owned(),
            want: 3,
            got: values.len(),
        });
    }
    let Some(constructor) = constructor.filter(|c| c.inputs.len() == 3) else {
        return Err(ConfigError::invalid(
            contract,
            "constructor must take an owner, a resource and a selector list",
        ));
    };

    let selectors = values[2].as_array().ok_or_else(|| {
        ConfigError::invalid(contract, format!("selectors must be a list, got {}", values[2]))
    })?;
    let mut decoded = Vec::with_capacity(selectors.len());
    for selector in selectors {
        let bytes = selector
            .as_str()
            .ok_or_else(|| eyre::eyre!("not a string"))
            .and_then(decode_selector)
            .map_err(|e| ConfigError::invalid(contract, format!("invalid selector {selector}: {e}")))?;
        decoded.push(bytes);
    }

    let params = &constructor.inputs;
    let selector_ty = resolve(contract, &params[2])?;
    let mut arg_values = Vec::<DynSolValue>::with_capacity(3);
    arg_values.push(coerce_param(contract, &params[0], &values[0])?);
    arg_values.push(coerce_param(contract, &params[1], &values[1])?);
    arg_values.push(
        selector_values(&selector_ty, decoded)
            .map_err(|reason| ConfigError::invalid(contract, reason))?,
    );
    encode_input(contract, constructor, &arg_values)
}

fn encode_input(
    contract: &str,
    constructor: &Constructor,
    values: &[DynSolValue],
) -> Result<Vec<u8>, ConfigError> {
    constructor
        .abi_encode_input_raw(values)
        .map_err(|e| ConfigError::invalid(contract, format!("could not encode constructor args: {e}")))
}

fn resolve(contract: &str, param: &Param) -> Result<DynSolType, ConfigError> {
    param.resolve().map_err(|e| {
        let reason = format!("could not resolve constructor arg {} {}: {e}", param.ty, param.name);
        ConfigError::invalid(contract, reason)
    })
}

fn coerce_param(contract: &str, param: &Param, value: &Value) -> Result<DynSolValue, ConfigError> {
    let ty = resolve(contract, param)?;
    coerce(&ty, value).map_err(|reason| {
        let reason = format!("could not parse constructor arg {} {}: {reason}", param.ty, param.name);
        ConfigError::invalid(contract, reason)
    })
}

/// Converts a JSON value into a Solidity value of the given type. Lists map onto
/// arrays and tuples element-wise; scalars are parsed from their text form.
fn coerce(ty: &DynSolType, value: &Value) -> Result<DynSolValue, String> {
    match (ty, value) {
        (DynSolType::Array(inner), Value::Array(items)) => items
            .iter()
            .map(|item| coerce(inner, item))
            .collect::<Result<Vec<_>, _>>()
            .map(DynSolValue::Array),
        (DynSolType::FixedArray(inner, len), Value::Array(items)) => {
            if items.len() != *len {
                return Err(format!("expected {len} values for {ty}, got {}", items.len()));
            }
            items
                .iter()
                .map(|item| coerce(inner, item))
                .collect::<Result<Vec<_>, _>>()
                .map(DynSolValue::FixedArray)
        }
        (DynSolType::Tuple(types), Value::Array(items)) => {
            if items.len() != types.len() {
                return Err(format!(
                    "expected {} values for {ty}, got {}",
                    types.len(),
                    items.len()
                ));
            }
            types
                .iter()
                .zip(items)
                .map(|(ty, item)| coerce(ty, item))
                .collect::<Result<Vec<_>, _>>()
                .map(DynSolValue::Tuple)
        }
        (_, Value::String(text)) => ty.coerce_str(text).map_err(|e| e.to_string()),
        (_, Value::Number(number)) => ty.coerce_str(&number.to_string()).map_err(|e| e.to_string()),
        (_, Value::Bool(flag)) => ty.coerce_str(&flag.to_string()).map_err(|e| e.to_string()),
        _ => Err(format!("cannot convert {value} to {ty}")),
    }
}

/// Wraps decoded selectors in the list type the constructor expects,
/// `bytesN[]` (right-padded) or `bytes[]`.
fn selector_values(ty: &DynSolType, selectors: Vec<Vec<u8>>) -> Result<DynSolValue, String> {
    let (element, fixed_len) = match ty {
        DynSolType::Array(inner) => (inner.as_ref(), None),
        DynSolType::FixedArray(inner, len) => (inner.as_ref(), Some(*len)),
        other => return Err(format!("expected a list type for selectors, found {other}")),
    };
    if let Some(len) = fixed_len {
        if len != selectors.len() {
            return Err(format!("expected {len} selectors, got {}", selectors.len()));
        }
    }

    let values = selectors
        .into_iter()
        .map(|bytes| match element {
            DynSolType::FixedBytes(size) if bytes.len() <= *size => Ok(DynSolValue::FixedBytes(
                B256::right_padding_from(&bytes),
                *size,
            )),
            DynSolType::FixedBytes(size) => Err(format!(
                "selector {} is longer than {size} bytes",
                text::encode0x(&bytes)
            )),
            DynSolType::Bytes => Ok(DynSolValue::Bytes(bytes)),
            other => Err(format!("unsupported selector type {other}")),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(match fixed_len {
        Some(_) => DynSolValue::FixedArray(values),
        None => DynSolValue::Array(values),
    })
}

/// Whether a configured value means "no arguments": null, zero, false, or an
/// empty string, list or object.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(entries) => entries.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{PERMISSION, PERMISSION_ADDRESS, REGISTRY};
    use alloy_primitives::{address, U256};
    use eyre::Result;
    use serde_json::json;

    const NODE: Address = address!("1a702a25c6bca72b67987968f0bfb3a3213c5688");
    const OTHER: Address = address!("00000000000000000000000000000000000000aa");

    fn abi(signature: &str) -> JsonAbi {
        JsonAbi {
            constructor: Some(Constructor::parse(signature).expect("valid constructor")),
            ..Default::default()
        }
    }

    fn decode(signature: &str, args: &[u8]) -> Result<Vec<DynSolValue>> {
        let constructor = Constructor::parse(signature)?;
        Ok(constructor.abi_decode_input(args, true)?)
    }

    fn spec(name: &str) -> &'static ContractSpec {
        REGISTRY.iter().find(|spec| spec.name == name).unwrap()
    }

    fn init_data(value: Value) -> Result<InitData> {
        let entries: BTreeMap<String, Value> = serde_json::from_value(value)?;
        Ok(InitData::from_entries(entries)?)
    }

    fn bytes4(selector: [u8; 4]) -> DynSolValue {
        DynSolValue::FixedBytes(B256::right_padding_from(&selector), 4)
    }

    #[test]
    fn selector_hex_pairs_decode_to_bytes() -> Result<()> {
        assert_eq!(decode_selector("a9059cbb")?, vec![0xA9, 0x05, 0x9C, 0xBB]);
        assert_eq!(decode_selector("0x095ea7b3")?, vec![0x09, 0x5e, 0xa7, 0xb3]);
        assert!(decode_selector("a9059cbz").is_err());
        Ok(())
    }

    #[test]
    fn pair_encodes_both_values() -> Result<()> {
        let signature = "constructor(address[] nodes, uint64[] stakes)";
        let constructor = abi(signature).constructor;
        let raw = json!([[text::encode0x(NODE)], [3]]);

        let args = ConstructorArgs::Pair.encode("NodeManager", constructor.as_ref(), Some(&raw))?;
        let values = decode(signature, &args)?;
        assert_eq!(
            values,
            vec![
                DynSolValue::Array(vec![DynSolValue::Address(NODE)]),
                DynSolValue::Array(vec![DynSolValue::Uint(U256::from(3), 64)]),
            ]
        );
        Ok(())
    }

    #[test]
    fn pair_and_triple_check_arity() {
        let constructor = abi("constructor(address[] nodes, uint64[] stakes)").constructor;
        let err = ConstructorArgs::Pair
            .encode("NodeManager", constructor.as_ref(), Some(&json!([[], [], []])))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Arity { want: 2, got: 3, .. }));

        let constructor = abi("constructor(uint256 a, uint256 b, bool c)").constructor;
        let err = ConstructorArgs::Triple
            .encode("ParamConstant", constructor.as_ref(), Some(&json!([1, 2])))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Arity { want: 3, got: 2, .. }));

        let err = ConstructorArgs::Triple
            .encode("ParamConstant", constructor.as_ref(), Some(&json!("1,2,3")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let err = ConstructorArgs::Triple
            .encode("ParamConstant", constructor.as_ref(), None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn triple_encodes_scalars() -> Result<()> {
        let signature = "constructor(uint256 a, uint256 b, bool c)";
        let constructor = abi(signature).constructor;
        let raw = json!([1024, "16", true]);

        let args = ConstructorArgs::Triple.encode("ParamConstant", constructor.as_ref(), Some(&raw))?;
        assert_eq!(args.len(), 3 * 32);
        let values = decode(signature, &args)?;
        assert_eq!(
            values,
            vec![
                DynSolValue::Uint(U256::from(1024), 256),
                DynSolValue::Uint(U256::from(16), 256),
                DynSolValue::Bool(true),
            ]
        );
        Ok(())
    }

    #[test]
    fn empty_config_encodes_nothing() -> Result<()> {
        let constructor = abi("constructor(address admin)").constructor;
        let empties = [json!(null), json!(""), json!([]), json!({}), json!(0), json!(false)];
        for raw in std::iter::once(None).chain(empties.into_iter().map(Some)) {
            let args = ConstructorArgs::Optional.encode("QuotaManager", constructor.as_ref(), raw.as_ref())?;
            assert!(args.is_empty());
        }

        let constructor = abi("constructor(address[] nodes, uint64[] stakes)").constructor;
        for raw in [json!(null), json!(0)] {
            let args = ConstructorArgs::Pair.encode("NodeManager", constructor.as_ref(), Some(&raw))?;
            assert!(args.is_empty());
        }

        let constructor = abi("constructor(uint256 a, uint256 b, bool c)").constructor;
        let args = ConstructorArgs::Triple.encode("ParamConstant", constructor.as_ref(), Some(&json!(false)))?;
        assert!(args.is_empty());
        Ok(())
    }

    #[test]
    fn optional_encodes_single_value() -> Result<()> {
        let constructor = abi("constructor(address admin)").constructor;
        let raw = json!(text::encode0x(NODE));
        let args = ConstructorArgs::Optional.encode("QuotaManager", constructor.as_ref(), Some(&raw))?;

        let mut expected = vec![0u8; 12];
        expected.extend_from_slice(NODE.as_slice());
        assert_eq!(args, expected);
        Ok(())
    }

    #[test]
    fn no_argument_contracts_ignore_config() -> Result<()> {
        let raw = json!(["ignored", 1, 2]);
        assert!(ConstructorArgs::None.encode("RoleCreator", None, Some(&raw))?.is_empty());
        Ok(())
    }

    #[test]
    fn values_without_constructor_are_rejected() {
        let err = ConstructorArgs::Optional
            .encode("QuotaManager", None, Some(&json!("0x01")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Arity { want: 0, got: 1, .. }));
    }

    #[test]
    fn permission_payload_decodes_selectors() -> Result<()> {
        let signature = "constructor(bytes32 name, address[] conts, bytes4[] funcs)";
        let constructor = abi(signature).constructor;
        let name = format!("0x{}", "11".repeat(32));
        let raw = json!([name, [text::encode0x(OTHER)], ["a9059cbb", "0x095ea7b3"]]);

        let args = ConstructorArgs::Permissions.encode(PERMISSION, constructor.as_ref(), Some(&raw))?;
        let values = decode(signature, &args)?;
        assert_eq!(
            values[2],
            DynSolValue::Array(vec![bytes4([0xA9, 0x05, 0x9C, 0xBB]), bytes4([0x09, 0x5e, 0xa7, 0xb3])])
        );
        assert_eq!(values[1], DynSolValue::Array(vec![DynSolValue::Address(OTHER)]));
        Ok(())
    }

    #[test]
    fn permission_rejects_bad_selectors() {
        let constructor = abi("constructor(bytes32 name, address[] conts, bytes4[] funcs)").constructor;
        let name = format!("0x{}", "11".repeat(32));
        for selectors in [json!(["a9059cb"]), json!(["nothex!!"]), json!([7]), json!(["a9059cbb00"])] {
            let raw = json!([name, [], selectors]);
            let err = ConstructorArgs::Permissions
                .encode(PERMISSION, constructor.as_ref(), Some(&raw))
                .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { .. }), "{err}");
        }
    }

    #[test]
    fn permissions_expand_per_address_with_template_last() -> Result<()> {
        let abi = abi("constructor(bytes32 name, address[] conts, bytes4[] funcs)");
        let name = |byte: &str| format!("0x{}", byte.repeat(32));
        let template = text::encode0x(PERMISSION_ADDRESS);
        let init = init_data(json!({
            (text::encode0x(PERMISSION_ADDRESS)): {
                "0x00000000000000000000000000000000000000bb": [name("bb"), [], ["a9059cbb"]],
                template: [name("b5"), [], []],
                "0x00000000000000000000000000000000000000aa": [name("aa"), [], []],
            }
        }))?;

        let deployments = spec(PERMISSION).deployments(&abi, &init)?;
        let addresses: Vec<_> = deployments.iter().map(|d| d.address).collect();
        assert_eq!(
            addresses,
            vec![
                OTHER,
                address!("00000000000000000000000000000000000000bb"),
                PERMISSION_ADDRESS,
            ]
        );

        let signature = "constructor(bytes32 name, address[] conts, bytes4[] funcs)";
        let template_values = decode(signature, &deployments[2].args)?;
        assert_eq!(
            template_values[0],
            DynSolValue::FixedBytes(B256::repeat_byte(0xb5), 32)
        );
        let bb_values = decode(signature, &deployments[1].args)?;
        assert_eq!(bb_values[2], DynSolValue::Array(vec![bytes4([0xA9, 0x05, 0x9C, 0xBB])]));
        Ok(())
    }

    #[test]
    fn permissions_require_template_entry() -> Result<()> {
        let abi = abi("constructor(bytes32 name, address[] conts, bytes4[] funcs)");
        let init = init_data(json!({
            (text::encode0x(PERMISSION_ADDRESS)): {
                "0x00000000000000000000000000000000000000aa": [format!("0x{}", "aa".repeat(32)), [], []],
            }
        }))?;
        let err = spec(PERMISSION).deployments(&abi, &init).unwrap_err();
        assert!(err.to_string().contains("template"));

        let err = spec(PERMISSION).deployments(&abi, &init_data(json!({}))?).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { .. }));
        Ok(())
    }

    #[test]
    fn authority_appended_to_node_manager_reaches_encoded_args() -> Result<()> {
        let signature = "constructor(address[] nodes, uint64[] stakes)";
        let abi = abi(signature);
        let mut init = init_data(json!({
            "0x00000000000000000000000000000000013241a2": [[text::encode0x(OTHER)], [1, 1]],
        }))?;
        init.append_authorities(&[NODE])?;

        let deployments = REGISTRY[0].deployments(&abi, &init)?;
        assert_eq!(deployments.len(), 1);
        let values = decode(signature, &deployments[0].args)?;
        assert_eq!(
            values[0],
            DynSolValue::Array(vec![DynSolValue::Address(OTHER), DynSolValue::Address(NODE)])
        );
        Ok(())
    }
}
