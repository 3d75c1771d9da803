// Copyright 2023-2024, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/cargo-stylus/blob/main/licenses/COPYRIGHT.md

use crate::encode::ConstructorArgs;
use alloy_primitives::{address, Address};

/// A system contract deployed into genesis at a fixed address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContractSpec {
    pub address: Address,
    /// Source file, relative to the contracts directory.
    pub file: &'static str,
    pub name: &'static str,
    pub args: ConstructorArgs,
}

pub const NODE_MANAGER: &str = "NodeManager";
pub const NODE_MANAGER_ADDRESS: Address = address!("00000000000000000000000000000000013241a2");

pub const PERMISSION: &str = "Permission";
pub const PERMISSION_ADDRESS: Address = address!("00000000000000000000000000000000013241b5");

/// Every system contract, in deployment order.
pub const REGISTRY: &[ContractSpec] = &[
    ContractSpec {
        address: NODE_MANAGER_ADDRESS,
        file: "system/node_manager.sol",
        name: NODE_MANAGER,
        args: ConstructorArgs::Pair,
    },
    ContractSpec {
        address: address!("00000000000000000000000000000000013241a3"),
        file: "system/quota_manager.sol",
        name: "QuotaManager",
        args: ConstructorArgs::Optional,
    },
    ContractSpec {
        address: address!("00000000000000000000000000000000013241a4"),
        file: "system/permission_manager.sol",
        name: "PermissionManager",
        args: ConstructorArgs::Pair,
    },
    ContractSpec {
        address: address!("00000000000000000000000000000000013241a5"),
        file: "permission/permission_system.sol",
        name: "PermissionSystem",
        args: ConstructorArgs::Pair,
    },
    ContractSpec {
        address: address!("0000000000000000000000000000000031415926"),
        file: "system/param_constant.sol",
        name: "ParamConstant",
        args: ConstructorArgs::Triple,
    },
    ContractSpec {
        address: address!("00000000000000000000000000000000013241b2"),
        file: "permission_management/permission_management.sol",
        name: "PermissionManagement",
        args: ConstructorArgs::None,
    },
    ContractSpec {
        address: address!("00000000000000000000000000000000013241b3"),
        file: "permission_management/permission_creator.sol",
        name: "PermissionCreator",
        args: ConstructorArgs::None,
    },
    ContractSpec {
        address: address!("00000000000000000000000000000000013241b4"),
        file: "permission_management/authorization.sol",
        name: "Authorization",
        args: ConstructorArgs::Optional,
    },
    ContractSpec {
        address: PERMISSION_ADDRESS,
        file: "permission_management/permission.sol",
        name: PERMISSION,
        args: ConstructorArgs::Permissions,
    },
    ContractSpec {
        address: address!("e9e2593c7d1db5ee843c143e9cb52b8d996b2380"),
        file: "permission_management/role_creator.sol",
        name: "RoleCreator",
        args: ConstructorArgs::None,
    },
    ContractSpec {
        address: address!("e3b5ddb80addb513b5c981e27bb030a86a8821ee"),
        file: "permission_management/role_management.sol",
        name: "RoleManagement",
        args: ConstructorArgs::None,
    },
];
