//! Messaging-transport surface consumed by the bridge applications.
//!
//! The endpoint packages outbound payloads, assigns per-path nonces and
//! eventually invokes `ReceivePacket` on the destination application. Only
//! the configured endpoint address is allowed to deliver.

use cosmwasm_std::{Binary, Uint128};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    Send {
        dst_chain_id: u32,
        dst_address: Binary,
        payload: Binary,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    EstimateFee {
        dst_chain_id: u32,
        payload: Binary,
        pay_in_token: bool,
        adapter_params: Binary,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EstimateFeeResponse {
    pub native_fee: Uint128,
    pub token_fee: Uint128,
}
