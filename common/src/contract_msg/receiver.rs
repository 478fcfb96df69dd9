//! Interface a contract implements to be notified by `TransferWithCall`
//! deliveries. The credit is final before this message is dispatched; a
//! failing receiver only fails the notification, never the credit.

use cosmwasm_std::{Binary, Uint128};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    OnTokenBridged {
        src_chain_id: u32,
        amount: Uint128,
        msg: Binary,
    },
}
