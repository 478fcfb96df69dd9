use cosmwasm_std::Binary;
use serde::{Deserialize, Serialize};

use super::ownable;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InstantiateMsg {}

impl From<InstantiateMsg> for ownable::InstantiateMsg {
    fn from(_: InstantiateMsg) -> Self {
        ownable::InstantiateMsg {}
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    SetTrustedRemote { chain_id: u32, remote: Binary },
    RenounceOwnership {},
    TransferOwnership { new_owner: String },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    TrustedRemote { chain_id: u32 },
    IsTrustedRemote { chain_id: u32, address: Binary },
    Owner {},
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrustedRemoteResponse {
    pub remote: Option<Binary>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct IsTrustedRemoteResponse {
    pub trusted: bool,
}
