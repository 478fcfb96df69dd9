#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Binary, Deps, DepsMut, Env, Event, MessageInfo, Response, StdResult,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::state::TRUSTED_REMOTES;
use common::path_registry::{
    ExecuteMsg, InstantiateMsg, IsTrustedRemoteResponse, QueryMsg, TrustedRemoteResponse,
};

const CONTRACT_NAME: &str = "crates.io:path-registry";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    ownable::instantiate(deps.branch(), env, info, msg.into())?;
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::new())
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::SetTrustedRemote { chain_id, remote } => {
            execute_set_trusted_remote(deps, info, chain_id, remote)
        }
        ExecuteMsg::RenounceOwnership {} => Ok(ownable::execute_renounce_ownership(deps, info)?),
        ExecuteMsg::TransferOwnership { new_owner } => {
            Ok(ownable::execute_transfer_ownership(deps, info, new_owner)?)
        }
    }
}

/// Configure the counterparty for a remote chain. Overwriting a different
/// address is allowed here and only here: the owner call is the explicit
/// authorization. Re-setting the identical address succeeds but is
/// signalled as already set.
pub fn execute_set_trusted_remote(
    deps: DepsMut,
    info: MessageInfo,
    chain_id: u32,
    remote: Binary,
) -> Result<Response, ContractError> {
    ownable::only_owner(deps.as_ref(), &info)?;

    let existing = TRUSTED_REMOTES.may_load(deps.storage, chain_id)?;
    if existing.as_ref() == Some(&remote) {
        return Ok(Response::new().add_event(
            Event::new("TrustedRemoteAlreadySet")
                .add_attribute("chain_id", chain_id.to_string())
                .add_attribute("remote", remote.to_base64()),
        ));
    }

    TRUSTED_REMOTES.save(deps.storage, chain_id, &remote)?;

    Ok(Response::new().add_event(
        Event::new("TrustedRemoteSet")
            .add_attribute("chain_id", chain_id.to_string())
            .add_attribute("remote", remote.to_base64())
            .add_attribute("overwrite", existing.is_some().to_string()),
    ))
}

pub fn trusted_remote(deps: Deps, chain_id: u32) -> StdResult<Option<Binary>> {
    TRUSTED_REMOTES.may_load(deps.storage, chain_id)
}

pub fn is_trusted_remote(deps: Deps, chain_id: u32, src_address: &[u8]) -> StdResult<bool> {
    Ok(match TRUSTED_REMOTES.may_load(deps.storage, chain_id)? {
        Some(remote) => remote.as_slice() == src_address,
        None => false,
    })
}

/// Fatal-path check applied to every inbound delivery before any state
/// is touched. An untrusted source is rejected outright.
pub fn assert_trusted_remote(
    deps: Deps,
    chain_id: u32,
    src_address: &[u8],
) -> Result<(), ContractError> {
    if !is_trusted_remote(deps, chain_id, src_address)? {
        return Err(ContractError::UntrustedPath { chain_id });
    }
    Ok(())
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::TrustedRemote { chain_id } => {
            to_json_binary(&query_trusted_remote(deps, chain_id)?)
        }
        QueryMsg::IsTrustedRemote { chain_id, address } => {
            to_json_binary(&query_is_trusted_remote(deps, chain_id, address)?)
        }
        QueryMsg::Owner {} => to_json_binary(&ownable::query_owner(deps)?),
    }
}

pub fn query_trusted_remote(deps: Deps, chain_id: u32) -> StdResult<TrustedRemoteResponse> {
    Ok(TrustedRemoteResponse {
        remote: trusted_remote(deps, chain_id)?,
    })
}

pub fn query_is_trusted_remote(
    deps: Deps,
    chain_id: u32,
    address: Binary,
) -> StdResult<IsTrustedRemoteResponse> {
    Ok(IsTrustedRemoteResponse {
        trusted: is_trusted_remote(deps, chain_id, address.as_slice())?,
    })
}
