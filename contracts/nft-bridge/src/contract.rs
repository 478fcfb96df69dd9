#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Addr, Binary, CosmosMsg, Deps, DepsMut, Empty, Env, Event, MessageInfo,
    Response, StdResult, Storage, WasmMsg,
};
use cw2::set_contract_version;
use cw721::{Cw721ExecuteMsg, Cw721QueryMsg, OwnerOfResponse};
use ethers_core::types::H256;
use serde::{Deserialize, Serialize};

use crate::credits::credit_key;
use crate::error::ContractError;
use crate::state::{Config, CreditRecord, BATCH_LIMITS, CONFIG, CREDITS, CUSTODY, MINTED};
use common::nft_bridge::{
    BatchSizeLimitResponse, ConfigResponse, CreditRecordInfo, CreditsResponse, ExecuteMsg,
    InstantiateMsg, QueryMsg, QuoteFeeResponse,
};
use common::{endpoint, h256_to_addr, BridgeMode, Encode, Packet};

const CONTRACT_NAME: &str = "crates.io:nft-bridge";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Mint entry of the collection contract (cw721-base compatible)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
enum CollectionMintMsg {
    Mint {
        token_id: String,
        owner: String,
        token_uri: Option<String>,
        extension: Option<Empty>,
    },
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    path_registry::instantiate(deps.branch(), env, info, msg.clone().into())?;

    if msg.default_batch_limit == 0 || msg.receive_batch_limit == 0 {
        return Err(ContractError::InvalidBatchLimit {});
    }

    let config = Config {
        local_chain_id: msg.local_chain_id,
        endpoint: deps.api.addr_validate(&msg.endpoint)?,
        collection: deps.api.addr_validate(&msg.collection)?,
        mode: msg.mode,
        default_batch_limit: msg.default_batch_limit,
        receive_batch_limit: msg.receive_batch_limit,
    };
    CONFIG.save(deps.storage, &config)?;

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::new())
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Send {
            token_id,
            dst_chain_id,
            recipient,
        } => execute_send_batch(deps, env, info, vec![token_id], dst_chain_id, recipient),
        ExecuteMsg::SendBatch {
            token_ids,
            dst_chain_id,
            recipient,
        } => execute_send_batch(deps, env, info, token_ids, dst_chain_id, recipient),
        ExecuteMsg::ReceivePacket {
            src_chain_id,
            src_address,
            nonce,
            payload,
        } => execute_receive_packet(deps, info, src_chain_id, src_address, nonce, payload),
        ExecuteMsg::RetryPayload {
            src_chain_id,
            src_address,
            payload,
        } => Ok(channel::try_retry_payload(
            deps,
            src_chain_id,
            &src_address,
            payload,
            handle_packet,
        )?),
        ExecuteMsg::ForceResumeReceive { src_chain_id, .. } => {
            ownable::only_owner(deps.as_ref(), &info)?;
            Ok(channel::try_force_resume(deps, src_chain_id, handle_packet)?)
        }
        ExecuteMsg::ClearCredits { key, limit } => execute_clear_credits(deps, key, limit),
        ExecuteMsg::SetTrustedRemote { chain_id, remote } => Ok(
            path_registry::execute_set_trusted_remote(deps, info, chain_id, remote)?,
        ),
        ExecuteMsg::SetBatchSizeLimit { chain_id, limit } => {
            execute_set_batch_size_limit(deps, info, chain_id, limit)
        }
        ExecuteMsg::SetReceiveBatchLimit { limit } => {
            execute_set_receive_batch_limit(deps, info, limit)
        }
        ExecuteMsg::RenounceOwnership {} => Ok(ownable::execute_renounce_ownership(deps, info)?),
        ExecuteMsg::TransferOwnership { new_owner } => {
            Ok(ownable::execute_transfer_ownership(deps, info, new_owner)?)
        }
    }
}

/// Move a batch out: the sender must own every id and have approved the
/// bridge as operator on the collection. The batch is rejected, not
/// split, when it exceeds the destination's configured limit.
pub fn execute_send_batch(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    token_ids: Vec<u64>,
    dst_chain_id: u32,
    recipient: H256,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if token_ids.is_empty() {
        return Err(ContractError::EmptyBatch {});
    }
    let limit = effective_batch_limit(deps.as_ref(), &config, dst_chain_id)?;
    if token_ids.len() > limit as usize {
        return Err(ContractError::BatchTooLarge {
            limit,
            got: token_ids.len() as u32,
        });
    }

    let remote = path_registry::trusted_remote(deps.as_ref(), dst_chain_id)?.ok_or(
        ContractError::UntrustedDestination {
            chain_id: dst_chain_id,
        },
    )?;

    let mut msgs: Vec<CosmosMsg> = vec![];
    for &token_id in &token_ids {
        let owner: OwnerOfResponse = deps.querier.query_wasm_smart(
            config.collection.clone(),
            &Cw721QueryMsg::OwnerOf {
                token_id: token_id.to_string(),
                include_expired: None,
            },
        )?;
        if owner.owner != info.sender {
            return Err(ContractError::NotTokenOwner { token_id });
        }

        // pull the token into the bridge
        msgs.push(collection_msg(
            &config,
            &Cw721ExecuteMsg::TransferNft {
                recipient: env.contract.address.to_string(),
                token_id: token_id.to_string(),
            },
        )?);

        match config.mode {
            BridgeMode::Locker => CUSTODY.save(deps.storage, token_id, &true)?,
            BridgeMode::Minter => {
                // wrapped representation leaves this chain
                msgs.push(collection_msg(
                    &config,
                    &Cw721ExecuteMsg::Burn {
                        token_id: token_id.to_string(),
                    },
                )?);
                MINTED.remove(deps.storage, token_id);
            }
        }
    }

    let packet = Packet::BatchTransfer {
        to: recipient,
        token_ids: token_ids.clone(),
    };
    msgs.push(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: config.endpoint.to_string(),
        msg: to_json_binary(&endpoint::ExecuteMsg::Send {
            dst_chain_id,
            dst_address: remote,
            payload: Binary::from(packet.to_vec()),
        })?,
        funds: vec![],
    }));

    Ok(Response::new().add_messages(msgs).add_event(
        Event::new("SendBatchToChain")
            .add_attribute("dst_chain_id", dst_chain_id.to_string())
            .add_attribute("sender", info.sender)
            .add_attribute("recipient", format!("{:?}", recipient))
            .add_attribute("count", token_ids.len().to_string()),
    ))
}

pub fn execute_receive_packet(
    deps: DepsMut,
    info: MessageInfo,
    src_chain_id: u32,
    src_address: Binary,
    nonce: u64,
    payload: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.endpoint {
        return Err(ContractError::NotEndpoint {});
    }

    Ok(channel::try_receive(
        deps,
        src_chain_id,
        &src_address,
        nonce,
        payload,
        handle_packet,
    )?)
}

fn handle_packet(
    deps: DepsMut,
    src_chain_id: u32,
    packet: &Packet,
) -> Result<Response, channel::ContractError> {
    match packet {
        Packet::BatchTransfer { to, token_ids } => {
            Ok(receive_batch(deps, src_chain_id, *to, token_ids)?)
        }
        Packet::Transfer { .. } | Packet::TransferWithCall { .. } => {
            Err(channel::ContractError::Application {
                reason: "fungible packet on nft bridge".to_owned(),
            })
        }
    }
}

/// Settle a delivered batch id by id, up to the receiver's per-delivery
/// budget. An id that cannot settle is credited instead of aborting the
/// batch; ids past the budget are credited untouched.
fn receive_batch(
    deps: DepsMut,
    src_chain_id: u32,
    to: H256,
    token_ids: &[u64],
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let recipient = h256_to_addr(deps.api, &to)?;
    let budget = config.receive_batch_limit as usize;

    let mut msgs: Vec<CosmosMsg> = vec![];
    let mut failed: Vec<u64> = vec![];
    for (position, &token_id) in token_ids.iter().enumerate() {
        if position >= budget {
            failed.extend_from_slice(&token_ids[position..]);
            break;
        }
        match try_settle(deps.storage, &config, &recipient, token_id)? {
            Some(msg) => msgs.push(msg),
            None => failed.push(token_id),
        }
    }

    let settled = msgs.len();
    let mut resp = Response::new().add_messages(msgs).add_event(
        Event::new("ReceiveBatchFromChain")
            .add_attribute("src_chain_id", src_chain_id.to_string())
            .add_attribute("recipient", recipient.clone())
            .add_attribute("settled", settled.to_string())
            .add_attribute("failed", failed.len().to_string()),
    );

    if !failed.is_empty() {
        let key = credit_key(src_chain_id, &to, token_ids);
        let record = match CREDITS.may_load(deps.storage, key.as_bytes())? {
            Some(mut record) => {
                record.remaining.extend_from_slice(&failed);
                record
            }
            None => CreditRecord {
                src_chain_id,
                recipient,
                remaining: failed,
            },
        };
        CREDITS.save(deps.storage, key.as_bytes(), &record)?;

        resp = resp.add_event(
            Event::new("CreditStored")
                .add_attribute("key", format!("{:?}", key))
                .add_attribute("remaining", record.remaining.len().to_string()),
        );
    }

    Ok(resp)
}

/// Calling with an unknown key is fatal so double-clearing is visible to
/// the caller. The record only ever shrinks; when the last id settles it
/// is deleted.
pub fn execute_clear_credits(
    deps: DepsMut,
    key: H256,
    limit: Option<u32>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let record = CREDITS
        .may_load(deps.storage, key.as_bytes())?
        .ok_or(ContractError::NoCreditsStored {})?;

    let budget = limit.map_or(usize::MAX, |limit| limit as usize);

    let mut msgs: Vec<CosmosMsg> = vec![];
    let mut remaining: Vec<u64> = vec![];
    for (position, &token_id) in record.remaining.iter().enumerate() {
        if position >= budget {
            remaining.extend_from_slice(&record.remaining[position..]);
            break;
        }
        match try_settle(deps.storage, &config, &record.recipient, token_id)? {
            Some(msg) => msgs.push(msg),
            None => remaining.push(token_id),
        }
    }

    let settled = msgs.len();
    if remaining.is_empty() {
        CREDITS.remove(deps.storage, key.as_bytes());
    } else {
        CREDITS.save(
            deps.storage,
            key.as_bytes(),
            &CreditRecord {
                remaining: remaining.clone(),
                ..record
            },
        )?;
    }

    Ok(Response::new().add_messages(msgs).add_event(
        Event::new("CreditsCleared")
            .add_attribute("key", format!("{:?}", key))
            .add_attribute("settled", settled.to_string())
            .add_attribute("remaining", remaining.len().to_string()),
    ))
}

/// One id either settles into a collection message or reports failure;
/// it never aborts the surrounding batch.
fn try_settle(
    storage: &mut dyn Storage,
    config: &Config,
    recipient: &Addr,
    token_id: u64,
) -> Result<Option<CosmosMsg>, ContractError> {
    match config.mode {
        BridgeMode::Locker => {
            if !CUSTODY.has(storage, token_id) {
                return Ok(None);
            }
            CUSTODY.remove(storage, token_id);
            Ok(Some(collection_msg(
                config,
                &Cw721ExecuteMsg::TransferNft {
                    recipient: recipient.to_string(),
                    token_id: token_id.to_string(),
                },
            )?))
        }
        BridgeMode::Minter => {
            if MINTED.has(storage, token_id) {
                return Ok(None);
            }
            MINTED.save(storage, token_id, &true)?;
            Ok(Some(CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: config.collection.to_string(),
                msg: to_json_binary(&CollectionMintMsg::Mint {
                    token_id: token_id.to_string(),
                    owner: recipient.to_string(),
                    token_uri: None,
                    extension: None,
                })?,
                funds: vec![],
            })))
        }
    }
}

pub fn execute_set_batch_size_limit(
    deps: DepsMut,
    info: MessageInfo,
    chain_id: u32,
    limit: Option<u32>,
) -> Result<Response, ContractError> {
    ownable::only_owner(deps.as_ref(), &info)?;

    match limit {
        Some(0) => return Err(ContractError::InvalidBatchLimit {}),
        Some(limit) => BATCH_LIMITS.save(deps.storage, chain_id, &limit)?,
        None => BATCH_LIMITS.remove(deps.storage, chain_id),
    }

    Ok(Response::new().add_event(
        Event::new("SetBatchSizeLimit")
            .add_attribute("chain_id", chain_id.to_string())
            .add_attribute(
                "limit",
                limit.map_or("default".to_owned(), |limit| limit.to_string()),
            ),
    ))
}

pub fn execute_set_receive_batch_limit(
    deps: DepsMut,
    info: MessageInfo,
    limit: u32,
) -> Result<Response, ContractError> {
    ownable::only_owner(deps.as_ref(), &info)?;
    if limit == 0 {
        return Err(ContractError::InvalidBatchLimit {});
    }

    CONFIG.update(deps.storage, |mut config| -> StdResult<_> {
        config.receive_batch_limit = limit;
        Ok(config)
    })?;

    Ok(Response::new()
        .add_event(Event::new("SetReceiveBatchLimit").add_attribute("limit", limit.to_string())))
}

fn effective_batch_limit(deps: Deps, config: &Config, dst_chain_id: u32) -> StdResult<u32> {
    Ok(BATCH_LIMITS
        .may_load(deps.storage, dst_chain_id)?
        .unwrap_or(config.default_batch_limit))
}

fn collection_msg(config: &Config, msg: &Cw721ExecuteMsg) -> Result<CosmosMsg, ContractError> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: config.collection.to_string(),
        msg: to_json_binary(msg)?,
        funds: vec![],
    }))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Owner {} => to_json_binary(&ownable::query_owner(deps)?),
        QueryMsg::TrustedRemote { chain_id } => {
            to_json_binary(&path_registry::query_trusted_remote(deps, chain_id)?)
        }
        QueryMsg::IsTrustedRemote { chain_id, address } => to_json_binary(
            &path_registry::query_is_trusted_remote(deps, chain_id, address)?,
        ),
        QueryMsg::BatchSizeLimit { chain_id } => {
            to_json_binary(&query_batch_size_limit(deps, chain_id)?)
        }
        QueryMsg::Credits { key } => to_json_binary(&query_credits(deps, key)?),
        QueryMsg::ExpectedNonce { src_chain_id } => {
            to_json_binary(&channel::query_expected_nonce(deps, src_chain_id)?)
        }
        QueryMsg::HasStoredPayload { src_chain_id } => {
            to_json_binary(&channel::query_has_stored_payload(deps, src_chain_id)?)
        }
        QueryMsg::StoredPayload { src_chain_id } => {
            to_json_binary(&channel::query_stored_payload(deps, src_chain_id)?)
        }
        QueryMsg::QueueLength { src_chain_id } => {
            to_json_binary(&channel::query_queue_length(deps, src_chain_id)?)
        }
        QueryMsg::QuoteFee {
            dst_chain_id,
            token_ids,
        } => to_json_binary(&query_quote_fee(deps, dst_chain_id, token_ids)?),
    }
}

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        local_chain_id: config.local_chain_id,
        endpoint: config.endpoint.to_string(),
        collection: config.collection.to_string(),
        mode: config.mode,
        default_batch_limit: config.default_batch_limit,
        receive_batch_limit: config.receive_batch_limit,
    })
}

pub fn query_batch_size_limit(deps: Deps, chain_id: u32) -> StdResult<BatchSizeLimitResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(BatchSizeLimitResponse {
        limit: effective_batch_limit(deps, &config, chain_id)?,
    })
}

pub fn query_credits(deps: Deps, key: H256) -> StdResult<CreditsResponse> {
    let record = CREDITS
        .may_load(deps.storage, key.as_bytes())?
        .map(|record| CreditRecordInfo {
            src_chain_id: record.src_chain_id,
            recipient: record.recipient.to_string(),
            remaining: record.remaining,
        });
    Ok(CreditsResponse { record })
}

pub fn query_quote_fee(
    deps: Deps,
    dst_chain_id: u32,
    token_ids: Vec<u64>,
) -> StdResult<QuoteFeeResponse> {
    let config = CONFIG.load(deps.storage)?;

    let packet = Packet::BatchTransfer {
        to: H256::zero(),
        token_ids,
    };
    let quote: endpoint::EstimateFeeResponse = deps.querier.query_wasm_smart(
        config.endpoint,
        &endpoint::QueryMsg::EstimateFee {
            dst_chain_id,
            payload: Binary::from(packet.to_vec()),
            pay_in_token: false,
            adapter_params: Binary::default(),
        },
    )?;

    Ok(QuoteFeeResponse {
        native_fee: quote.native_fee,
        token_fee: quote.token_fee,
    })
}
