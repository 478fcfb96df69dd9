#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    from_json, to_json_binary, Addr, Binary, CosmosMsg, Deps, DepsMut, Env, Event, MessageInfo,
    Order, Reply, Response, StdError, StdResult, SubMsg, SubMsgResult, Uint128, WasmMsg,
};
use cw2::set_contract_version;
use cw20::{Cw20ExecuteMsg, Cw20ReceiveMsg};

use crate::amounts::{break_down_send, conversion_rate, wire_to_local, MAX_FEE_BP};
use crate::error::ContractError;
use crate::state::{
    Config, FailedCallRecord, PendingCall, CONFIG, FAILED_CALLS, FEE_BP, LOCKED, NEXT_CALL_SEQ,
    PENDING_CALLS, SUPPLY,
};
use common::token_bridge::{
    ConfigResponse, ExecuteMsg, FailedCall, FailedCallsResponse, FeeBpResponse, InstantiateMsg,
    LedgerResponse, QueryMsg, QuoteFeeResponse, SendMsg, SimulateResponse,
};
use common::{endpoint, h256_to_addr, receiver, BridgeMode, ChainLedger, Decode, Encode, Packet};
use ethers_core::types::H256;

const CONTRACT_NAME: &str = "crates.io:token-bridge";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const CALL_REPLY_ID: u64 = 1;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    path_registry::instantiate(deps.branch(), env, info, msg.clone().into())?;

    if msg.shared_decimals > msg.local_decimals || msg.local_decimals > 18 {
        return Err(ContractError::InvalidDecimals {
            local: msg.local_decimals,
            shared: msg.shared_decimals,
        });
    }
    if msg.default_fee_bp > MAX_FEE_BP {
        return Err(ContractError::InvalidFeeBp {
            fee_bp: msg.default_fee_bp,
        });
    }

    let config = Config {
        local_chain_id: msg.local_chain_id,
        endpoint: deps.api.addr_validate(&msg.endpoint)?,
        token: deps.api.addr_validate(&msg.token)?,
        mode: msg.mode,
        local_decimals: msg.local_decimals,
        shared_decimals: msg.shared_decimals,
        fee_owner: deps.api.addr_validate(&msg.fee_owner)?,
        default_fee_bp: msg.default_fee_bp,
    };
    CONFIG.save(deps.storage, &config)?;
    LOCKED.save(deps.storage, &Uint128::zero())?;
    SUPPLY.save(deps.storage, &Uint128::zero())?;
    NEXT_CALL_SEQ.save(deps.storage, &1u64)?;

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
        ExecuteMsg::Receive(wrapper) => execute_receive(deps, info, wrapper),
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
        ExecuteMsg::RetryCall { seq } => execute_retry_call(deps, seq),
        ExecuteMsg::SetTrustedRemote { chain_id, remote } => Ok(
            path_registry::execute_set_trusted_remote(deps, info, chain_id, remote)?,
        ),
        ExecuteMsg::SetFeeBp { chain_id, fee_bp } => {
            execute_set_fee_bp(deps, info, chain_id, fee_bp)
        }
        ExecuteMsg::SetDefaultFeeBp { fee_bp } => execute_set_default_fee_bp(deps, info, fee_bp),
        ExecuteMsg::SetFeeOwner { fee_owner } => execute_set_fee_owner(deps, info, fee_owner),
        ExecuteMsg::RenounceOwnership {} => Ok(ownable::execute_renounce_ownership(deps, info)?),
        ExecuteMsg::TransferOwnership { new_owner } => {
            Ok(ownable::execute_transfer_ownership(deps, info, new_owner)?)
        }
    }
}

/// cw20 receive hook: the attached amount is what the bridge actually
/// holds, so fee-on-transfer tokens cannot overstate the locked value.
pub fn execute_receive(
    deps: DepsMut,
    info: MessageInfo,
    wrapper: Cw20ReceiveMsg,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.token {
        return Err(ContractError::UnknownToken {});
    }

    let sender = deps.api.addr_validate(&wrapper.sender)?;
    let send: SendMsg = from_json(&wrapper.msg)?;
    execute_send(deps, config, sender, wrapper.amount, send)
}

pub fn execute_send(
    deps: DepsMut,
    config: Config,
    sender: Addr,
    amount: Uint128,
    send: SendMsg,
) -> Result<Response, ContractError> {
    let remote = path_registry::trusted_remote(deps.as_ref(), send.dst_chain_id)?.ok_or(
        ContractError::UntrustedDestination {
            chain_id: send.dst_chain_id,
        },
    )?;

    let fee_bp = effective_fee_bp(deps.as_ref(), &config, send.dst_chain_id)?;
    let rate = conversion_rate(config.local_decimals, config.shared_decimals);
    let breakdown = break_down_send(amount, fee_bp, rate)?;

    if breakdown.wire_amount == 0 {
        return Err(ContractError::AmountTooSmall {});
    }
    let min_amount_out = send.min_amount_out.unwrap_or_default();
    if breakdown.net < min_amount_out {
        return Err(ContractError::AmountBelowMinimum {
            min_amount_out,
            amount: breakdown.net,
        });
    }

    match config.mode {
        BridgeMode::Locker => {
            let locked = LOCKED.load(deps.storage)?;
            let locked = locked
                .checked_add(breakdown.net)
                .map_err(|_| ContractError::LedgerOverflow {})?;
            LOCKED.save(deps.storage, &locked)?;
        }
        BridgeMode::Minter => {
            let supply = SUPPLY.load(deps.storage)?;
            let supply =
                supply
                    .checked_sub(breakdown.net)
                    .map_err(|_| ContractError::InsufficientSupply {
                        supply,
                        needed: breakdown.net,
                    })?;
            SUPPLY.save(deps.storage, &supply)?;
        }
    }

    let mut msgs: Vec<CosmosMsg> = vec![];
    if !breakdown.fee.is_zero() {
        msgs.push(token_msg(
            &config,
            Cw20ExecuteMsg::Transfer {
                recipient: config.fee_owner.to_string(),
                amount: breakdown.fee,
            },
        )?);
    }
    if !breakdown.dust.is_zero() {
        msgs.push(token_msg(
            &config,
            Cw20ExecuteMsg::Transfer {
                recipient: sender.to_string(),
                amount: breakdown.dust,
            },
        )?);
    }
    if config.mode == BridgeMode::Minter {
        msgs.push(token_msg(
            &config,
            Cw20ExecuteMsg::Burn {
                amount: breakdown.net,
            },
        )?);
    }

    let packet = match send.call {
        None => Packet::Transfer {
            to: send.recipient,
            amount: breakdown.wire_amount,
        },
        Some(call) => Packet::TransferWithCall {
            to: send.recipient,
            amount: breakdown.wire_amount,
            call: call.to_vec(),
        },
    };
    msgs.push(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: config.endpoint.to_string(),
        msg: to_json_binary(&endpoint::ExecuteMsg::Send {
            dst_chain_id: send.dst_chain_id,
            dst_address: remote,
            payload: Binary::from(packet.to_vec()),
        })?,
        funds: vec![],
    }));

    Ok(Response::new().add_messages(msgs).add_event(
        Event::new("SendToChain")
            .add_attribute("dst_chain_id", send.dst_chain_id.to_string())
            .add_attribute("sender", sender)
            .add_attribute("recipient", format!("{:?}", send.recipient))
            .add_attribute("wire_amount", breakdown.wire_amount.to_string())
            .add_attribute("fee", breakdown.fee)
            .add_attribute("dust", breakdown.dust),
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

/// Channel application callback. Validates and computes before saving,
/// so a failure leaves no partial state behind the stored payload.
fn handle_packet(
    deps: DepsMut,
    src_chain_id: u32,
    packet: &Packet,
) -> Result<Response, channel::ContractError> {
    match packet {
        Packet::Transfer { to, amount } => Ok(credit(deps, src_chain_id, *to, *amount, None)?),
        Packet::TransferWithCall { to, amount, call } => Ok(credit(
            deps,
            src_chain_id,
            *to,
            *amount,
            Some(Binary::from(call.clone())),
        )?),
        Packet::BatchTransfer { .. } => Err(channel::ContractError::Application {
            reason: "batch transfer packet on fungible bridge".to_owned(),
        }),
    }
}

fn credit(
    deps: DepsMut,
    src_chain_id: u32,
    to: H256,
    wire_amount: u64,
    call: Option<Binary>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let recipient = h256_to_addr(deps.api, &to)?;

    let rate = conversion_rate(config.local_decimals, config.shared_decimals);
    let amount = wire_to_local(wire_amount, rate)?;

    let credit_msg = match config.mode {
        BridgeMode::Locker => {
            let locked = LOCKED.load(deps.storage)?;
            let remaining =
                locked
                    .checked_sub(amount)
                    .map_err(|_| ContractError::InsufficientLocked {
                        locked,
                        needed: amount,
                    })?;
            LOCKED.save(deps.storage, &remaining)?;

            token_msg(
                &config,
                Cw20ExecuteMsg::Transfer {
                    recipient: recipient.to_string(),
                    amount,
                },
            )?
        }
        BridgeMode::Minter => {
            let supply = SUPPLY.load(deps.storage)?;
            let supply = supply
                .checked_add(amount)
                .map_err(|_| ContractError::LedgerOverflow {})?;
            SUPPLY.save(deps.storage, &supply)?;

            token_msg(
                &config,
                Cw20ExecuteMsg::Mint {
                    recipient: recipient.to_string(),
                    amount,
                },
            )?
        }
    };

    let mut resp = Response::new().add_message(credit_msg).add_event(
        Event::new("ReceiveFromChain")
            .add_attribute("src_chain_id", src_chain_id.to_string())
            .add_attribute("recipient", recipient.clone())
            .add_attribute("wire_amount", wire_amount.to_string())
            .add_attribute("amount", amount),
    );

    // The credit above is final; the notification is a separate fallible
    // step tracked for independent retry.
    if let Some(msg) = call {
        let seq = NEXT_CALL_SEQ.load(deps.storage)?;
        NEXT_CALL_SEQ.save(deps.storage, &(seq + 1))?;

        let mut pending = PENDING_CALLS.may_load(deps.storage)?.unwrap_or_default();
        pending.push_back(PendingCall {
            seq,
            src_chain_id,
            recipient: recipient.clone(),
            amount,
            msg: msg.clone(),
        });
        PENDING_CALLS.save(deps.storage, &pending)?;

        resp = resp.add_submessage(SubMsg::reply_always(
            notify_msg(&recipient, src_chain_id, amount, msg)?,
            CALL_REPLY_ID,
        ));
    }

    Ok(resp)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    if msg.id != CALL_REPLY_ID {
        return Err(ContractError::UnknownReplyId { id: msg.id });
    }

    let mut pending = PENDING_CALLS.may_load(deps.storage)?.unwrap_or_default();
    let call = pending
        .pop_front()
        .ok_or_else(|| StdError::generic_err("reply without pending call"))?;
    PENDING_CALLS.save(deps.storage, &pending)?;

    match msg.result {
        SubMsgResult::Ok(_) => Ok(Response::new()),
        SubMsgResult::Err(reason) => {
            FAILED_CALLS.save(
                deps.storage,
                call.seq,
                &FailedCallRecord {
                    src_chain_id: call.src_chain_id,
                    recipient: call.recipient,
                    amount: call.amount,
                    msg: call.msg,
                    reason: reason.clone(),
                },
            )?;

            Ok(Response::new().add_event(
                Event::new("CallFailed")
                    .add_attribute("seq", call.seq.to_string())
                    .add_attribute("reason", reason),
            ))
        }
    }
}

/// Re-dispatch a failed notification. Failure here aborts the retry and
/// keeps the record.
pub fn execute_retry_call(deps: DepsMut, seq: u64) -> Result<Response, ContractError> {
    let call = FAILED_CALLS
        .may_load(deps.storage, seq)?
        .ok_or(ContractError::NoFailedCall { seq })?;
    FAILED_CALLS.remove(deps.storage, seq);

    Ok(Response::new()
        .add_message(notify_msg(
            &call.recipient,
            call.src_chain_id,
            call.amount,
            call.msg,
        )?)
        .add_event(Event::new("CallRetried").add_attribute("seq", seq.to_string())))
}

pub fn execute_set_fee_bp(
    deps: DepsMut,
    info: MessageInfo,
    chain_id: u32,
    fee_bp: Option<u16>,
) -> Result<Response, ContractError> {
    ownable::only_owner(deps.as_ref(), &info)?;

    match fee_bp {
        Some(fee_bp) => {
            if fee_bp > MAX_FEE_BP {
                return Err(ContractError::InvalidFeeBp { fee_bp });
            }
            FEE_BP.save(deps.storage, chain_id, &fee_bp)?;
        }
        None => FEE_BP.remove(deps.storage, chain_id),
    }

    Ok(Response::new().add_event(
        Event::new("SetFeeBp")
            .add_attribute("chain_id", chain_id.to_string())
            .add_attribute(
                "fee_bp",
                fee_bp.map_or("default".to_owned(), |bp| bp.to_string()),
            ),
    ))
}

pub fn execute_set_default_fee_bp(
    deps: DepsMut,
    info: MessageInfo,
    fee_bp: u16,
) -> Result<Response, ContractError> {
    ownable::only_owner(deps.as_ref(), &info)?;
    if fee_bp > MAX_FEE_BP {
        return Err(ContractError::InvalidFeeBp { fee_bp });
    }

    CONFIG.update(deps.storage, |mut config| -> StdResult<_> {
        config.default_fee_bp = fee_bp;
        Ok(config)
    })?;

    Ok(Response::new()
        .add_event(Event::new("SetDefaultFeeBp").add_attribute("fee_bp", fee_bp.to_string())))
}

pub fn execute_set_fee_owner(
    deps: DepsMut,
    info: MessageInfo,
    fee_owner: String,
) -> Result<Response, ContractError> {
    ownable::only_owner(deps.as_ref(), &info)?;

    let fee_owner = deps.api.addr_validate(&fee_owner)?;
    CONFIG.update(deps.storage, |mut config| -> StdResult<_> {
        config.fee_owner = fee_owner.clone();
        Ok(config)
    })?;

    Ok(Response::new().add_event(Event::new("SetFeeOwner").add_attribute("fee_owner", fee_owner)))
}

fn effective_fee_bp(deps: Deps, config: &Config, dst_chain_id: u32) -> StdResult<u16> {
    Ok(FEE_BP
        .may_load(deps.storage, dst_chain_id)?
        .unwrap_or(config.default_fee_bp))
}

fn token_msg(config: &Config, msg: Cw20ExecuteMsg) -> Result<CosmosMsg, ContractError> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: config.token.to_string(),
        msg: to_json_binary(&msg)?,
        funds: vec![],
    }))
}

fn notify_msg(
    recipient: &Addr,
    src_chain_id: u32,
    amount: Uint128,
    msg: Binary,
) -> Result<CosmosMsg, ContractError> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: recipient.to_string(),
        msg: to_json_binary(&receiver::ExecuteMsg::OnTokenBridged {
            src_chain_id,
            amount,
            msg,
        })?,
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
        QueryMsg::FeeBp { chain_id } => to_json_binary(&query_fee_bp(deps, chain_id)?),
        QueryMsg::Ledger {} => to_json_binary(&query_ledger(deps)?),
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
        QueryMsg::FailedCalls {} => to_json_binary(&query_failed_calls(deps)?),
        QueryMsg::QuoteFee {
            dst_chain_id,
            amount,
        } => to_json_binary(&query_quote_fee(deps, dst_chain_id, amount)?),
        QueryMsg::Simulate { payloads } => to_json_binary(&query_simulate(deps, payloads)?),
    }
}

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        local_chain_id: config.local_chain_id,
        endpoint: config.endpoint.to_string(),
        token: config.token.to_string(),
        mode: config.mode,
        local_decimals: config.local_decimals,
        shared_decimals: config.shared_decimals,
        fee_owner: config.fee_owner.to_string(),
        default_fee_bp: config.default_fee_bp,
    })
}

pub fn query_fee_bp(deps: Deps, chain_id: u32) -> StdResult<FeeBpResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(FeeBpResponse {
        fee_bp: effective_fee_bp(deps, &config, chain_id)?,
    })
}

pub fn query_ledger(deps: Deps) -> StdResult<LedgerResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(LedgerResponse {
        mode: config.mode,
        locked: LOCKED.load(deps.storage)?,
        supply: SUPPLY.load(deps.storage)?,
    })
}

pub fn query_failed_calls(deps: Deps) -> StdResult<FailedCallsResponse> {
    let calls = FAILED_CALLS
        .range(deps.storage, None, None, Order::Ascending)
        .map(|item| {
            let (seq, record) = item?;
            Ok(FailedCall {
                seq,
                src_chain_id: record.src_chain_id,
                recipient: record.recipient.to_string(),
                amount: record.amount,
                msg: record.msg,
                reason: record.reason,
            })
        })
        .collect::<StdResult<Vec<_>>>()?;
    Ok(FailedCallsResponse { calls })
}

pub fn query_quote_fee(
    deps: Deps,
    dst_chain_id: u32,
    amount: Uint128,
) -> StdResult<QuoteFeeResponse> {
    let config = CONFIG.load(deps.storage)?;
    let fee_bp = effective_fee_bp(deps, &config, dst_chain_id)?;
    let rate = conversion_rate(config.local_decimals, config.shared_decimals);
    let breakdown = break_down_send(amount, fee_bp, rate)
        .map_err(|err| StdError::generic_err(err.to_string()))?;

    let packet = Packet::Transfer {
        to: H256::zero(),
        amount: breakdown.wire_amount,
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

/// Read-only precrime hook: the ledger this chain would hold after the
/// candidate inbound payloads were credited, in shared units.
pub fn query_simulate(deps: Deps, payloads: Vec<Binary>) -> StdResult<SimulateResponse> {
    let config = CONFIG.load(deps.storage)?;
    let rate = conversion_rate(config.local_decimals, config.shared_decimals);

    let mut inbound = vec![];
    for payload in &payloads {
        let packet = match Packet::read_from(&mut payload.as_slice()) {
            Ok(packet) => packet,
            Err(err) => {
                return Ok(SimulateResponse {
                    ok: false,
                    reason: Some(format!("undecodable payload: {}", err)),
                    ledger: None,
                })
            }
        };
        match packet {
            Packet::Transfer { amount, .. } | Packet::TransferWithCall { amount, .. } => {
                inbound.push(amount)
            }
            // no fungible delta
            Packet::BatchTransfer { .. } => {}
        }
    }

    let ledger = ChainLedger {
        chain_id: config.local_chain_id,
        mode: config.mode,
        locked: LOCKED.load(deps.storage)? / rate,
        supply: SUPPLY.load(deps.storage)? / rate,
    };

    match precrime::apply_inbound(ledger, &inbound) {
        Ok(ledger) => Ok(SimulateResponse {
            ok: true,
            reason: None,
            ledger: Some(ledger),
        }),
        Err(err) => Ok(SimulateResponse {
            ok: false,
            reason: Some(err.to_string()),
            ledger: None,
        }),
    }
}
