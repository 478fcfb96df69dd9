use cosmwasm_std::{Binary, Deps, DepsMut, Event, Response, StdResult, Storage};

use crate::error::ContractError;
use crate::state::{QueuedDelivery, StoredPayload, NEXT_NONCE, QUEUES, STORED_PAYLOADS};
use common::channel::{
    ExpectedNonceResponse, HasStoredPayloadResponse, QueueLengthResponse, StoredPayloadInfo,
    StoredPayloadResponse,
};
use common::{keccak_hash, Decode, Packet};

/// Upper bound on queued entries applied per retry/force-resume call.
/// Draining is best effort; anything past the budget stays queued.
pub const QUEUE_DRAIN_BUDGET: usize = 16;

/// Application callback supplied by the embedding contract.
///
/// A handler must not persist partial state before returning an error:
/// the channel converts handler failures into a stored payload instead of
/// aborting the transaction, so writes made before the failure would
/// survive. Validate and compute first, save last.
pub type PacketHandler = fn(DepsMut, u32, &Packet) -> Result<Response, ContractError>;

pub fn expected_nonce(storage: &dyn Storage, src_chain_id: u32) -> StdResult<u64> {
    Ok(NEXT_NONCE.may_load(storage, src_chain_id)?.unwrap_or(1))
}

/// Admit an inbound delivery from the transport.
///
/// The source is authenticated against the path registry before anything
/// else; failing that check is fatal and leaves no trace. An admitted
/// delivery is either applied, stored on application failure, or queued
/// behind an existing stored payload.
pub fn try_receive(
    deps: DepsMut,
    src_chain_id: u32,
    src_address: &Binary,
    nonce: u64,
    payload: Binary,
    handler: PacketHandler,
) -> Result<Response, ContractError> {
    path_registry::assert_trusted_remote(deps.as_ref(), src_chain_id, src_address.as_slice())?;

    let expected = expected_nonce(deps.storage, src_chain_id)?;
    if nonce != expected {
        return Err(ContractError::UnexpectedNonce {
            chain_id: src_chain_id,
            expected,
            got: nonce,
        });
    }
    NEXT_NONCE.save(deps.storage, src_chain_id, &(expected + 1))?;

    if STORED_PAYLOADS.has(deps.storage, src_chain_id) {
        let mut queue = QUEUES
            .may_load(deps.storage, src_chain_id)?
            .unwrap_or_default();
        queue.push_back(QueuedDelivery { nonce, payload });
        QUEUES.save(deps.storage, src_chain_id, &queue)?;

        return Ok(Response::new().add_event(
            Event::new("PacketQueued")
                .add_attribute("src_chain_id", src_chain_id.to_string())
                .add_attribute("nonce", nonce.to_string())
                .add_attribute("queue_length", queue.len().to_string()),
        ));
    }

    apply_or_store(deps, src_chain_id, nonce, payload, handler)
}

/// Re-attempt the stored payload with the caller-supplied bytes. The
/// bytes must hash to the stored fingerprint; a mismatch is fatal and
/// leaves the path blocked. Success clears the payload and drains the
/// queue in arrival order.
pub fn try_retry_payload(
    mut deps: DepsMut,
    src_chain_id: u32,
    src_address: &Binary,
    payload: Binary,
    handler: PacketHandler,
) -> Result<Response, ContractError> {
    path_registry::assert_trusted_remote(deps.as_ref(), src_chain_id, src_address.as_slice())?;

    let stored = STORED_PAYLOADS
        .may_load(deps.storage, src_chain_id)?
        .ok_or(ContractError::NotBlocked {
            chain_id: src_chain_id,
        })?;

    if keccak_hash(payload.as_slice()) != stored.payload_hash {
        return Err(ContractError::PayloadHashMismatch {
            chain_id: src_chain_id,
        });
    }

    // A failing re-attempt propagates and reverts, leaving the path blocked
    let resp = apply(deps.branch(), src_chain_id, &payload, handler)?;
    STORED_PAYLOADS.remove(deps.storage, src_chain_id);

    let resp = resp.add_event(
        Event::new("PayloadRetried")
            .add_attribute("src_chain_id", src_chain_id.to_string())
            .add_attribute("nonce", stored.nonce.to_string()),
    );
    drain_queue(deps, src_chain_id, resp, handler)
}

/// Administrative override: discard the stored payload without applying
/// it. The skipped message's effects are permanently lost, which is why
/// this emits a different event than a successful retry. The queue is
/// drained afterwards exactly as on retry success.
pub fn try_force_resume(
    deps: DepsMut,
    src_chain_id: u32,
    handler: PacketHandler,
) -> Result<Response, ContractError> {
    let stored = STORED_PAYLOADS
        .may_load(deps.storage, src_chain_id)?
        .ok_or(ContractError::NotBlocked {
            chain_id: src_chain_id,
        })?;

    STORED_PAYLOADS.remove(deps.storage, src_chain_id);

    let resp = Response::new().add_event(
        Event::new("PayloadDiscarded")
            .add_attribute("src_chain_id", src_chain_id.to_string())
            .add_attribute("nonce", stored.nonce.to_string())
            .add_attribute("payload_hash", format!("{:?}", stored.payload_hash)),
    );
    drain_queue(deps, src_chain_id, resp, handler)
}

fn apply_or_store(
    mut deps: DepsMut,
    src_chain_id: u32,
    nonce: u64,
    payload: Binary,
    handler: PacketHandler,
) -> Result<Response, ContractError> {
    match apply(deps.branch(), src_chain_id, &payload, handler) {
        Ok(resp) => Ok(resp.add_event(delivered_event(src_chain_id, nonce))),
        Err(err) => {
            let stored = StoredPayload {
                nonce,
                payload_hash: keccak_hash(payload.as_slice()),
                payload,
            };
            STORED_PAYLOADS.save(deps.storage, src_chain_id, &stored)?;

            Ok(Response::new().add_event(
                Event::new("PayloadStored")
                    .add_attribute("src_chain_id", src_chain_id.to_string())
                    .add_attribute("nonce", nonce.to_string())
                    .add_attribute("payload_hash", format!("{:?}", stored.payload_hash))
                    .add_attribute("reason", err.to_string()),
            ))
        }
    }
}

fn apply(
    deps: DepsMut,
    src_chain_id: u32,
    payload: &Binary,
    handler: PacketHandler,
) -> Result<Response, ContractError> {
    let packet =
        Packet::read_from(&mut payload.as_slice()).map_err(|err| ContractError::Application {
            reason: err.to_string(),
        })?;
    handler(deps, src_chain_id, &packet)
}

fn drain_queue(
    mut deps: DepsMut,
    src_chain_id: u32,
    mut resp: Response,
    handler: PacketHandler,
) -> Result<Response, ContractError> {
    let mut queue = QUEUES
        .may_load(deps.storage, src_chain_id)?
        .unwrap_or_default();

    let mut drained = 0usize;
    while drained < QUEUE_DRAIN_BUDGET {
        let entry = match queue.pop_front() {
            Some(entry) => entry,
            None => break,
        };

        match apply(deps.branch(), src_chain_id, &entry.payload, handler) {
            Ok(applied) => {
                resp = merge_responses(resp, applied)
                    .add_event(delivered_event(src_chain_id, entry.nonce));
                drained += 1;
            }
            Err(err) => {
                let stored = StoredPayload {
                    nonce: entry.nonce,
                    payload_hash: keccak_hash(entry.payload.as_slice()),
                    payload: entry.payload,
                };
                STORED_PAYLOADS.save(deps.storage, src_chain_id, &stored)?;

                resp = resp.add_event(
                    Event::new("PayloadStored")
                        .add_attribute("src_chain_id", src_chain_id.to_string())
                        .add_attribute("nonce", stored.nonce.to_string())
                        .add_attribute("payload_hash", format!("{:?}", stored.payload_hash))
                        .add_attribute("reason", err.to_string()),
                );
                break;
            }
        }
    }

    if queue.is_empty() {
        QUEUES.remove(deps.storage, src_chain_id);
    } else {
        QUEUES.save(deps.storage, src_chain_id, &queue)?;
    }

    Ok(resp)
}

fn delivered_event(src_chain_id: u32, nonce: u64) -> Event {
    Event::new("PacketDelivered")
        .add_attribute("src_chain_id", src_chain_id.to_string())
        .add_attribute("nonce", nonce.to_string())
}

fn merge_responses(mut base: Response, other: Response) -> Response {
    base.messages.extend(other.messages);
    base.attributes.extend(other.attributes);
    base.events.extend(other.events);
    base
}

pub fn query_expected_nonce(deps: Deps, src_chain_id: u32) -> StdResult<ExpectedNonceResponse> {
    Ok(ExpectedNonceResponse {
        expected_nonce: expected_nonce(deps.storage, src_chain_id)?,
    })
}

pub fn query_has_stored_payload(
    deps: Deps,
    src_chain_id: u32,
) -> StdResult<HasStoredPayloadResponse> {
    Ok(HasStoredPayloadResponse {
        has_stored_payload: STORED_PAYLOADS.has(deps.storage, src_chain_id),
    })
}

pub fn query_stored_payload(deps: Deps, src_chain_id: u32) -> StdResult<StoredPayloadResponse> {
    let stored = STORED_PAYLOADS
        .may_load(deps.storage, src_chain_id)?
        .map(|stored| StoredPayloadInfo {
            nonce: stored.nonce,
            payload_hash: stored.payload_hash,
            payload: stored.payload,
        });
    Ok(StoredPayloadResponse { stored })
}

pub fn query_queue_length(deps: Deps, src_chain_id: u32) -> StdResult<QueueLengthResponse> {
    let length = QUEUES
        .may_load(deps.storage, src_chain_id)?
        .map_or(0, |queue| queue.len());
    Ok(QueueLengthResponse { length })
}
