use cosmwasm_std::{Binary, Uint128};
use cw_multi_test::Executor;

use common::channel::{HasStoredPayloadResponse, QueueLengthResponse};
use common::token_bridge::{ExecuteMsg, QueryMsg};
use common::{Encode, Packet};
use test_utils::{app_event_by_ty, deliver_packet, remote_of, sent_packets};

use crate::utils::{wire, FungibleNet, CHAIN_A, CHAIN_B, ONE, ONE_WIRE};

fn has_stored_payload(net: &FungibleNet, bridge: &cosmwasm_std::Addr, src_chain_id: u32) -> bool {
    let resp: HasStoredPayloadResponse = net
        .app
        .wrap()
        .query_wasm_smart(bridge, &QueryMsg::HasStoredPayload { src_chain_id })
        .unwrap();
    resp.has_stored_payload
}

fn queue_length(net: &FungibleNet, bridge: &cosmwasm_std::Addr, src_chain_id: u32) -> usize {
    let resp: QueueLengthResponse = net
        .app
        .wrap()
        .query_wasm_smart(bridge, &QueryMsg::QueueLength { src_chain_id })
        .unwrap();
    resp.length
}

#[test]
fn force_resume_discards_the_blocked_nonce_and_drains_the_queue() {
    // Scenario: delivery of the first nonce fails on the destination, two
    // further sends queue behind it, the operator force-resumes
    let mut net = FungibleNet::new(1_000 * ONE);

    net.send_a_to_b(5 * ONE, None, None).unwrap();
    net.send_a_to_b(6 * ONE, None, None).unwrap();
    net.send_a_to_b(7 * ONE, None, None).unwrap();

    let packets = sent_packets(&net.app, &net.endpoint_a);
    assert_eq!(3, packets.len());

    // deliver the first packet with corrupted bytes: the application
    // attempt fails and the channel blocks
    let mut corrupted = packets[0].payload.to_vec();
    corrupted[0] = 0xff;
    let res = deliver_packet(
        &mut net.app,
        &net.endpoint_b,
        &net.bridge_b,
        CHAIN_A,
        remote_of(&net.bridge_a),
        1,
        Binary::from(corrupted),
    )
    .unwrap();
    assert!(app_event_by_ty(&res, "wasm-PayloadStored").is_some());
    assert!(has_stored_payload(&net, &net.bridge_b.clone(), CHAIN_A));

    // nonces 2 and 3 queue behind the stored payload
    for packet in &packets[1..] {
        let res = deliver_packet(
            &mut net.app,
            &net.endpoint_b,
            &net.bridge_b,
            CHAIN_A,
            remote_of(&net.bridge_a),
            packet.nonce,
            packet.payload.clone(),
        )
        .unwrap();
        assert!(app_event_by_ty(&res, "wasm-PacketQueued").is_some());
    }
    assert_eq!(2, queue_length(&net, &net.bridge_b.clone(), CHAIN_A));
    assert_eq!(0, net.balance_b(&net.recipient.clone()));

    // the operator gives up on nonce 1: its effects are lost for good,
    // nonces 2 and 3 apply in order
    let res = net
        .app
        .execute_contract(
            net.owner.clone(),
            net.bridge_b.clone(),
            &ExecuteMsg::ForceResumeReceive {
                src_chain_id: CHAIN_A,
                src_address: remote_of(&net.bridge_a),
            },
            &[],
        )
        .unwrap();
    assert!(app_event_by_ty(&res, "wasm-PayloadDiscarded").is_some());

    assert_eq!(13 * ONE, net.balance_b(&net.recipient.clone()));
    assert!(!has_stored_payload(&net, &net.bridge_b.clone(), CHAIN_A));
    assert_eq!(0, queue_length(&net, &net.bridge_b.clone(), CHAIN_A));

    // the discarded 5 units stay locked on A: the books are knowingly
    // imbalanced after an explicit data-loss override
    assert_eq!(Uint128::from(18 * ONE), net.ledger_a().locked);
    assert_eq!(Uint128::from(13 * ONE), net.ledger_b().supply);
}

#[test]
fn retry_applies_a_stored_payload_once_it_can_succeed() {
    let mut net = FungibleNet::new(1_000 * ONE);

    // chain A has 5 locked; an inbound unlock of 8 cannot be honoured yet
    net.send_a_to_b(5 * ONE, None, None).unwrap();
    net.relay_a_to_b();

    let payload = Binary::from(
        Packet::Transfer {
            to: wire(&net.user.clone()),
            amount: 8 * ONE_WIRE as u64,
        }
        .to_vec(),
    );
    let res = deliver_packet(
        &mut net.app,
        &net.endpoint_a,
        &net.bridge_a,
        CHAIN_B,
        remote_of(&net.bridge_b),
        1,
        payload.clone(),
    )
    .unwrap();
    assert!(app_event_by_ty(&res, "wasm-PayloadStored").is_some());

    // retrying with different bytes is fatal and changes nothing
    let err = net
        .app
        .execute_contract(
            net.user.clone(),
            net.bridge_a.clone(),
            &ExecuteMsg::RetryPayload {
                src_chain_id: CHAIN_B,
                src_address: remote_of(&net.bridge_b),
                payload: Binary::from(
                    Packet::Transfer {
                        to: wire(&net.user.clone()),
                        amount: ONE_WIRE as u64,
                    }
                    .to_vec(),
                ),
            },
            &[],
        )
        .unwrap_err();
    assert!(err
        .root_cause()
        .to_string()
        .contains("does not match stored payload hash"));
    assert!(has_stored_payload(&net, &net.bridge_a.clone(), CHAIN_B));

    // more liquidity arrives, the exact stored bytes now apply
    net.send_a_to_b(10 * ONE, None, None).unwrap();

    let res = net
        .app
        .execute_contract(
            net.user.clone(),
            net.bridge_a.clone(),
            &ExecuteMsg::RetryPayload {
                src_chain_id: CHAIN_B,
                src_address: remote_of(&net.bridge_b),
                payload,
            },
            &[],
        )
        .unwrap();
    assert!(app_event_by_ty(&res, "wasm-PayloadRetried").is_some());
    assert!(!has_stored_payload(&net, &net.bridge_a.clone(), CHAIN_B));

    // 15 locked in total, 8 unlocked by the retried credit
    assert_eq!(Uint128::from(7 * ONE), net.ledger_a().locked);
}

#[test]
fn out_of_order_delivery_is_rejected_outright() {
    let mut net = FungibleNet::new(1_000 * ONE);

    net.send_a_to_b(ONE, None, None).unwrap();
    net.send_a_to_b(2 * ONE, None, None).unwrap();
    let packets = sent_packets(&net.app, &net.endpoint_a);

    let err = deliver_packet(
        &mut net.app,
        &net.endpoint_b,
        &net.bridge_b,
        CHAIN_A,
        remote_of(&net.bridge_a),
        packets[1].nonce,
        packets[1].payload.clone(),
    )
    .unwrap_err();
    assert!(err.root_cause().to_string().contains("Unexpected nonce"));

    // nothing stored, nothing queued, nothing minted
    assert!(!has_stored_payload(&net, &net.bridge_b.clone(), CHAIN_A));
    assert_eq!(0, queue_length(&net, &net.bridge_b.clone(), CHAIN_A));
    assert_eq!(0, net.balance_b(&net.recipient.clone()));
}

#[test]
fn untrusted_source_is_rejected_not_stored() {
    let mut net = FungibleNet::new(1_000 * ONE);

    let payload = Binary::from(
        Packet::Transfer {
            to: wire(&net.recipient.clone()),
            amount: ONE_WIRE as u64,
        }
        .to_vec(),
    );
    let err = deliver_packet(
        &mut net.app,
        &net.endpoint_b,
        &net.bridge_b,
        CHAIN_A,
        Binary::from(b"impostor_bridge".as_slice()),
        1,
        payload,
    )
    .unwrap_err();
    assert!(err.root_cause().to_string().contains("Untrusted path"));
    assert!(!has_stored_payload(&net, &net.bridge_b.clone(), CHAIN_A));
}

#[test]
fn delivery_from_a_non_endpoint_sender_is_rejected() {
    let mut net = FungibleNet::new(1_000 * ONE);

    net.send_a_to_b(ONE, None, None).unwrap();
    let packets = sent_packets(&net.app, &net.endpoint_a);

    let impostor = cosmwasm_std::Addr::unchecked("impostor");
    let err = deliver_packet(
        &mut net.app,
        &impostor,
        &net.bridge_b,
        CHAIN_A,
        remote_of(&net.bridge_a),
        packets[0].nonce,
        packets[0].payload.clone(),
    )
    .unwrap_err();
    assert!(err
        .root_cause()
        .to_string()
        .contains("not the configured endpoint"));
}

#[test]
fn queued_entries_apply_in_arrival_order() {
    let mut net = FungibleNet::new(1_000 * ONE);

    for amount in [ONE, 2 * ONE, 3 * ONE, 4 * ONE] {
        net.send_a_to_b(amount, None, None).unwrap();
    }
    let packets = sent_packets(&net.app, &net.endpoint_a);

    // block nonce 1, queue 2..4
    let mut corrupted = packets[0].payload.to_vec();
    corrupted[0] = 0xff;
    deliver_packet(
        &mut net.app,
        &net.endpoint_b,
        &net.bridge_b,
        CHAIN_A,
        remote_of(&net.bridge_a),
        1,
        Binary::from(corrupted),
    )
    .unwrap();
    for packet in &packets[1..] {
        deliver_packet(
            &mut net.app,
            &net.endpoint_b,
            &net.bridge_b,
            CHAIN_A,
            remote_of(&net.bridge_a),
            packet.nonce,
            packet.payload.clone(),
        )
        .unwrap();
    }

    let res = net
        .app
        .execute_contract(
            net.owner.clone(),
            net.bridge_b.clone(),
            &ExecuteMsg::ForceResumeReceive {
                src_chain_id: CHAIN_A,
                src_address: remote_of(&net.bridge_a),
            },
            &[],
        )
        .unwrap();

    // delivery events appear in nonce order
    let delivered: Vec<String> = res
        .events
        .iter()
        .filter(|event| event.ty == "wasm-PacketDelivered")
        .map(|event| {
            event
                .attributes
                .iter()
                .find(|attr| attr.key == "nonce")
                .unwrap()
                .value
                .clone()
        })
        .collect();
    assert_eq!(vec!["2", "3", "4"], delivered);
    assert_eq!(9 * ONE, net.balance_b(&net.recipient.clone()));
}
