use cosmwasm_std::{Binary, Uint128};

use common::token_bridge::{QueryMsg, SimulateResponse};
use test_utils::sent_packets;

use crate::utils::{FungibleNet, ONE, ONE_WIRE};

fn simulate(net: &FungibleNet, bridge: &cosmwasm_std::Addr, payloads: Vec<Binary>) -> SimulateResponse {
    net.app
        .wrap()
        .query_wasm_smart(bridge, &QueryMsg::Simulate { payloads })
        .unwrap()
}

#[test]
fn in_flight_credit_reconciles_the_global_ledger() {
    let mut net = FungibleNet::new(1_000 * ONE);

    // 10 units locked on A; the credit toward B is still in flight
    net.send_a_to_b(10 * ONE, None, None).unwrap();
    let in_flight: Vec<Binary> = sent_packets(&net.app, &net.endpoint_a)
        .into_iter()
        .map(|packet| packet.payload)
        .collect();

    let ledger_a = simulate(&net, &net.bridge_a.clone(), vec![]).ledger.unwrap();
    assert_eq!(Uint128::from(10 * ONE_WIRE), ledger_a.locked);

    // raw snapshots are transiently inconsistent while the packet flies
    let ledger_b_now = simulate(&net, &net.bridge_b.clone(), vec![]).ledger.unwrap();
    let outcome = precrime::check(&[ledger_a.clone(), ledger_b_now]);
    assert!(!outcome.ok);
    assert!(outcome.reason.unwrap().contains("conservation violated"));

    // applying the in-flight credit to B's snapshot reconciles the books
    let ledger_b_settled = simulate(&net, &net.bridge_b.clone(), in_flight)
        .ledger
        .unwrap();
    let outcome = precrime::check(&[ledger_a, ledger_b_settled]);
    assert!(outcome.ok, "unexpected reason: {:?}", outcome.reason);

    // and after the real relay the raw snapshots agree again
    net.relay_a_to_b();
    let ledger_a = simulate(&net, &net.bridge_a.clone(), vec![]).ledger.unwrap();
    let ledger_b = simulate(&net, &net.bridge_b.clone(), vec![]).ledger.unwrap();
    assert!(precrime::check(&[ledger_a, ledger_b]).ok);
}

#[test]
fn double_crediting_a_packet_is_flagged() {
    let mut net = FungibleNet::new(1_000 * ONE);

    net.send_a_to_b(10 * ONE, None, None).unwrap();
    let payload = sent_packets(&net.app, &net.endpoint_a)[0].payload.clone();

    let ledger_a = simulate(&net, &net.bridge_a.clone(), vec![]).ledger.unwrap();

    // a replayed credit would mint twice against one lock
    let ledger_b_replayed = simulate(
        &net,
        &net.bridge_b.clone(),
        vec![payload.clone(), payload],
    )
    .ledger
    .unwrap();
    let outcome = precrime::check(&[ledger_a, ledger_b_replayed]);
    assert!(!outcome.ok);
    assert!(outcome.reason.unwrap().contains("conservation violated"));
}

#[test]
fn unlock_beyond_locked_balance_is_reported_not_thrown() {
    let net = FungibleNet::new(1_000 * ONE);

    // nothing locked on A yet: any inbound unlock is inconsistent
    let payload = Binary::from(common::Encode::to_vec(&common::Packet::Transfer {
        to: crate::utils::wire(&net.user.clone()),
        amount: ONE_WIRE as u64,
    }));

    let res = simulate(&net, &net.bridge_a.clone(), vec![payload]);
    assert!(!res.ok);
    assert!(res.reason.unwrap().contains("insufficient locked"));
    assert!(res.ledger.is_none());
}

#[test]
fn undecodable_candidate_payload_is_reported() {
    let net = FungibleNet::new(1_000 * ONE);

    let res = simulate(
        &net,
        &net.bridge_a.clone(),
        vec![Binary::from(vec![0xffu8; 8])],
    );
    assert!(!res.ok);
    assert!(res.reason.unwrap().contains("undecodable payload"));
}
