use anyhow::Result as AnyResult;
use cosmwasm_std::testing::{mock_env, MockApi, MockStorage};
use cosmwasm_std::{Addr, Binary, Empty, Event, Uint128};
use cw20::{Cw20Coin, MinterResponse};
use cw_multi_test::{App, AppBuilder, AppResponse, BankKeeper, ContractWrapper, Executor};
use serde::{Deserialize, Serialize};

use common::test::mock_endpoint::{QueryMsg as EndpointQueryMsg, SentPacket, SentPacketsResponse};

/// cw721-base execute msg with the standard empty extension
pub type Cw721BaseExecuteMsg = cw721_base::ExecuteMsg<Option<Empty>, Empty>;

pub fn mock_app() -> App {
    let env = mock_env();
    let api = MockApi::default();
    let bank = BankKeeper::new();
    let storage = MockStorage::new();

    AppBuilder::new()
        .with_api(api)
        .with_block(env.block)
        .with_bank(bank)
        .with_storage(storage)
        .build(|_, _, _| {})
}

pub fn store_token_bridge_code(app: &mut App) -> u64 {
    let contract = Box::new(
        ContractWrapper::new_with_empty(
            token_bridge::execute,
            token_bridge::instantiate,
            token_bridge::query,
        )
        .with_reply(token_bridge::reply),
    );
    app.store_code(contract)
}

pub fn store_nft_bridge_code(app: &mut App) -> u64 {
    let contract = Box::new(ContractWrapper::new_with_empty(
        nft_bridge::execute,
        nft_bridge::instantiate,
        nft_bridge::query,
    ));
    app.store_code(contract)
}

pub fn store_mock_endpoint_code(app: &mut App) -> u64 {
    let contract = Box::new(ContractWrapper::new_with_empty(
        mock_endpoint::execute,
        mock_endpoint::instantiate,
        mock_endpoint::query,
    ));
    app.store_code(contract)
}

pub fn store_test_receiver_code(app: &mut App) -> u64 {
    let contract = Box::new(ContractWrapper::new_with_empty(
        test_receiver::execute,
        test_receiver::instantiate,
        test_receiver::query,
    ));
    app.store_code(contract)
}

pub fn store_cw20_code(app: &mut App) -> u64 {
    let contract = Box::new(ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    ));
    app.store_code(contract)
}

pub fn store_cw721_code(app: &mut App) -> u64 {
    let contract = Box::new(ContractWrapper::new(
        cw721_base::entry::execute,
        cw721_base::entry::instantiate,
        cw721_base::entry::query,
    ));
    app.store_code(contract)
}

pub fn instantiate_cw20(
    app: &mut App,
    deployer: &Addr,
    minter: &Addr,
    decimals: u8,
    initial_balances: &[(&Addr, u128)],
) -> Addr {
    let code_id = store_cw20_code(app);

    let init_msg = cw20_base::msg::InstantiateMsg {
        name: "Bridged Token".to_owned(),
        symbol: "BTOK".to_owned(),
        decimals,
        initial_balances: initial_balances
            .iter()
            .map(|(addr, amount)| Cw20Coin {
                address: addr.to_string(),
                amount: Uint128::from(*amount),
            })
            .collect(),
        mint: Some(MinterResponse {
            minter: minter.to_string(),
            cap: None,
        }),
        marketing: None,
    };

    app.instantiate_contract(
        code_id,
        deployer.clone(),
        &init_msg,
        &[],
        String::from("TOKEN"),
        None,
    )
    .unwrap()
}

pub fn instantiate_cw721(app: &mut App, deployer: &Addr, minter: &Addr) -> Addr {
    let code_id = store_cw721_code(app);

    let init_msg = cw721_base::InstantiateMsg {
        name: "Bridged Collection".to_owned(),
        symbol: "BNFT".to_owned(),
        minter: minter.to_string(),
    };

    app.instantiate_contract(
        code_id,
        deployer.clone(),
        &init_msg,
        &[],
        String::from("COLLECTION"),
        None,
    )
    .unwrap()
}

pub fn instantiate_mock_endpoint(app: &mut App, deployer: &Addr) -> Addr {
    let code_id = store_mock_endpoint_code(app);

    let init_msg = common::test::mock_endpoint::InstantiateMsg {
        flat_fee: Uint128::zero(),
        fee_per_byte: Uint128::zero(),
    };

    app.instantiate_contract(
        code_id,
        deployer.clone(),
        &init_msg,
        &[],
        String::from("ENDPOINT"),
        None,
    )
    .unwrap()
}

pub fn instantiate_token_bridge(
    app: &mut App,
    owner: &Addr,
    msg: &common::token_bridge::InstantiateMsg,
) -> Addr {
    let code_id = store_token_bridge_code(app);
    app.instantiate_contract(
        code_id,
        owner.clone(),
        msg,
        &[],
        String::from("TOKEN_BRIDGE"),
        None,
    )
    .unwrap()
}

pub fn instantiate_nft_bridge(
    app: &mut App,
    owner: &Addr,
    msg: &common::nft_bridge::InstantiateMsg,
) -> Addr {
    let code_id = store_nft_bridge_code(app);
    app.instantiate_contract(
        code_id,
        owner.clone(),
        msg,
        &[],
        String::from("NFT_BRIDGE"),
        None,
    )
    .unwrap()
}

pub fn instantiate_test_receiver(app: &mut App, deployer: &Addr) -> Addr {
    let code_id = store_test_receiver_code(app);
    app.instantiate_contract(
        code_id,
        deployer.clone(),
        &common::test::test_receiver::InstantiateMsg {},
        &[],
        String::from("RECEIVER"),
        None,
    )
    .unwrap()
}

/// Raw wire identity of a local contract, as configured into the peer's
/// path registry
pub fn remote_of(addr: &Addr) -> Binary {
    Binary::from(addr.as_bytes())
}

pub fn cw20_balance(app: &App, token: &Addr, account: &Addr) -> Uint128 {
    let resp: cw20::BalanceResponse = app
        .wrap()
        .query_wasm_smart(
            token,
            &cw20::Cw20QueryMsg::Balance {
                address: account.to_string(),
            },
        )
        .unwrap();
    resp.balance
}

pub fn app_event_by_ty(res: &AppResponse, ty: &str) -> Option<Event> {
    res.events
        .iter()
        .find(|event| event.ty == ty)
        .map(|event| event.to_owned())
}

/// Delivery surface shared by both bridge applications
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
enum DeliverMsg {
    ReceivePacket {
        src_chain_id: u32,
        src_address: Binary,
        nonce: u64,
        payload: Binary,
    },
}

pub fn sent_packets(app: &App, endpoint: &Addr) -> Vec<SentPacket> {
    let resp: SentPacketsResponse = app
        .wrap()
        .query_wasm_smart(endpoint, &EndpointQueryMsg::SentPackets {})
        .unwrap();
    resp.packets
}

/// Invoke a bridge's delivery callback the way its endpoint would
pub fn deliver_packet(
    app: &mut App,
    endpoint: &Addr,
    bridge: &Addr,
    src_chain_id: u32,
    src_address: Binary,
    nonce: u64,
    payload: Binary,
) -> AnyResult<AppResponse> {
    app.execute_contract(
        endpoint.clone(),
        bridge.clone(),
        &DeliverMsg::ReceivePacket {
            src_chain_id,
            src_address,
            nonce,
            payload,
        },
        &[],
    )
}

/// Moves packets from one chain's endpoint log to the peer bridge,
/// standing in for the out-of-scope transport relay. Tracks how much of
/// the log it has already delivered.
pub struct Relayer {
    /// Chain id of the side whose endpoint log we read
    pub src_chain_id: u32,
    delivered: usize,
}

impl Relayer {
    pub fn new(src_chain_id: u32) -> Self {
        Relayer {
            src_chain_id,
            delivered: 0,
        }
    }

    /// Deliver every new packet in order; panics on a rejected delivery
    pub fn relay(
        &mut self,
        app: &mut App,
        src_endpoint: &Addr,
        dst_endpoint: &Addr,
        dst_bridge: &Addr,
    ) -> Vec<AppResponse> {
        self.try_relay(app, src_endpoint, dst_endpoint, dst_bridge)
            .into_iter()
            .map(|res| res.unwrap())
            .collect()
    }

    /// Deliver every new packet in order, returning per-packet results
    pub fn try_relay(
        &mut self,
        app: &mut App,
        src_endpoint: &Addr,
        dst_endpoint: &Addr,
        dst_bridge: &Addr,
    ) -> Vec<AnyResult<AppResponse>> {
        let packets = sent_packets(app, src_endpoint);
        let mut results = vec![];

        for packet in &packets[self.delivered..] {
            results.push(deliver_packet(
                app,
                dst_endpoint,
                dst_bridge,
                self.src_chain_id,
                remote_of(&packet.sender),
                packet.nonce,
                packet.payload.clone(),
            ));
        }
        self.delivered = packets.len();
        results
    }

    /// Skip a packet without delivering it (for loss scenarios)
    pub fn drop_next(&mut self) {
        self.delivered += 1;
    }
}
