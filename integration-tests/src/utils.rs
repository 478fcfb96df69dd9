use cosmwasm_std::{Addr, Binary, Uint128};
use cw_multi_test::{App, AppResponse, Executor};
use ethers_core::types::H256;

use common::token_bridge::{LedgerResponse, QueryMsg as TokenBridgeQueryMsg, SendMsg};
use common::{addr_to_h256, BridgeMode};
use test_utils::{
    cw20_balance, instantiate_cw20, instantiate_mock_endpoint, instantiate_token_bridge, mock_app,
    remote_of, Relayer,
};

pub(crate) const CHAIN_A: u32 = 1;
pub(crate) const CHAIN_B: u32 = 2;

pub(crate) const LOCAL_DECIMALS: u8 = 18;
pub(crate) const SHARED_DECIMALS: u8 = 6;

/// One whole token at local precision
pub(crate) const ONE: u128 = 1_000_000_000_000_000_000;
/// One whole token at wire precision
pub(crate) const ONE_WIRE: u128 = 1_000_000;

/// Two fungible bridge instances wired back to back: chain A holds the
/// canonical token and locks, chain B mints a wrapped representation.
pub(crate) struct FungibleNet {
    pub app: App,
    pub owner: Addr,
    pub user: Addr,
    pub recipient: Addr,
    pub fee_owner: Addr,
    pub endpoint_a: Addr,
    pub endpoint_b: Addr,
    pub token_a: Addr,
    pub token_b: Addr,
    pub bridge_a: Addr,
    pub bridge_b: Addr,
    pub relay_ab: Relayer,
    pub relay_ba: Relayer,
}

impl FungibleNet {
    pub fn new(user_balance: u128) -> Self {
        let mut app = mock_app();
        let owner = Addr::unchecked("owner");
        let user = Addr::unchecked("user");
        let recipient = Addr::unchecked("recipient");
        let fee_owner = Addr::unchecked("fees");

        let endpoint_a = instantiate_mock_endpoint(&mut app, &owner);
        let endpoint_b = instantiate_mock_endpoint(&mut app, &owner);

        let token_a = instantiate_cw20(
            &mut app,
            &owner,
            &owner,
            LOCAL_DECIMALS,
            &[(&user, user_balance)],
        );
        let bridge_a = instantiate_token_bridge(
            &mut app,
            &owner,
            &common::token_bridge::InstantiateMsg {
                local_chain_id: CHAIN_A,
                endpoint: endpoint_a.to_string(),
                token: token_a.to_string(),
                mode: BridgeMode::Locker,
                local_decimals: LOCAL_DECIMALS,
                shared_decimals: SHARED_DECIMALS,
                fee_owner: fee_owner.to_string(),
                default_fee_bp: 0,
            },
        );

        let token_b = instantiate_cw20(&mut app, &owner, &owner, LOCAL_DECIMALS, &[]);
        let bridge_b = instantiate_token_bridge(
            &mut app,
            &owner,
            &common::token_bridge::InstantiateMsg {
                local_chain_id: CHAIN_B,
                endpoint: endpoint_b.to_string(),
                token: token_b.to_string(),
                mode: BridgeMode::Minter,
                local_decimals: LOCAL_DECIMALS,
                shared_decimals: SHARED_DECIMALS,
                fee_owner: fee_owner.to_string(),
                default_fee_bp: 0,
            },
        );

        // hand the wrapped token's mint authority to its bridge
        app.execute_contract(
            owner.clone(),
            token_b.clone(),
            &cw20::Cw20ExecuteMsg::UpdateMinter {
                new_minter: Some(bridge_b.to_string()),
            },
            &[],
        )
        .unwrap();

        set_trusted_remote(&mut app, &owner, &bridge_a, CHAIN_B, remote_of(&bridge_b));
        set_trusted_remote(&mut app, &owner, &bridge_b, CHAIN_A, remote_of(&bridge_a));

        FungibleNet {
            app,
            owner,
            user,
            recipient,
            fee_owner,
            endpoint_a,
            endpoint_b,
            token_a,
            token_b,
            bridge_a,
            bridge_b,
            relay_ab: Relayer::new(CHAIN_A),
            relay_ba: Relayer::new(CHAIN_B),
        }
    }

    /// User sends canonical tokens from chain A toward `recipient` on B
    pub fn send_a_to_b(
        &mut self,
        amount: u128,
        min_amount_out: Option<u128>,
        call: Option<Binary>,
    ) -> anyhow::Result<AppResponse> {
        let send = SendMsg {
            dst_chain_id: CHAIN_B,
            recipient: wire(&self.recipient),
            min_amount_out: min_amount_out.map(Uint128::from),
            call,
        };
        self.app.execute_contract(
            self.user.clone(),
            self.token_a.clone(),
            &cw20::Cw20ExecuteMsg::Send {
                contract: self.bridge_a.to_string(),
                amount: Uint128::from(amount),
                msg: cosmwasm_std::to_json_binary(&send).unwrap(),
            },
            &[],
        )
    }

    /// Recipient sends wrapped tokens from chain B back toward `user` on A
    pub fn send_b_to_a(&mut self, amount: u128) -> anyhow::Result<AppResponse> {
        let send = SendMsg {
            dst_chain_id: CHAIN_A,
            recipient: wire(&self.user),
            min_amount_out: None,
            call: None,
        };
        self.app.execute_contract(
            self.recipient.clone(),
            self.token_b.clone(),
            &cw20::Cw20ExecuteMsg::Send {
                contract: self.bridge_b.to_string(),
                amount: Uint128::from(amount),
                msg: cosmwasm_std::to_json_binary(&send).unwrap(),
            },
            &[],
        )
    }

    pub fn relay_a_to_b(&mut self) -> Vec<AppResponse> {
        self.relay_ab.relay(
            &mut self.app,
            &self.endpoint_a,
            &self.endpoint_b,
            &self.bridge_b,
        )
    }

    pub fn relay_b_to_a(&mut self) -> Vec<AppResponse> {
        self.relay_ba.relay(
            &mut self.app,
            &self.endpoint_b,
            &self.endpoint_a,
            &self.bridge_a,
        )
    }

    pub fn ledger_a(&self) -> LedgerResponse {
        ledger(&self.app, &self.bridge_a)
    }

    pub fn ledger_b(&self) -> LedgerResponse {
        ledger(&self.app, &self.bridge_b)
    }

    pub fn balance_a(&self, account: &Addr) -> u128 {
        cw20_balance(&self.app, &self.token_a, account).u128()
    }

    pub fn balance_b(&self, account: &Addr) -> u128 {
        cw20_balance(&self.app, &self.token_b, account).u128()
    }
}

pub(crate) fn set_trusted_remote(
    app: &mut App,
    owner: &Addr,
    bridge: &Addr,
    chain_id: u32,
    remote: Binary,
) {
    app.execute_contract(
        owner.clone(),
        bridge.clone(),
        &common::token_bridge::ExecuteMsg::SetTrustedRemote { chain_id, remote },
        &[],
    )
    .unwrap();
}

pub(crate) fn ledger(app: &App, bridge: &Addr) -> LedgerResponse {
    app.wrap()
        .query_wasm_smart(bridge, &TokenBridgeQueryMsg::Ledger {})
        .unwrap()
}

pub(crate) fn wire(addr: &Addr) -> H256 {
    addr_to_h256(addr).unwrap()
}
