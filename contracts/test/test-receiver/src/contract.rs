#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult, Uint128,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::state::{PAUSED, RECEIVED};
use common::test::test_receiver::{
    ExecuteMsg, InstantiateMsg, PausedResponse, QueryMsg, ReceivedCall, ReceivedResponse,
};

const CONTRACT_NAME: &str = "crates.io:test-receiver";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    _msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    PAUSED.save(deps.storage, &false)?;
    RECEIVED.save(deps.storage, &vec![])?;

    Ok(Response::new())
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::OnTokenBridged {
            src_chain_id,
            amount,
            msg,
        } => execute_on_token_bridged(deps, src_chain_id, amount, msg),
        ExecuteMsg::SetPaused { paused } => {
            PAUSED.save(deps.storage, &paused)?;
            Ok(Response::new().add_attribute("paused", paused.to_string()))
        }
    }
}

pub fn execute_on_token_bridged(
    deps: DepsMut,
    src_chain_id: u32,
    amount: Uint128,
    msg: Binary,
) -> Result<Response, ContractError> {
    if PAUSED.load(deps.storage)? {
        return Err(ContractError::Paused {});
    }

    let mut received = RECEIVED.load(deps.storage)?;
    received.push(ReceivedCall {
        src_chain_id,
        amount,
        msg,
    });
    RECEIVED.save(deps.storage, &received)?;

    Ok(Response::new().add_attribute("action", "on_token_bridged"))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Received {} => to_json_binary(&ReceivedResponse {
            calls: RECEIVED.load(deps.storage)?,
        }),
        QueryMsg::Paused {} => to_json_binary(&PausedResponse {
            paused: PAUSED.load(deps.storage)?,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::{mock_dependencies, mock_env, mock_info};

    #[test]
    fn records_calls_until_paused() {
        let mut deps = mock_dependencies();
        instantiate(
            deps.as_mut(),
            mock_env(),
            mock_info("deployer", &[]),
            InstantiateMsg {},
        )
        .unwrap();

        execute_on_token_bridged(
            deps.as_mut(),
            2,
            Uint128::from(5u128),
            Binary::from(b"hello".as_slice()),
        )
        .unwrap();

        execute(
            deps.as_mut(),
            mock_env(),
            mock_info("anyone", &[]),
            ExecuteMsg::SetPaused { paused: true },
        )
        .unwrap();

        let err = execute_on_token_bridged(
            deps.as_mut(),
            2,
            Uint128::from(6u128),
            Binary::from(b"again".as_slice()),
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::Paused {}));

        let calls = RECEIVED.load(deps.as_ref().storage).unwrap();
        assert_eq!(1, calls.len());
        assert_eq!(Uint128::from(5u128), calls[0].amount);
    }
}
