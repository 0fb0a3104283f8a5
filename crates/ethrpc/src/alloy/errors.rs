use alloy::{contract::Error as ContractError, transports::RpcError};

/// Tells failures of the node apart from reverts of the called contract.
fn is_node_failure(err: &ContractError) -> bool {
    match err {
        // Some nodes report reverts as error responses, those carry revert data.
        ContractError::TransportError(RpcError::ErrorResp(payload)) => {
            payload.as_revert_data().is_none()
        }
        ContractError::TransportError(_) => true,
        _ => false,
    }
}

/// Attaches the name of the failed call to a contract result.
pub trait ContractResultExt<T> {
    fn call_context(self, call: &str) -> anyhow::Result<T>;
}

impl<T> ContractResultExt<T> for Result<T, ContractError> {
    fn call_context(self, call: &str) -> anyhow::Result<T> {
        self.map_err(|err| {
            let origin = if is_node_failure(&err) {
                "node"
            } else {
                "contract"
            };
            tracing::debug!(?err, call, origin, "contract call failed");
            anyhow::Error::from(err).context(format!("{origin} error during {call}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use {super::*, alloy::rpc::json_rpc::ErrorPayload};

    #[test]
    fn names_failure_origin() {
        let node = ContractError::TransportError(RpcError::ErrorResp(
            ErrorPayload::internal_error(),
        ));
        assert!(is_node_failure(&node));
        let err = Err::<(), _>(node).call_context("balanceOf").unwrap_err();
        assert!(format!("{err:#}").contains("node error during balanceOf"));

        let revert = ContractError::NotADeploymentTransaction;
        assert!(!is_node_failure(&revert));
        let err = Err::<(), _>(revert).call_context("approve").unwrap_err();
        assert!(format!("{err:#}").contains("contract error during approve"));
    }
}
