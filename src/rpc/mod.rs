use std::future::Future;

use ethers::providers::{Authorization, Http, Middleware, Provider};
use ethers::types::U256;
use url::Url;

use crate::error::RpcError;

/// Resolves the chain the connected node is serving.
pub trait NetworkIdentity {
    fn chain_id(&self) -> impl Future<Output = Result<u64, RpcError>> + Send;
}

/// A chain id known up front, e.g. from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedChain(pub u64);

impl NetworkIdentity for FixedChain {
    async fn chain_id(&self) -> Result<u64, RpcError> {
        Ok(self.0)
    }
}

impl NetworkIdentity for Provider<Http> {
    async fn chain_id(&self) -> Result<u64, RpcError> {
        let chain_id = self.get_chainid().await?;
        chain_id_to_u64(chain_id)
    }
}

/// Build an HTTP provider, with basic auth when credentials are given.
pub fn connect(rpc_url: &str, credentials: Option<(&str, &str)>) -> Result<Provider<Http>, RpcError> {
    let url = Url::parse(rpc_url)?;
    let http = match credentials {
        Some((user, pass)) => Http::new_with_auth(url, Authorization::basic(user, pass))
            .map_err(|e| RpcError::Transport(e.to_string()))?,
        None => Http::new(url),
    };
    Ok(Provider::new(http))
}

fn chain_id_to_u64(chain_id: U256) -> Result<u64, RpcError> {
    if chain_id > U256::from(u64::MAX) {
        return Err(RpcError::InvalidResult(chain_id.to_string()));
    }
    Ok(chain_id.as_u64())
}
