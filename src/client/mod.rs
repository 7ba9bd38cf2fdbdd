use std::time::Duration;

use algonaut::algod::v2::Algod;
use algonaut::core::SuggestedTransactionParams;
use algonaut::error::ServiceError;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("algod 调用失败: {0}")]
    Service(#[from] ServiceError),
    #[error("提交交易组失败 {endpoint}: {reason}")]
    Submit { endpoint: String, reason: String },
    #[error("交易被交易池拒绝: {0}")]
    PoolRejected(String),
    #[error("等待 {0} 轮后交易仍未确认")]
    ConfirmationTimeout(u64),
}

/// 待确认交易的终态摘要。
#[derive(Debug, Clone, Default)]
pub struct PendingInfo {
    pub confirmed_round: Option<u64>,
    pub pool_error: String,
    pub asset_index: Option<u64>,
}

impl PendingInfo {
    pub fn is_confirmed(&self) -> bool {
        self.confirmed_round.is_some_and(|round| round > 0)
    }
}

/// 节点侧的最小操作面：取建议参数、提交原始字节、查询待确认状态。
#[async_trait]
pub trait NodeApi {
    async fn suggested_params(&self) -> Result<SuggestedTransactionParams, ClientError>;

    /// 提交已签名的原始交易字节，返回待确认交易 ID。
    async fn submit_raw(&self, payload: &[u8]) -> Result<String, ClientError>;

    async fn pending_info(&self, tx_id: &str) -> Result<PendingInfo, ClientError>;
}

pub struct AlgodNode {
    algod: Algod,
    url: String,
}

impl AlgodNode {
    pub fn new(url: &str, token: &str) -> Result<Self, ClientError> {
        let algod = Algod::new(url, token)?;
        Ok(Self {
            algod,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl NodeApi for AlgodNode {
    async fn suggested_params(&self) -> Result<SuggestedTransactionParams, ClientError> {
        Ok(self.algod.suggested_transaction_params().await?)
    }

    async fn submit_raw(&self, payload: &[u8]) -> Result<String, ClientError> {
        let response = self
            .algod
            .broadcast_raw_transaction(payload)
            .await
            .map_err(|err| ClientError::Submit {
                endpoint: self.url.clone(),
                reason: err.to_string(),
            })?;
        info!(
            target: "client",
            tx_id = %response.tx_id,
            endpoint = %self.url,
            bytes = payload.len(),
            "transaction group submitted"
        );
        Ok(response.tx_id)
    }

    async fn pending_info(&self, tx_id: &str) -> Result<PendingInfo, ClientError> {
        let pending = self.algod.pending_transaction_with_id(tx_id).await?;
        Ok(PendingInfo {
            confirmed_round: pending.confirmed_round,
            pool_error: pending.pool_error,
            asset_index: pending.asset_index,
        })
    }
}

/// 有界轮询确认：每轮一次阻塞等待，最多 `max_wait_rounds` 轮。
/// 交易池拒绝与超时都是终态，不做任何重试。
pub async fn wait_for_confirmation(
    node: &impl NodeApi,
    tx_id: &str,
    max_wait_rounds: u64,
    round_wait: Duration,
) -> Result<PendingInfo, ClientError> {
    for round in 0..max_wait_rounds {
        let info = node.pending_info(tx_id).await?;
        if !info.pool_error.is_empty() {
            return Err(ClientError::PoolRejected(info.pool_error));
        }
        if info.is_confirmed() {
            return Ok(info);
        }
        debug!(target: "client", tx_id, waited_rounds = round + 1, "交易尚未确认，等待下一轮");
        tokio::time::sleep(round_wait).await;
    }

    Err(ClientError::ConfirmationTimeout(max_wait_rounds))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use algonaut::core::{MicroAlgos, Round};
    use algonaut::crypto::HashDigest;

    use super::*;

    pub(crate) fn test_params() -> SuggestedTransactionParams {
        SuggestedTransactionParams {
            genesis_id: "sandnet-v1".to_string(),
            genesis_hash: HashDigest([0; 32]),
            consensus_version: "future".to_string(),
            fee_per_byte: MicroAlgos(0),
            min_fee: MicroAlgos(1_000),
            first_valid: Round(1_000),
            last_valid: Round(2_000),
        }
    }

    #[derive(Default)]
    pub(crate) struct MockNode {
        pub fail_submit: bool,
        pub param_fetches: AtomicUsize,
        pub submissions: Mutex<Vec<Vec<u8>>>,
        pub pending: Mutex<VecDeque<PendingInfo>>,
        pub polls: AtomicUsize,
    }

    impl MockNode {
        pub(crate) fn with_pending(results: Vec<PendingInfo>) -> Self {
            Self {
                pending: Mutex::new(results.into()),
                ..Self::default()
            }
        }

        pub(crate) fn rejecting() -> Self {
            Self {
                fail_submit: true,
                ..Self::default()
            }
        }

        pub(crate) fn poll_count(&self) -> usize {
            self.polls.load(Ordering::SeqCst)
        }

        pub(crate) fn param_fetch_count(&self) -> usize {
            self.param_fetches.load(Ordering::SeqCst)
        }

        pub(crate) fn submission_count(&self) -> usize {
            self.submissions.lock().expect("lock").len()
        }
    }

    #[async_trait]
    impl NodeApi for MockNode {
        async fn suggested_params(&self) -> Result<SuggestedTransactionParams, ClientError> {
            self.param_fetches.fetch_add(1, Ordering::SeqCst);
            Ok(test_params())
        }

        async fn submit_raw(&self, payload: &[u8]) -> Result<String, ClientError> {
            self.submissions.lock().expect("lock").push(payload.to_vec());
            if self.fail_submit {
                return Err(ClientError::Submit {
                    endpoint: "mock://algod".to_string(),
                    reason: "node rejected the submission".to_string(),
                });
            }
            Ok("MOCKTXID".to_string())
        }

        async fn pending_info(&self, _tx_id: &str) -> Result<PendingInfo, ClientError> {
            self.polls.fetch_add(1, Ordering::SeqCst);
            let next = self.pending.lock().expect("lock").pop_front();
            Ok(next.unwrap_or_default())
        }
    }
}
