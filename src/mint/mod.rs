use std::time::Duration;

use algonaut::core::SuggestedTransactionParams;
use algonaut::transaction::account::Account;
use algonaut::transaction::tx_group::TxGroup;
use algonaut::transaction::builder::CallApplication;
use algonaut::transaction::{
    CreateAsset, SignedTransaction, Transaction, TxnBuilder,
};
use tracing::{debug, info, warn};

use crate::client::{self, NodeApi};
use crate::store::SlotLedger;

mod error;

pub use error::MintError;

/// 集合合约的预留入口；第二个参数是大端 4 字节槽位索引。
const RESERVE_METHOD: &[u8] = b"reserve";

// 每个槽位恰好一枚、不可分割。
const ASSET_TOTAL: u64 = 1;
const ASSET_DECIMALS: u32 = 0;

#[derive(Debug, Clone)]
pub struct MintSettings {
    pub slot_index: u32,
    pub padding_width: usize,
    pub asset_name: String,
    pub asset_url: String,
    pub metadata_hash: String,
    pub max_wait_rounds: u64,
    pub round_wait: Duration,
    pub force: bool,
}

#[derive(Debug, Clone)]
pub struct MintReceipt {
    pub slot_index: u32,
    pub unit_name: String,
    pub asset_id: u64,
    pub tx_id: String,
    pub confirmed_round: Option<u64>,
}

/// 单次铸造的全部流程：构建资产创建与槽位预留两笔交易，按序组成原子组，
/// 分别由铸造者与所有者签名，拼接提交后轮询确认。
pub struct AssetMinter<'a, N: NodeApi> {
    node: &'a N,
    owner: Account,
    minter: Account,
    app_id: u64,
    settings: MintSettings,
}

impl<'a, N: NodeApi> AssetMinter<'a, N> {
    pub fn new(
        node: &'a N,
        owner: Account,
        minter: Account,
        app_id: u64,
        settings: MintSettings,
    ) -> Self {
        Self {
            node,
            owner,
            minter,
            app_id,
            settings,
        }
    }

    pub async fn run(&self, ledger: &mut SlotLedger) -> Result<MintReceipt, MintError> {
        let slot = self.settings.slot_index;
        let unit = unit_name(slot, self.settings.padding_width);

        if let Some(record) = ledger.get(slot) {
            if self.settings.force {
                warn!(
                    target: "mint",
                    slot,
                    status = %record.status,
                    "槽位已有本地记录，--force 继续提交"
                );
            } else {
                return Err(MintError::SlotAlreadyUsed {
                    slot,
                    status: record.status.to_string(),
                    tx_id: record.tx_id.clone(),
                });
            }
        }

        let params = self.node.suggested_params().await?;
        debug!(
            target: "mint",
            slot,
            unit_name = %unit,
            first_valid = params.first_valid.0,
            last_valid = params.last_valid.0,
            "fetched suggested params"
        );

        let (create_tx, call_tx) = self.build_group(&params)?;

        // 所有者只签合约调用；资产创建由铸造者签名，铸造因此可以委托出去，
        // 不受合约对单一地址的铸造速率限制。
        let signed_create = self.minter.sign_transaction(create_tx)?;
        let signed_call = self.owner.sign_transaction(call_tx)?;

        let payload = group_payload(&signed_create, &signed_call)?;

        // 本地先落 pending 账本再提交：提交后无论确认与否，重跑都会被拦下。
        ledger.mark_pending(slot, &signed_create.transaction_id)?;

        let tx_id = self.node.submit_raw(&payload).await?;
        let pending = client::wait_for_confirmation(
            self.node,
            &tx_id,
            self.settings.max_wait_rounds,
            self.settings.round_wait,
        )
        .await?;

        let asset_id = pending.asset_index.ok_or(MintError::MissingAssetIndex)?;

        // 链上效果已成定局，账本升级失败只告警。
        if let Err(err) = ledger.mark_confirmed(slot, Some(asset_id), pending.confirmed_round) {
            warn!(
                target: "mint",
                slot,
                error = %err,
                "铸造已确认，但槽位账本升级失败"
            );
        }

        info!(
            target: "mint",
            slot,
            asset_id,
            tx_id = %tx_id,
            round = ?pending.confirmed_round,
            "asset created and slot reserved"
        );

        Ok(MintReceipt {
            slot_index: slot,
            unit_name: unit,
            asset_id,
            tx_id,
            confirmed_round: pending.confirmed_round,
        })
    }

    /// 构建 [资产创建, 应用调用] 两笔交易并写入同一组摘要。
    /// 两笔交易共享同一份建议参数，顺序即提交顺序。
    fn build_group(
        &self,
        params: &SuggestedTransactionParams,
    ) -> Result<(Transaction, Transaction), MintError> {
        let metadata_hash = self.settings.metadata_hash.clone().into_bytes();
        if metadata_hash.len() != 32 {
            return Err(MintError::MetadataHashLength(metadata_hash.len()));
        }

        // 管理、回收、冻结、没收地址一律不设置，规范编码等价于零地址：
        // 资产创建后不可再配置、不可冻结。
        let mut create_tx = TxnBuilder::with(
            params,
            CreateAsset::new(
                self.minter.address(),
                ASSET_TOTAL,
                ASSET_DECIMALS,
                false,
            )
            .unit_name(unit_name(self.settings.slot_index, self.settings.padding_width))
            .asset_name(self.settings.asset_name.clone())
            .url(self.settings.asset_url.clone())
            .meta_data_hash(metadata_hash)
            .build(),
        )
        .build()?;

        let mut call_tx = TxnBuilder::with(
            params,
            CallApplication::new(self.owner.address(), self.app_id)
                .app_arguments(vec![RESERVE_METHOD.to_vec(), slot_arg(self.settings.slot_index)])
                .build(),
        )
        .build()?;

        TxGroup::assign_group_id(&mut [&mut create_tx, &mut call_tx])?;

        Ok((create_tx, call_tx))
    }
}

/// 展示用单位名：`#` 前缀加零填充的十进制槽位索引。
pub fn unit_name(slot_index: u32, padding_width: usize) -> String {
    format!("#{slot_index:0width$}", width = padding_width)
}

/// 合约参数中的槽位索引编码：大端 4 字节。
fn slot_arg(slot_index: u32) -> Vec<u8> {
    slot_index.to_be_bytes().to_vec()
}

/// 按交易顺序拼接两笔已签名交易的规范 msgpack 字节，
/// 顺序必须与组摘要的计算顺序一致。
fn group_payload(
    first: &SignedTransaction,
    second: &SignedTransaction,
) -> Result<Vec<u8>, MintError> {
    let mut payload = rmp_serde::to_vec_named(first)?;
    payload.extend(rmp_serde::to_vec_named(second)?);
    Ok(payload)
}
