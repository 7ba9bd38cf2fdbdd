use algonaut::transaction::error::TransactionError;
use thiserror::Error;

use crate::account::AccountError;
use crate::client::ClientError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum MintError {
    #[error("账户加载失败: {0}")]
    Account(#[from] AccountError),
    #[error("本地存储访问失败: {0}")]
    Store(#[from] StoreError),
    #[error("构建或签名交易失败: {0}")]
    Build(#[from] TransactionError),
    #[error("编码已签名交易失败: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("节点交互失败: {0}")]
    Node(#[from] ClientError),
    #[error("元数据哈希须为 32 字节，实际 {0} 字节")]
    MetadataHashLength(usize),
    #[error("槽位 {slot} 已有 {status} 记录（交易 {tx_id}），重复提交请加 --force")]
    SlotAlreadyUsed {
        slot: u32,
        status: String,
        tx_id: String,
    },
    #[error("确认结果中缺少新资产 ID")]
    MissingAssetIndex,
}
