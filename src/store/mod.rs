use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("读取应用 ID 文件失败 {path}: {source}")]
    AppIdIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("解码应用 ID 失败 {path}: {source}")]
    AppIdDecode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("读取槽位账本失败 {path}: {source}")]
    LedgerIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("解析槽位账本失败 {path}: {source}")]
    LedgerDecode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("写入槽位账本失败 {path}: {source}")]
    LedgerWrite {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("编码槽位账本失败: {0}")]
    LedgerEncode(serde_json::Error),
}

/// 读取部署时持久化的应用 ID（JSON 编码的无符号整数），每次运行只读一次。
pub fn read_app_id(path: impl AsRef<Path>) -> Result<u64, StoreError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| StoreError::AppIdIo {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(contents.trim()).map_err(|source| StoreError::AppIdDecode {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Pending,
    Confirmed,
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotStatus::Pending => f.write_str("pending"),
            SlotStatus::Confirmed => f.write_str("confirmed"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotRecord {
    pub status: SlotStatus,
    pub tx_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_round: Option<u64>,
}

/// 本地槽位账本：提交前登记 pending、确认后升级 confirmed。
/// 只防本机盲目重跑，槽位在集合内的唯一性仍由合约裁决。
pub struct SlotLedger {
    path: PathBuf,
    slots: BTreeMap<u32, SlotRecord>,
}

impl SlotLedger {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Ok(Self {
                path,
                slots: BTreeMap::new(),
            });
        }

        let contents = fs::read_to_string(&path).map_err(|source| StoreError::LedgerIo {
            path: path.clone(),
            source,
        })?;
        let slots = serde_json::from_str(&contents).map_err(|source| StoreError::LedgerDecode {
            path: path.clone(),
            source,
        })?;

        Ok(Self { path, slots })
    }

    pub fn get(&self, slot: u32) -> Option<&SlotRecord> {
        self.slots.get(&slot)
    }

    pub fn mark_pending(&mut self, slot: u32, tx_id: &str) -> Result<(), StoreError> {
        self.slots.insert(
            slot,
            SlotRecord {
                status: SlotStatus::Pending,
                tx_id: tx_id.to_string(),
                asset_id: None,
                confirmed_round: None,
            },
        );
        self.persist()
    }

    pub fn mark_confirmed(
        &mut self,
        slot: u32,
        asset_id: Option<u64>,
        confirmed_round: Option<u64>,
    ) -> Result<(), StoreError> {
        if let Some(record) = self.slots.get_mut(&slot) {
            record.status = SlotStatus::Confirmed;
            record.asset_id = asset_id;
            record.confirmed_round = confirmed_round;
        }
        self.persist()
    }

    // 先写临时文件再原子换名，避免中断留下半个账本。
    fn persist(&self) -> Result<(), StoreError> {
        let encoded =
            serde_json::to_string_pretty(&self.slots).map_err(StoreError::LedgerEncode)?;

        let mut tmp_path = self.path.clone().into_os_string();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        fs::write(&tmp_path, encoded).map_err(|source| StoreError::LedgerWrite {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| StoreError::LedgerWrite {
            path: self.path.clone(),
            source,
        })
    }
}
