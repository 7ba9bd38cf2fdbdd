use std::fs;
use std::path::{Path, PathBuf};

use algonaut::transaction::account::Account;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("读取账户片段失败 {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("账户片段为空: {path}")]
    Empty { path: PathBuf },
    #[error("解析账户片段失败 {path}: {reason}")]
    Mnemonic { path: PathBuf, reason: String },
}

/// 从片段文件加载账户。文件内容为 25 词助记词，允许首尾空白。
pub fn load_from_file(path: impl AsRef<Path>) -> Result<Account, AccountError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| AccountError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mnemonic = contents.trim();
    if mnemonic.is_empty() {
        return Err(AccountError::Empty {
            path: path.to_path_buf(),
        });
    }

    Account::from_mnemonic(mnemonic).map_err(|err| AccountError::Mnemonic {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}
