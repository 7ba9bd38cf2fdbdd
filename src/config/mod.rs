use std::fs;
use std::path::PathBuf;

use thiserror::Error;

pub mod types;

pub use types::*;

use self::types as cfg;

// 未给 --config 时按顺序探测的路径。
const DEFAULT_CONFIG_PATHS: &[&str] = &["collection.toml", "config/collection.toml"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("指定的配置文件不存在: {0}")]
    Missing(PathBuf),
    #[error("读取配置文件失败 {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("解析配置文件失败 {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl cfg::CollectionConfig {
    /// 显式给出的路径必须存在；未给出时探测默认路径，
    /// 一个都不存在就落回内建默认值。
    pub fn load(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) if p.exists() => p,
            Some(p) => return Err(ConfigError::Missing(p)),
            None => {
                match DEFAULT_CONFIG_PATHS
                    .iter()
                    .map(PathBuf::from)
                    .find(|candidate| candidate.exists())
                {
                    Some(p) => p,
                    None => return Ok(Self::default()),
                }
            }
        };

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })
    }
}

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_algod_url() -> String {
    "http://localhost:4001".to_string()
}

// algod 沙盒默认令牌（64 个 'a'）。
pub(crate) fn default_algod_token() -> String {
    "a".repeat(64)
}

pub(crate) fn default_owner_fragment() -> String {
    "./ac1.frag".to_string()
}

pub(crate) fn default_minter_fragment() -> String {
    "./ac2.frag".to_string()
}

pub(crate) fn default_app_id_fragment() -> String {
    "./app.frag".to_string()
}

pub(crate) fn default_asset_name() -> String {
    "latinum".to_string()
}

pub(crate) fn default_asset_url() -> String {
    "https://path/to/my/asset/details".to_string()
}

pub(crate) fn default_metadata_hash() -> String {
    "x".repeat(32)
}

pub(crate) fn default_slot_index() -> u32 {
    64511
}

pub(crate) fn default_max_wait_rounds() -> u64 {
    24
}

// 主网出块约 3 秒一轮。
pub(crate) fn default_round_wait_ms() -> u64 {
    3_000
}

pub(crate) fn default_ledger_path() -> String {
    "./slots.json".to_string()
}

pub(crate) fn default_goal_bin() -> String {
    "goal".to_string()
}

pub(crate) fn default_node_data_dir() -> String {
    "./net1/primary".to_string()
}

pub(crate) fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for cfg::CollectionConfig {
    fn default() -> Self {
        Self {
            node: cfg::NodeConfig::default(),
            accounts: cfg::AccountsConfig::default(),
            asset: cfg::AssetConfig::default(),
            confirmation: cfg::ConfirmationConfig::default(),
            ledger: cfg::LedgerConfig::default(),
            diagnostic: cfg::DiagnosticConfig::default(),
            logging: cfg::LoggingConfig::default(),
        }
    }
}

impl Default for cfg::NodeConfig {
    fn default() -> Self {
        Self {
            url: default_algod_url(),
            token: default_algod_token(),
        }
    }
}

impl Default for cfg::AccountsConfig {
    fn default() -> Self {
        Self {
            owner_fragment: default_owner_fragment(),
            minter_fragment: default_minter_fragment(),
            app_id_fragment: default_app_id_fragment(),
        }
    }
}

impl Default for cfg::AssetConfig {
    fn default() -> Self {
        Self {
            name: default_asset_name(),
            url: default_asset_url(),
            metadata_hash: default_metadata_hash(),
            slot_index: default_slot_index(),
            padding_width: 0,
        }
    }
}

impl Default for cfg::ConfirmationConfig {
    fn default() -> Self {
        Self {
            max_wait_rounds: default_max_wait_rounds(),
            round_wait_ms: default_round_wait_ms(),
        }
    }
}

impl Default for cfg::LedgerConfig {
    fn default() -> Self {
        Self {
            path: default_ledger_path(),
        }
    }
}

impl Default for cfg::DiagnosticConfig {
    fn default() -> Self {
        Self {
            enable: true,
            goal_bin: default_goal_bin(),
            data_dir: default_node_data_dir(),
        }
    }
}

impl Default for cfg::LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_logging_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn explicit_missing_path_is_rejected() {
        let path = PathBuf::from("/nonexistent/collection.toml");
        let err = CollectionConfig::load(Some(path.clone())).expect_err("must fail");
        assert!(matches!(err, ConfigError::Missing(p) if p == path));
    }

    #[test]
    fn malformed_file_reports_parse_error_with_path() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"[asset\nslot_index = 1").expect("write");
        let err = CollectionConfig::load(Some(file.path().to_path_buf())).expect_err("must fail");
        match err {
            ConfigError::Parse { path, .. } => assert_eq!(path, file.path()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"[confirmation]\nmax_wait_rounds = 4\n")
            .expect("write");
        let config =
            CollectionConfig::load(Some(file.path().to_path_buf())).expect("load config");
        assert_eq!(config.confirmation.max_wait_rounds, 4);
        assert_eq!(config.confirmation.round_wait_ms, 3_000);
    }
}
