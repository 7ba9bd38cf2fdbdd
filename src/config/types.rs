use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    #[serde(default)]
    pub node: NodeConfig,
    #[serde(default)]
    pub accounts: AccountsConfig,
    #[serde(default)]
    pub asset: AssetConfig,
    #[serde(default)]
    pub confirmation: ConfirmationConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub diagnostic: DiagnosticConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    #[serde(default = "super::default_algod_url")]
    pub url: String,
    #[serde(default = "super::default_algod_token")]
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountsConfig {
    /// 合约所有者账户片段，签署应用调用交易。
    #[serde(default = "super::default_owner_fragment")]
    pub owner_fragment: String,
    /// 铸造者账户片段，签署资产创建交易。
    #[serde(default = "super::default_minter_fragment")]
    pub minter_fragment: String,
    /// 已部署应用 ID 的 JSON 文件。
    #[serde(default = "super::default_app_id_fragment")]
    pub app_id_fragment: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetConfig {
    #[serde(default = "super::default_asset_name")]
    pub name: String,
    #[serde(default = "super::default_asset_url")]
    pub url: String,
    /// 指向链下元数据的 32 字节承诺，按原样写入资产参数。
    #[serde(default = "super::default_metadata_hash")]
    pub metadata_hash: String,
    #[serde(default = "super::default_slot_index")]
    pub slot_index: u32,
    /// 单位名零填充宽度，0 表示不填充。
    #[serde(default)]
    pub padding_width: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmationConfig {
    #[serde(default = "super::default_max_wait_rounds")]
    pub max_wait_rounds: u64,
    #[serde(default = "super::default_round_wait_ms")]
    pub round_wait_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "super::default_ledger_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosticConfig {
    #[serde(default = "super::default_true")]
    pub enable: bool,
    #[serde(default = "super::default_goal_bin")]
    pub goal_bin: String,
    #[serde(default = "super::default_node_data_dir")]
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "super::default_logging_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_empty_document_uses_defaults() {
        let config: CollectionConfig = toml::from_str("").expect("parse toml");
        assert_eq!(config.node.url, "http://localhost:4001");
        assert_eq!(config.asset.slot_index, 64511);
        assert_eq!(config.asset.padding_width, 0);
        assert_eq!(config.confirmation.max_wait_rounds, 24);
        assert!(config.diagnostic.enable);
    }

    #[test]
    fn deserialize_partial_section_keeps_other_defaults() {
        let toml = "[asset]\nslot_index = 1\npadding_width = 5\n";
        let config: CollectionConfig = toml::from_str(toml).expect("parse toml");
        assert_eq!(config.asset.slot_index, 1);
        assert_eq!(config.asset.padding_width, 5);
        assert_eq!(config.asset.name, "latinum");
        assert_eq!(config.accounts.owner_fragment, "./ac1.frag");
        assert_eq!(config.accounts.minter_fragment, "./ac2.frag");
    }

    #[test]
    fn deserialize_logging_section() {
        let toml = "[logging]\nlevel = \"debug\"\njson = true\n";
        let config: CollectionConfig = toml::from_str(toml).expect("parse toml");
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }
}
