use std::fs;
use std::time::Duration;

use anyhow::{Result, anyhow};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

mod account;
mod cli;
mod client;
mod config;
mod execute;
mod mint;
mod store;

use cli::args::{Cli, Command, CreateAssetCmd, InitCmd};
use client::{AlgodNode, NodeApi};
use config::CollectionConfig;
use mint::{AssetMinter, MintSettings};
use store::SlotLedger;

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = CollectionConfig::load(cli.config.clone())?;
    init_tracing(&config.logging)?;

    match cli.command {
        Command::CreateAsset(args) => create_asset(args, &config).await?,
        Command::AppState => app_state(&config).await?,
        Command::Init(args) => init_configs(args)?,
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

async fn create_asset(args: CreateAssetCmd, config: &CollectionConfig) -> Result<()> {
    println!("### 为集合创建资产");

    let node = AlgodNode::new(&config.node.url, &config.node.token)
        .map_err(|err| anyhow!("初始化 algod 客户端失败 {}: {err}", config.node.url))?;

    create_asset_with_node(args, config, &node).await
}

// 账户与应用 ID 全部就位后才碰网络。
async fn create_asset_with_node(
    args: CreateAssetCmd,
    config: &CollectionConfig,
    node: &impl NodeApi,
) -> Result<()> {
    let owner = account::load_from_file(&config.accounts.owner_fragment)?;
    let minter = account::load_from_file(&config.accounts.minter_fragment)?;
    let app_id = store::read_app_id(&config.accounts.app_id_fragment)?;
    let mut ledger = SlotLedger::open(&config.ledger.path)?;

    let settings = MintSettings {
        slot_index: args.slot.unwrap_or(config.asset.slot_index),
        padding_width: config.asset.padding_width,
        asset_name: config.asset.name.clone(),
        asset_url: config.asset.url.clone(),
        metadata_hash: config.asset.metadata_hash.clone(),
        max_wait_rounds: config.confirmation.max_wait_rounds,
        round_wait: Duration::from_millis(config.confirmation.round_wait_ms),
        force: args.force,
    };

    let engine = AssetMinter::new(node, owner, minter, app_id, settings);
    let receipt = engine.run(&mut ledger).await?;

    println!(
        "资产已创建，ID: {}（单位名 {}，交易 {}）",
        receipt.asset_id, receipt.unit_name, receipt.tx_id
    );

    // 链上铸造已经完成，这一步只是事后读状态；失败降级为告警，不改变退出码。
    if config.diagnostic.enable {
        match execute::goal_app_read(&config.diagnostic, app_id).await {
            Ok(output) => {
                if !output.is_empty() {
                    println!();
                    println!("{output}");
                }
            }
            Err(err) => {
                warn!(
                    target: "diagnostic",
                    error = %err,
                    "铸造已确认，应用状态诊断失败"
                );
            }
        }
    }

    Ok(())
}

async fn app_state(config: &CollectionConfig) -> Result<()> {
    let app_id = store::read_app_id(&config.accounts.app_id_fragment)?;
    let output = execute::goal_app_read(&config.diagnostic, app_id).await?;
    print!("{output}");
    Ok(())
}

fn init_tracing(config: &config::LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.json {
        fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .init();
    } else {
        fmt().with_env_filter(filter).init();
    }
    Ok(())
}

fn init_configs(args: InitCmd) -> Result<()> {
    let output_dir = match args.output {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    fs::create_dir_all(&output_dir)?;

    let target_path = output_dir.join("collection.toml");
    if target_path.exists() && !args.force {
        println!(
            "跳过 {}（文件已存在，如需覆盖请加 --force）",
            target_path.display()
        );
        return Ok(());
    }

    fs::write(
        &target_path,
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/collection.toml")),
    )?;
    println!("已写入 {}", target_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::client::testing::MockNode;

    use super::*;

    #[tokio::test]
    async fn bad_owner_fragment_aborts_before_any_param_fetch() {
        let dir = tempfile::tempdir().expect("temp dir");
        let fragment = dir.path().join("ac1.frag");
        fs::write(&fragment, "definitely not a mnemonic").expect("write fragment");

        let mut config = CollectionConfig::default();
        config.accounts.owner_fragment = fragment.display().to_string();
        config.ledger.path = dir.path().join("slots.json").display().to_string();

        let node = MockNode::default();
        let args = CreateAssetCmd {
            slot: None,
            force: false,
        };

        let err = create_asset_with_node(args, &config, &node)
            .await
            .expect_err("must fail");
        assert!(err.to_string().contains("解析账户片段失败"));
        assert_eq!(node.param_fetch_count(), 0);
        assert_eq!(node.submission_count(), 0);
    }
}
