use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "collection", version, about = "Algorand 集合资产铸造工具")]
pub struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "配置文件路径（默认查找 collection.toml 或 config/collection.toml）"
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 创建一枚集合资产，并在集合合约中预留对应槽位
    #[command(name = "create-asset")]
    CreateAsset(CreateAssetCmd),
    /// 读取集合应用的全局状态（只读诊断）
    #[command(name = "app-state")]
    AppState,
    /// 初始化配置模板文件
    Init(InitCmd),
}

#[derive(Args, Debug)]
pub struct CreateAssetCmd {
    #[arg(long, help = "槽位索引，缺省使用配置中的 asset.slot_index")]
    pub slot: Option<u32>,
    #[arg(long, help = "忽略本地槽位账本中的已有记录，强制重新提交")]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct InitCmd {
    #[arg(long, value_name = "DIR", help = "可选输出目录（默认当前目录）")]
    pub output: Option<PathBuf>,
    #[arg(long, help = "若文件存在则覆盖")]
    pub force: bool,
}
