use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use crate::config::DiagnosticConfig;

#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("启动诊断命令失败: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("诊断命令退出码 {code:?}: {stderr}")]
    Failed {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

/// 通过 shell 跑一条只读命令，返回其标准输出。
/// 输出只透传、不解析。
pub async fn run_shell(command: &str) -> Result<String, ExecuteError> {
    let output = Command::new("sh").arg("-c").arg(command).output().await?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if !output.status.success() {
        return Err(ExecuteError::Failed {
            code: output.status.code(),
            stdout,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(stdout)
}

/// 读取集合应用的全局状态（`goal app read`）。
pub async fn goal_app_read(config: &DiagnosticConfig, app_id: u64) -> Result<String, ExecuteError> {
    let command = format!(
        "{} app read -d {} --app-id {} --guess-format --global",
        config.goal_bin, config.data_dir, app_id
    );
    debug!(target: "execute", command = %command, "running app state dump");
    run_shell(&command).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout_on_success() {
        let out = run_shell("echo state-dump").await.expect("run");
        assert_eq!(out, "state-dump\n");
    }

    #[tokio::test]
    async fn nonzero_exit_reports_code_and_streams() {
        let err = run_shell("echo partial; echo broken >&2; exit 3")
            .await
            .expect_err("must fail");
        match err {
            ExecuteError::Failed {
                code,
                stdout,
                stderr,
            } => {
                assert_eq!(code, Some(3));
                assert_eq!(stdout, "partial\n");
                assert_eq!(stderr, "broken\n");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
