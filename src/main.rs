// ==========================================
// 库存看板系统 - 命令行入口
// ==========================================
// 职责: 解析命令行参数，调用看板 API，结果以 JSON 输出到 stdout
// ==========================================

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use wika_stock_dashboard::app::{get_default_db_path, AppState};
use wika_stock_dashboard::{logging, Bucket, ChartCollector};

#[derive(Parser)]
#[command(
    name = "wika-stock-dashboard",
    version,
    about = "库存工作簿分桶与图表数据生成"
)]
struct Cli {
    /// 数据库路径（默认: WIKA_DASHBOARD_DB_PATH 或用户数据目录）
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// 以 JSON 格式输出日志
    #[arg(long, global = true)]
    json_log: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 上传工作簿，分桶并输出全部图表数据
    Analyze(FileArgs),

    /// 预览工作表前几行
    Preview(FileArgs),

    /// 列出工作簿中的工作表
    Sheets {
        file: PathBuf,
    },

    /// 输出某个桶的图表数据（读取已保存的数据）
    Charts {
        /// 桶名，例如 ok / titipan-murni
        bucket: Bucket,
    },

    /// 列出各桶记录数
    Buckets,

    /// 清空已保存的数据
    Reset,

    /// 查看或修改配置
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args)]
struct FileArgs {
    /// .xlsx / .xls / .csv 文件
    file: PathBuf,

    /// 工作表名（默认使用配置 required_sheet，未配置时取第一个）
    #[arg(long, short = 's')]
    sheet: Option<String>,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// 显示全部配置
    Show,

    /// 设置配置项
    Set { key: String, value: String },
}

#[derive(Serialize)]
struct AnalyzeOutput {
    summary: wika_stock_dashboard::UploadSummary,
    charts: ChartCollector,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.json_log {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!(
        "{} v{}",
        wika_stock_dashboard::APP_NAME,
        wika_stock_dashboard::VERSION
    );

    let db_path = match cli.db {
        Some(path) => path.to_string_lossy().to_string(),
        None => get_default_db_path(),
    };
    tracing::info!("使用数据库: {}", db_path);

    let state = AppState::new(db_path).await.map_err(anyhow::Error::msg)?;
    let api = state.dashboard_api.clone();

    match cli.command {
        Command::Analyze(args) => {
            let mut charts = ChartCollector::default();
            let summary = api
                .analyze_file(&args.file, args.sheet.as_deref(), &mut charts)
                .await?;
            print_json(&AnalyzeOutput { summary, charts })?;
        }
        Command::Preview(args) => {
            let preview = api.preview(&args.file, args.sheet.as_deref()).await?;
            eprintln!("{}", preview.caption());
            print_json(&preview)?;
        }
        Command::Sheets { file } => {
            print_json(&api.list_sheets(&file)?)?;
        }
        Command::Charts { bucket } => {
            print_json(&api.bucket_charts(bucket).await?)?;
        }
        Command::Buckets => {
            print_json(&api.list_buckets()?)?;
        }
        Command::Reset => {
            if let Some(warning) = api.reset()? {
                tracing::warn!("{}", warning);
            }
        }
        Command::Config(ConfigCommand::Show) => {
            let snapshot = state
                .config
                .get_config_snapshot()
                .map_err(|e| anyhow!("读取配置失败: {}", e))?;
            print_json(&snapshot)?;
        }
        Command::Config(ConfigCommand::Set { key, value }) => {
            state
                .config
                .set_global_config_value(&key, &value)
                .map_err(|e| anyhow!("写入配置失败: {}", e))?;
            tracing::info!(key = %key, "配置已更新");
        }
    }

    Ok(())
}
