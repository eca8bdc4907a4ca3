//! 历史值写入命令行：按小时 / 班次 / 生产日把测点值写入 tag_data。
//!
//! 触发时机由外部调度（cron、systemd timer）决定，每次调用执行一个批次。

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use domain::WindowKind;
use hist_config::{AppConfig, TagSetFile, UserConfig};
use hist_period::{HourPolicy, SiteClock, preview};
use hist_pipeline::{OrchestratorConfig, PipelineError, WriteOrchestrator};
use hist_source::{JsonFileReader, WorkerValueSource};
use hist_storage::{PgTagDataStore, TagDataStore, connect_pool, detect_schema, ping};
use hist_telemetry::init_tracing;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "hist-writer")]
#[command(about = "Write hour / shift / day tag values into tag_data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one batch for a window kind (hour, shift or day)
    Write {
        kind: WindowKind,
        /// Only use items of this tag set
        #[arg(long)]
        set: Option<String>,
        /// Site-local time to resolve the window for, "YYYY-MM-DD HH:MM"
        #[arg(long, value_parser = parse_local)]
        at: Option<NaiveDateTime>,
    },
    /// Show how the current settings resolve each window
    Preview {
        #[arg(long, value_parser = parse_local)]
        at: Option<NaiveDateTime>,
    },
    /// Check the database and report the target table layout
    Ping,
}

fn parse_local(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value.trim(), "%Y-%m-%d %H:%M")
        .map_err(|err| format!("expected \"YYYY-MM-DD HH:MM\": {}", err))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    let clock = SiteClock::from_zone_id(&config.time_zone);
    let hour_policy: HourPolicy = config.hour_policy.parse()?;
    // 生产日与班次配置（缺失时写出默认配置）
    let user_config = UserConfig::load_or_default(&config.user_config_path())?;

    match cli.command {
        Commands::Preview { at } => {
            let local = at.unwrap_or_else(|| clock.now_local());
            if clock.is_system_local() {
                println!("time zone:       {} (HIST_TIME_ZONE not recognised)", clock.zone_name());
            } else {
                println!("time zone:       {}", clock.zone_name());
            }
            println!("{}", preview(local, &user_config.period, hour_policy));
        }
        Commands::Ping => {
            let pool = connect_pool(config.require_database_url()?).await?;
            ping(&pool).await?;
            let store = PgTagDataStore::new(pool, &config.table_schema, &config.table_name);
            let columns = store.table_columns().await?;
            let kind = detect_schema(&columns)?;
            println!(
                "{}.{}: {:?} layout ({} columns)",
                config.table_schema,
                config.table_name,
                kind,
                columns.len()
            );
        }
        Commands::Write { kind, set, at } => {
            let sets = TagSetFile::load_or_default(&config.sets_path())?;
            let requests = sets.requests_for(kind, set.as_deref());
            if requests.is_empty() {
                warn!(target: "hist.writer", "no enabled items for {} windows", kind);
                println!("ok=0 skip=0 fail=0");
                return Ok(());
            }

            let store = PgTagDataStore::connect(
                config.require_database_url()?,
                &config.table_schema,
                &config.table_name,
            )
            .await?;
            // 测点读取在专用线程上串行执行
            let source = WorkerValueSource::spawn(
                "hist-reader",
                JsonFileReader::new(&config.readings_file),
            )?;
            let orchestrator = WriteOrchestrator::new(
                Arc::new(source),
                Arc::new(store),
                OrchestratorConfig {
                    read_timeout: Duration::from_millis(config.read_timeout_ms),
                    hour_policy,
                    source_label: config.source_label.clone(),
                },
            );

            let local = at.unwrap_or_else(|| clock.now_local());
            info!(
                target: "hist.writer",
                "writing {} batch at {} ({})",
                kind,
                local.format("%Y-%m-%d %H:%M"),
                clock.zone_name()
            );
            match orchestrator
                .run_batch(&user_config.period, kind, &requests, local)
                .await
            {
                Ok(summary) => {
                    println!("ok={} skip={} fail={}", summary.ok, summary.skip, summary.fail);
                }
                Err(PipelineError::ConnectionLost { partial, source }) => {
                    error!(target: "hist.writer", "batch aborted: {}", source);
                    println!(
                        "ok={} skip={} fail={} (aborted)",
                        partial.ok, partial.skip, partial.fail
                    );
                    return Err(source.into());
                }
                Err(err) => {
                    error!(target: "hist.writer", "batch aborted: {}", err);
                    return Err(err.into());
                }
            }
        }
    }
    Ok(())
}
