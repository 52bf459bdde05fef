//! Endpoint Vitals 主程序入口
//!
//! HTTP端点可用性监控工具

use anyhow::{Context, Result};
use clap::Parser;
use endpoint_vitals::cli::args::Args;
use endpoint_vitals::config::{ConfigLoader, YamlConfigLoader};
use endpoint_vitals::health::{
    HttpProber, Monitor, DEFAULT_LATENCY_THRESHOLD_MS, DEFAULT_MONITOR_INTERVAL_SECS,
};
use endpoint_vitals::logging::{LogConfig, LoggingSystem};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse();

    // 初始化日志系统
    let log_config = LogConfig {
        level: args.log_level.clone().into(),
        console: true,
        json_format: false,
    };

    let _logging_system =
        LoggingSystem::setup_logging(log_config).context("初始化日志系统失败")?;

    info!("Endpoint Vitals v{} 启动", endpoint_vitals::VERSION);

    // 启动失败属于致命错误，以非零码退出
    if let Err(e) = run_monitor(&args).await {
        error!("监控启动失败: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// 加载配置并运行监控循环，直到收到关闭信号
async fn run_monitor(args: &Args) -> Result<()> {
    let loader = YamlConfigLoader::new(true);
    let endpoints = loader
        .load_from_file(&args.config)
        .await
        .context("加载配置文件失败")?;

    let interval = Duration::from_secs(args.interval.unwrap_or(DEFAULT_MONITOR_INTERVAL_SECS));
    let latency_threshold = Duration::from_millis(
        args.latency_threshold
            .unwrap_or(DEFAULT_LATENCY_THRESHOLD_MS),
    );

    // 网络超时与延迟阈值对齐，分类以实际耗时为准
    let prober = Arc::new(HttpProber::new(latency_threshold, latency_threshold)?);
    let mut monitor = Monitor::new(endpoints, interval, prober);

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("收到关闭信号，正在停止监控...");
            let _ = shutdown_tx.send(());
        }
    });

    monitor.run(shutdown_rx).await?;

    Ok(())
}
