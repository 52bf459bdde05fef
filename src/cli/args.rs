//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Endpoint Vitals - HTTP端点可用性监控工具
#[derive(Parser, Debug, Clone)]
#[command(
    name = "endpoint-vitals",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 配置文件路径
    #[arg(
        value_name = "FILE",
        help = "YAML配置文件路径",
        env = "ENDPOINT_VITALS_CONFIG"
    )]
    pub config: PathBuf,

    /// 检测周期（秒）
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        help = "检测周期（秒），默认15秒",
        env = "ENDPOINT_VITALS_INTERVAL"
    )]
    pub interval: Option<u64>,

    /// 判定成功的延迟阈值（毫秒）
    #[arg(
        long,
        value_name = "MILLIS",
        help = "判定成功的延迟阈值（毫秒），默认500毫秒",
        env = "ENDPOINT_VITALS_LATENCY_THRESHOLD"
    )]
    pub latency_threshold: Option<u64>,

    /// 日志级别
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        help = "日志级别",
        env = "ENDPOINT_VITALS_LOG_LEVEL"
    )]
    pub log_level: LogLevel,
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_args() {
        let args = Args::try_parse_from(["endpoint-vitals", "config.yaml"]).unwrap();

        assert_eq!(args.config, PathBuf::from("config.yaml"));
        assert_eq!(args.interval, None);
        assert_eq!(args.latency_threshold, None);
        assert_eq!(args.log_level, LogLevel::Info);
    }

    #[test]
    fn test_parse_with_overrides() {
        let args = Args::try_parse_from([
            "endpoint-vitals",
            "config.yaml",
            "--interval",
            "30",
            "--latency-threshold",
            "200",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(args.interval, Some(30));
        assert_eq!(args.latency_threshold, Some(200));
        assert_eq!(args.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_config_path_is_required() {
        let result = Args::try_parse_from(["endpoint-vitals"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(LogLevel::Warn.to_string(), "warn");
    }
}
