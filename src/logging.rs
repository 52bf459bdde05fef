//! 日志系统模块
//!
//! 提供结构化日志配置和管理功能

use log::LevelFilter;
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// 全局日志初始化状态
#[derive(Debug, Default)]
struct GlobalLoggingState {
    /// 是否已初始化
    initialized: bool,
}

/// 全局日志状态管理器
static GLOBAL_LOGGING_STATE: OnceLock<Mutex<GlobalLoggingState>> = OnceLock::new();

/// 日志配置结构
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 日志级别
    pub level: LevelFilter,
    /// 是否输出到控制台
    pub console: bool,
    /// 是否使用JSON格式
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            console: true,
            json_format: false,
        }
    }
}

/// 日志系统管理器
pub struct LoggingSystem {
    /// 当前配置
    config: LogConfig,
}

impl LoggingSystem {
    /// 初始化日志系统
    ///
    /// # 参数
    /// * `config` - 日志配置
    ///
    /// # 返回
    /// * `Result<LoggingSystem, anyhow::Error>` - 初始化结果
    ///
    /// # 特性
    /// - 线程安全的单次初始化
    /// - 重复初始化时直接返回，便于测试环境复用
    pub fn setup_logging(config: LogConfig) -> anyhow::Result<Self> {
        let state_mutex =
            GLOBAL_LOGGING_STATE.get_or_init(|| Mutex::new(GlobalLoggingState::default()));

        let mut state = state_mutex
            .lock()
            .map_err(|e| anyhow::anyhow!("获取日志状态锁失败: {}", e))?;

        if state.initialized {
            return Ok(Self { config });
        }

        // 桥接log门面，使log::宏输出到同一个tracing订阅器
        tracing_log::LogTracer::init()
            .map_err(|e| anyhow::anyhow!("初始化log桥接失败: {}", e))?;

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(Self::level_directive(config.level)));

        if config.json_format {
            registry()
                .with(env_filter)
                .with(fmt::layer().json().with_ansi(false))
                .try_init()
                .map_err(|e| anyhow::anyhow!("初始化日志订阅器失败: {}", e))?;
        } else {
            registry()
                .with(env_filter)
                .with(fmt::layer().with_target(false))
                .try_init()
                .map_err(|e| anyhow::anyhow!("初始化日志订阅器失败: {}", e))?;
        }

        state.initialized = true;

        Ok(Self { config })
    }

    /// 获取当前日志配置
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// 将日志级别转换为过滤指令
    fn level_directive(level: LevelFilter) -> &'static str {
        match level {
            LevelFilter::Off => "off",
            LevelFilter::Error => "error",
            LevelFilter::Warn => "warn",
            LevelFilter::Info => "info",
            LevelFilter::Debug => "debug",
            LevelFilter::Trace => "trace",
        }
    }
}
