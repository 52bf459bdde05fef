//! Endpoint Vitals - HTTP端点可用性监控工具
//!
//! 这是一个用Rust编写的HTTP端点可用性监控工具，支持：
//! - 按固定节拍探测YAML配置的端点列表
//! - 按状态码和延迟阈值分类可用/不可用
//! - 按归一化域名（忽略端口）累计可用性百分比
//! - 结构化日志记录

pub mod cli;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;

// 重新导出主要类型
pub use config::{ConfigLoader, EndpointConfig, YamlConfigLoader};
pub use error::EndpointVitalsError;
pub use health::{
    AvailabilityAggregator, HttpProber, Monitor, MonitorPhase, ProbeResult, ProbeStatus, Prober,
};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
