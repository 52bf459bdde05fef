//! 错误处理模块
//!
//! 定义应用程序的统一错误类型

use thiserror::Error;

/// Endpoint Vitals 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum EndpointVitalsError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 探测相关错误
    #[error("探测错误: {0}")]
    Probe(#[from] ProbeError),

    /// 监控循环启动错误
    #[error("监控错误: {0}")]
    Monitor(#[from] MonitorError),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON序列化/反序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 探测错误类型
///
/// 所有变体都只作用于单个端点的一次探测，在探测器边界被转换为
/// 失败的探测结果，不会中断监控循环。
#[derive(Error, Debug)]
pub enum ProbeError {
    /// HTTP请求错误
    #[error("HTTP请求失败: {0}")]
    Request(#[from] reqwest::Error),

    /// 超时错误
    #[error("请求超时")]
    Timeout,

    /// URL无法解析
    #[error("无效的URL: {url}")]
    InvalidUrl { url: String },

    /// HTTP方法无法解析
    #[error("无效的HTTP方法: {method}")]
    InvalidMethod { method: String },

    /// 请求体无法编码为JSON
    #[error("请求体编码失败: {0}")]
    BodyEncoding(String),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    /// 环境变量替换错误
    #[error("环境变量替换失败: {var}")]
    EnvVarError { var: String },
}

/// 监控循环启动错误类型
///
/// 仅在进入监控循环之前出现，属于致命错误，进程以非零码退出。
#[derive(Error, Debug)]
pub enum MonitorError {
    /// 没有可用的端点
    #[error("没有可用的端点配置")]
    NoEndpoints,

    /// 检测周期无效
    #[error("无效的检测周期: {seconds}秒")]
    InvalidInterval { seconds: u64 },
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, EndpointVitalsError>;
