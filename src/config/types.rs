//! 配置数据结构定义
//!
//! 定义端点配置结构体和验证逻辑

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 支持的HTTP方法列表
const VALID_METHODS: [&str; 7] = ["GET", "POST", "PUT", "DELETE", "HEAD", "OPTIONS", "PATCH"];

/// 端点配置结构
///
/// 配置文件是一个端点列表，每项对应一个被监控的HTTP目标。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndpointConfig {
    /// 端点名称
    pub name: String,
    /// 端点URL
    pub url: String,
    /// HTTP方法
    #[serde(default = "default_method")]
    pub method: String,
    /// 请求头
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// 请求体（任意结构化值，发送时编码为JSON）
    pub body: Option<serde_yaml::Value>,
}

/// 默认HTTP方法
fn default_method() -> String {
    "GET".to_string()
}

/// 验证单个端点配置
///
/// # 参数
/// * `endpoint` - 要验证的端点
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
fn validate_endpoint(endpoint: &EndpointConfig) -> Result<(), String> {
    if endpoint.name.trim().is_empty() {
        return Err("端点名称不能为空".to_string());
    }

    if endpoint.url.trim().is_empty() {
        return Err(format!("端点 {} 的URL不能为空", endpoint.name));
    }

    if !endpoint.url.starts_with("http://") && !endpoint.url.starts_with("https://") {
        return Err(format!("端点 {} 的URL格式无效", endpoint.name));
    }

    if reqwest::Url::parse(&endpoint.url).is_err() {
        return Err(format!(
            "端点 {} 的URL无法解析: {}",
            endpoint.name, endpoint.url
        ));
    }

    let method = endpoint.method.to_uppercase();
    if !VALID_METHODS.contains(&method.as_str()) {
        return Err(format!(
            "端点 {} 的HTTP方法 {} 无效，支持的方法: {:?}",
            endpoint.name, endpoint.method, VALID_METHODS
        ));
    }

    Ok(())
}

/// 过滤并验证端点列表
///
/// 无效的端点被丢弃并记录警告，只有剩余零个可用端点时才返回错误。
///
/// # 参数
/// * `endpoints` - 原始端点列表
///
/// # 返回
/// * `Result<Vec<EndpointConfig>, String>` - 可用的端点列表或错误信息
pub fn validate_endpoints(endpoints: Vec<EndpointConfig>) -> Result<Vec<EndpointConfig>, String> {
    let mut usable = Vec::with_capacity(endpoints.len());

    for endpoint in endpoints {
        match validate_endpoint(&endpoint) {
            Ok(()) => usable.push(endpoint),
            Err(reason) => {
                log::warn!("丢弃无效的端点配置: {}", reason);
            }
        }
    }

    if usable.is_empty() {
        return Err("没有可用的端点配置".to_string());
    }

    Ok(usable)
}
