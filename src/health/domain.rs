//! 域名归一化
//!
//! 从端点URL提取聚合键：去掉端口、协议和路径后的小写主机名

use crate::error::ProbeError;
use reqwest::Url;

/// 归一化端点URL的域名
///
/// 只差端口的两个URL会归一化为同一个聚合键。
///
/// # 参数
/// * `url` - 端点URL
///
/// # 返回
/// * `Result<String, ProbeError>` - 小写的无端口主机名或`InvalidUrl`错误
pub fn normalize_domain(url: &str) -> Result<String, ProbeError> {
    let parsed = Url::parse(url).map_err(|_| ProbeError::InvalidUrl {
        url: url.to_string(),
    })?;

    let host = parsed.host_str().ok_or_else(|| ProbeError::InvalidUrl {
        url: url.to_string(),
    })?;

    Ok(host.to_ascii_lowercase())
}
