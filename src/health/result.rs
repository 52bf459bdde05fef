//! 探测结果数据结构
//!
//! 定义单次探测的结果类型和状态枚举

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// 探测状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    /// 端点可用
    Up,
    /// 端点不可用
    Down,
}

impl std::fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeStatus::Up => write!(f, "UP"),
            ProbeStatus::Down => write!(f, "DOWN"),
        }
    }
}

impl ProbeStatus {
    /// 判断状态是否为可用
    pub fn is_up(&self) -> bool {
        matches!(self, ProbeStatus::Up)
    }
}

/// 单次探测结果
///
/// 每次探测新建一个实例，由聚合器立即消费后丢弃。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    /// 探测ID
    pub id: Uuid,
    /// 端点名称
    pub endpoint_name: String,
    /// 端点URL
    pub endpoint_url: String,
    /// 聚合域名（归一化后的无端口主机名）
    pub domain: String,
    /// 探测时间戳
    pub timestamp: DateTime<Utc>,
    /// 探测状态
    pub status: ProbeStatus,
    /// HTTP状态码（传输层失败时为None）
    pub status_code: Option<u16>,
    /// 响应耗时
    #[serde(with = "duration_serde")]
    pub elapsed: Duration,
    /// 错误信息（如果有）
    pub error_message: Option<String>,
}

impl ProbeResult {
    /// 创建新的探测结果
    ///
    /// # 参数
    /// * `endpoint_name` - 端点名称
    /// * `endpoint_url` - 端点URL
    /// * `domain` - 聚合域名
    /// * `status` - 探测状态
    ///
    /// # 返回
    /// * `Self` - 探测结果实例
    pub fn new(
        endpoint_name: String,
        endpoint_url: String,
        domain: String,
        status: ProbeStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            endpoint_name,
            endpoint_url,
            domain,
            timestamp: Utc::now(),
            status,
            status_code: None,
            elapsed: Duration::from_millis(0),
            error_message: None,
        }
    }

    /// 设置HTTP状态码
    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// 设置响应耗时
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// 设置错误信息
    pub fn with_error(mut self, error_message: String) -> Self {
        self.error_message = Some(error_message);
        self
    }

    /// 获取响应耗时（毫秒）
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    /// 判断探测是否成功
    pub fn is_up(&self) -> bool {
        self.status.is_up()
    }
}

/// Duration序列化模块
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
