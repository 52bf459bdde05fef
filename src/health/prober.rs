//! HTTP探测器实现
//!
//! 对单个端点发起一次HTTP请求，并按状态码和延迟分类为可用/不可用

use crate::config::EndpointConfig;
use crate::error::{ProbeError, Result};
use crate::health::domain::normalize_domain;
use crate::health::result::{ProbeResult, ProbeStatus};
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tokio::time::timeout;

/// 默认延迟阈值（毫秒），超过该值的响应判定为不可用
pub const DEFAULT_LATENCY_THRESHOLD_MS: u64 = 500;

/// 探测器trait，定义探测接口
///
/// 探测永远返回`ProbeResult`而不是错误：任何只影响单个端点的故障
/// （超时、连接失败、DNS、TLS、请求体编码失败）都在这里被转换为
/// 失败结果，不会传播到监控循环。
#[async_trait]
pub trait Prober: Send + Sync {
    /// 探测单个端点
    ///
    /// # 参数
    /// * `endpoint` - 端点配置
    ///
    /// # 返回
    /// * `ProbeResult` - 探测结果
    async fn probe(&self, endpoint: &EndpointConfig) -> ProbeResult;

    /// 并发探测全部端点
    ///
    /// 各端点的超时相互独立，一个端点的超时不会拖长其他端点的探测。
    ///
    /// # 参数
    /// * `endpoints` - 端点配置列表
    ///
    /// # 返回
    /// * `Vec<ProbeResult>` - 与输入顺序一致的探测结果列表
    async fn probe_all(&self, endpoints: &[EndpointConfig]) -> Vec<ProbeResult>;
}

/// HTTP探测器实现
pub struct HttpProber {
    /// HTTP客户端
    client: Client,
    /// 网络超时时间
    request_timeout: Duration,
    /// 判定成功的延迟阈值
    latency_threshold: Duration,
}

impl HttpProber {
    /// 创建新的HTTP探测器
    ///
    /// # 参数
    /// * `request_timeout` - 网络超时时间
    /// * `latency_threshold` - 判定成功的延迟阈值
    ///
    /// # 返回
    /// * `Result<Self>` - 探测器实例
    pub fn new(request_timeout: Duration, latency_threshold: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .build()
            .map_err(ProbeError::Request)?;

        Ok(Self {
            client,
            request_timeout,
            latency_threshold,
        })
    }

    /// 使用默认阈值创建探测器
    pub fn with_defaults() -> Result<Self> {
        let threshold = Duration::from_millis(DEFAULT_LATENCY_THRESHOLD_MS);
        Self::new(threshold, threshold)
    }

    /// 构建HTTP请求
    ///
    /// # 参数
    /// * `endpoint` - 端点配置
    ///
    /// # 返回
    /// * `Result<reqwest::RequestBuilder, ProbeError>` - 请求构建器
    fn build_request(&self, endpoint: &EndpointConfig) -> std::result::Result<reqwest::RequestBuilder, ProbeError> {
        // 解析HTTP方法，缺省为GET
        let method = Method::from_str(&endpoint.method.to_uppercase()).map_err(|_| {
            ProbeError::InvalidMethod {
                method: endpoint.method.clone(),
            }
        })?;

        let mut request = self.client.request(method, &endpoint.url);

        // 添加请求头
        for (key, value) in &endpoint.headers {
            request = request.header(key, value);
        }

        // 添加请求体（如果有），编码为JSON并附带JSON内容类型
        if let Some(body) = &endpoint.body {
            let json_body = serde_json::to_value(body)
                .map_err(|e| ProbeError::BodyEncoding(e.to_string()))?;
            request = request.json(&json_body);
        }

        Ok(request)
    }

    /// 创建失败结果
    fn create_down_result(
        &self,
        endpoint: &EndpointConfig,
        domain: String,
        elapsed: Duration,
        error_message: String,
    ) -> ProbeResult {
        ProbeResult::new(
            endpoint.name.clone(),
            endpoint.url.clone(),
            domain,
            ProbeStatus::Down,
        )
        .with_elapsed(elapsed)
        .with_error(error_message)
    }

    /// 格式化请求错误信息，使其更加清晰易读
    fn format_request_error(&self, error: &reqwest::Error) -> String {
        if error.is_timeout() {
            "Request timeout".to_string()
        } else if error.is_connect() {
            "Connection refused".to_string()
        } else if error.is_request() {
            "Invalid request".to_string()
        } else {
            let error_str = error.to_string();
            if error_str.contains("dns") || error_str.contains("DNS") {
                "DNS resolution failed".to_string()
            } else if error_str.contains("certificate")
                || error_str.contains("tls")
                || error_str.contains("ssl")
            {
                "SSL/TLS certificate error".to_string()
            } else {
                format!("Request failed: {}", error_str)
            }
        }
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, endpoint: &EndpointConfig) -> ProbeResult {
        // 解析失败时以原始URL作为聚合键；配置验证通常已拦截这种情况
        let domain = match normalize_domain(&endpoint.url) {
            Ok(domain) => domain,
            Err(e) => {
                return self.create_down_result(
                    endpoint,
                    endpoint.url.clone(),
                    Duration::from_millis(0),
                    e.to_string(),
                );
            }
        };

        let request = match self.build_request(endpoint) {
            Ok(request) => request,
            Err(e) => {
                return self.create_down_result(endpoint, domain, Duration::from_millis(0), e.to_string());
            }
        };

        let start_time = Instant::now();

        // 执行请求（带独立超时）
        let response_result = timeout(self.request_timeout, request.send()).await;

        let elapsed = start_time.elapsed();

        match response_result {
            Ok(Ok(response)) => {
                let status_code = response.status().as_u16();
                let status_ok = (200..300).contains(&status_code);
                let latency_ok = elapsed <= self.latency_threshold;

                if status_ok && latency_ok {
                    ProbeResult::new(
                        endpoint.name.clone(),
                        endpoint.url.clone(),
                        domain,
                        ProbeStatus::Up,
                    )
                    .with_status_code(status_code)
                    .with_elapsed(elapsed)
                } else {
                    let reason = if !status_ok {
                        format!("HTTP {}", status_code)
                    } else {
                        format!(
                            "Response time exceeded {}ms",
                            self.latency_threshold.as_millis()
                        )
                    };

                    self.create_down_result(endpoint, domain, elapsed, reason)
                        .with_status_code(status_code)
                }
            }
            Ok(Err(e)) => {
                self.create_down_result(endpoint, domain, elapsed, self.format_request_error(&e))
            }
            Err(_) => {
                self.create_down_result(endpoint, domain, elapsed, ProbeError::Timeout.to_string())
            }
        }
    }

    async fn probe_all(&self, endpoints: &[EndpointConfig]) -> Vec<ProbeResult> {
        let futures = endpoints.iter().map(|endpoint| self.probe(endpoint));
        futures::future::join_all(futures).await
    }
}
