//! 监控循环模块
//!
//! 以固定节拍驱动探测周期：每个周期探测全部端点、更新聚合器并输出
//! 累计可用性报告。周期起点锚定在壁钟时间上，探测耗时不会造成漂移。

use crate::config::EndpointConfig;
use crate::error::{MonitorError, Result};
use crate::health::aggregator::AvailabilityAggregator;
use crate::health::prober::Prober;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{sleep_until, Instant};
use tracing::{info, warn};

/// 默认检测周期（秒）
pub const DEFAULT_MONITOR_INTERVAL_SECS: u64 = 15;

/// 监控循环所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorPhase {
    /// 未启动
    Idle,
    /// 周期运行中
    Cycling,
    /// 已停止（终态）
    Stopped,
}

/// 监控循环
///
/// 独占持有聚合器状态；探测并发执行，结果由循环串行写入聚合器，
/// 计数器无需加锁。
pub struct Monitor {
    /// 端点配置列表
    endpoints: Vec<EndpointConfig>,
    /// 检测周期
    interval: Duration,
    /// 探测器
    prober: Arc<dyn Prober>,
    /// 可用性聚合器
    aggregator: AvailabilityAggregator,
    /// 当前阶段
    phase: MonitorPhase,
}

impl Monitor {
    /// 创建新的监控循环
    ///
    /// # 参数
    /// * `endpoints` - 端点配置列表
    /// * `interval` - 检测周期
    /// * `prober` - 探测器
    ///
    /// # 返回
    /// * `Self` - 监控循环实例，处于`Idle`阶段
    pub fn new(endpoints: Vec<EndpointConfig>, interval: Duration, prober: Arc<dyn Prober>) -> Self {
        Self {
            endpoints,
            interval,
            prober,
            aggregator: AvailabilityAggregator::new(),
            phase: MonitorPhase::Idle,
        }
    }

    /// 获取当前阶段
    pub fn phase(&self) -> MonitorPhase {
        self.phase
    }

    /// 获取聚合器的只读引用
    pub fn aggregator(&self) -> &AvailabilityAggregator {
        &self.aggregator
    }

    /// 执行一个完整的检测周期
    ///
    /// 并发探测全部端点，串行写入聚合器，然后输出累计报告。
    /// 单个端点的失败只体现为该域名的一次失败计数，不会中断周期。
    pub async fn run_cycle(&mut self) {
        let results = self.prober.probe_all(&self.endpoints).await;

        for result in results {
            if result.is_up() {
                info!(
                    "端点 '{}' 状态 {} (状态码: {}, 耗时: {}ms)",
                    result.endpoint_name,
                    result.status,
                    result.status_code.unwrap_or_default(),
                    result.elapsed_ms()
                );
            } else {
                warn!(
                    "端点 '{}' 状态 {} ({})",
                    result.endpoint_name,
                    result.status,
                    result
                        .error_message
                        .as_deref()
                        .unwrap_or("未知原因")
                );
            }

            self.aggregator.update(&result.domain, result.is_up());
        }

        for entry in self.aggregator.report() {
            info!(
                "{} has {}% availability percentage",
                entry.domain, entry.percentage
            );
        }

        info!("---");
    }

    /// 启动监控循环，直到收到关闭信号
    ///
    /// 每个周期的起点为`上一周期起点 + interval`：处理耗时小于周期时
    /// 补足剩余睡眠；处理耗时超过周期时立即开始下一周期，不跳过也不
    /// 补跑。收到关闭信号时放弃在途探测，进入`Stopped`终态。
    ///
    /// # 参数
    /// * `shutdown` - 关闭信号接收器
    ///
    /// # 返回
    /// * `Result<()>` - 启动失败时返回致命错误
    pub async fn run(&mut self, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
        if self.endpoints.is_empty() {
            return Err(MonitorError::NoEndpoints.into());
        }

        if self.interval.is_zero() {
            return Err(MonitorError::InvalidInterval { seconds: 0 }.into());
        }

        self.phase = MonitorPhase::Cycling;
        info!(
            "监控循环启动，端点数量: {}，检测周期: {}秒",
            self.endpoints.len(),
            self.interval.as_secs()
        );

        loop {
            let cycle_start = Instant::now();

            tokio::select! {
                _ = shutdown.recv() => break,
                _ = self.run_cycle() => {}
            }

            // 下一周期起点 = 本周期起点 + interval；超时的deadline会立即返回
            let next_cycle = cycle_start + self.interval;

            tokio::select! {
                _ = shutdown.recv() => break,
                _ = sleep_until(next_cycle) => {}
            }
        }

        self.phase = MonitorPhase::Stopped;
        info!("监控循环已停止");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::result::{ProbeResult, ProbeStatus};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// 固定结果的测试探测器，记录每次批量探测的开始时刻
    struct StubProber {
        /// 每次probe_all返回的状态序列，循环使用
        outcomes: Vec<bool>,
        /// 模拟的处理耗时
        delay: Duration,
        /// 每次批量探测的开始时刻
        cycle_starts: Mutex<Vec<Instant>>,
        /// 已执行的批量探测次数
        calls: Mutex<usize>,
    }

    impl StubProber {
        fn new(outcomes: Vec<bool>, delay: Duration) -> Self {
            Self {
                outcomes,
                delay,
                cycle_starts: Mutex::new(Vec::new()),
                calls: Mutex::new(0),
            }
        }

        fn starts(&self) -> Vec<Instant> {
            self.cycle_starts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Prober for StubProber {
        async fn probe(&self, endpoint: &EndpointConfig) -> ProbeResult {
            let call = {
                let calls = self.calls.lock().unwrap();
                *calls
            };
            let up = self.outcomes[call % self.outcomes.len()];

            ProbeResult::new(
                endpoint.name.clone(),
                endpoint.url.clone(),
                "example.com".to_string(),
                if up { ProbeStatus::Up } else { ProbeStatus::Down },
            )
        }

        async fn probe_all(&self, endpoints: &[EndpointConfig]) -> Vec<ProbeResult> {
            self.cycle_starts.lock().unwrap().push(Instant::now());

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let mut results = Vec::with_capacity(endpoints.len());
            for endpoint in endpoints {
                results.push(self.probe(endpoint).await);
            }

            *self.calls.lock().unwrap() += 1;
            results
        }
    }

    fn create_test_endpoint() -> EndpointConfig {
        EndpointConfig {
            name: "Test Endpoint".to_string(),
            url: "https://example.com/health".to_string(),
            method: "GET".to_string(),
            headers: HashMap::new(),
            body: None,
        }
    }

    #[tokio::test]
    async fn test_monitor_starts_idle() {
        let prober = Arc::new(StubProber::new(vec![true], Duration::ZERO));
        let monitor = Monitor::new(
            vec![create_test_endpoint()],
            Duration::from_secs(15),
            prober,
        );

        assert_eq!(monitor.phase(), MonitorPhase::Idle);
        assert!(monitor.aggregator().is_empty());
    }

    #[tokio::test]
    async fn test_empty_endpoints_is_fatal() {
        let prober = Arc::new(StubProber::new(vec![true], Duration::ZERO));
        let mut monitor = Monitor::new(Vec::new(), Duration::from_secs(15), prober);

        let (_tx, rx) = broadcast::channel(1);
        let result = monitor.run(rx).await;

        assert!(result.is_err());
        assert_eq!(monitor.phase(), MonitorPhase::Idle);
    }

    #[tokio::test]
    async fn test_zero_interval_is_fatal() {
        let prober = Arc::new(StubProber::new(vec![true], Duration::ZERO));
        let mut monitor = Monitor::new(vec![create_test_endpoint()], Duration::ZERO, prober);

        let (_tx, rx) = broadcast::channel(1);
        let result = monitor.run(rx).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_run_cycle_updates_aggregator() {
        let prober = Arc::new(StubProber::new(vec![true], Duration::ZERO));
        let mut monitor = Monitor::new(
            vec![create_test_endpoint()],
            Duration::from_secs(15),
            prober,
        );

        monitor.run_cycle().await;
        monitor.run_cycle().await;

        let stats = monitor.aggregator().stats("example.com").unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.successes, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_cadence_compensates_processing_time() {
        // 处理耗时100毫秒，周期1秒：周期起点间隔应为1秒而不是1.1秒
        let prober = Arc::new(StubProber::new(vec![true], Duration::from_millis(100)));
        let mut monitor = Monitor::new(
            vec![create_test_endpoint()],
            Duration::from_secs(1),
            Arc::clone(&prober) as Arc<dyn Prober>,
        );

        let (tx, rx) = broadcast::channel(1);
        let handle = tokio::spawn(async move {
            let _ = monitor.run(rx).await;
            monitor
        });

        // 留出3个完整周期的时间
        tokio::time::sleep(Duration::from_millis(3050)).await;
        tx.send(()).unwrap();
        let monitor = handle.await.unwrap();

        let starts = prober.starts();
        assert!(starts.len() >= 3, "应至少完成3个周期，实际: {}", starts.len());

        for window in starts.windows(2) {
            let gap = window[1] - window[0];
            assert_eq!(gap, Duration::from_secs(1), "周期起点间隔应恰为1秒");
        }

        assert_eq!(monitor.phase(), MonitorPhase::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_cadence_overrun_starts_immediately() {
        // 处理耗时1.5秒，周期1秒：下一周期应立即开始，不跳过也不补跑
        let prober = Arc::new(StubProber::new(vec![true], Duration::from_millis(1500)));
        let mut monitor = Monitor::new(
            vec![create_test_endpoint()],
            Duration::from_secs(1),
            Arc::clone(&prober) as Arc<dyn Prober>,
        );

        let (tx, rx) = broadcast::channel(1);
        let handle = tokio::spawn(async move {
            let _ = monitor.run(rx).await;
            monitor
        });

        tokio::time::sleep(Duration::from_millis(4600)).await;
        tx.send(()).unwrap();
        let monitor = handle.await.unwrap();

        let starts = prober.starts();
        // 起点应为 0ms, 1500ms, 3000ms, 4500ms：间隔等于处理耗时，无补跑
        assert_eq!(starts.len(), 4, "4.6秒内应恰好开始4个周期");

        for window in starts.windows(2) {
            let gap = window[1] - window[0];
            assert_eq!(gap, Duration::from_millis(1500));
        }

        let stats = monitor.aggregator().stats("example.com").unwrap();
        assert_eq!(stats.total, 3, "第4个周期被关闭信号中断，不应计数");
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_abandons_inflight_cycle() {
        // 周期处理需要10秒，但在第1秒就发出关闭信号
        let prober = Arc::new(StubProber::new(vec![true], Duration::from_secs(10)));
        let mut monitor = Monitor::new(
            vec![create_test_endpoint()],
            Duration::from_secs(15),
            Arc::clone(&prober) as Arc<dyn Prober>,
        );

        let (tx, rx) = broadcast::channel(1);
        let handle = tokio::spawn(async move {
            let _ = monitor.run(rx).await;
            monitor
        });

        tokio::time::sleep(Duration::from_secs(1)).await;
        tx.send(()).unwrap();
        let monitor = handle.await.unwrap();

        assert_eq!(monitor.phase(), MonitorPhase::Stopped);
        // 在途周期被放弃，聚合器不应有任何残留更新
        assert!(monitor.aggregator().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_alternating_endpoint_reaches_fifty_percent() {
        let prober = Arc::new(StubProber::new(
            vec![true, false],
            Duration::ZERO,
        ));
        let mut monitor = Monitor::new(
            vec![create_test_endpoint()],
            Duration::from_secs(1),
            Arc::clone(&prober) as Arc<dyn Prober>,
        );

        for _ in 0..10 {
            monitor.run_cycle().await;
        }

        assert_eq!(monitor.aggregator().percentage("example.com"), Some(50));
    }
}
