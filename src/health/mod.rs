//! 健康探测模块
//!
//! 提供域名归一化、HTTP探测、可用性聚合和监控循环功能

pub mod aggregator;
pub mod domain;
pub mod monitor;
pub mod prober;
pub mod result;

// 重新导出主要类型
pub use aggregator::{AvailabilityAggregator, DomainReport, DomainStats};
pub use domain::normalize_domain;
pub use monitor::{Monitor, MonitorPhase, DEFAULT_MONITOR_INTERVAL_SECS};
pub use prober::{HttpProber, Prober, DEFAULT_LATENCY_THRESHOLD_MS};
pub use result::{ProbeResult, ProbeStatus};
