//! 可用性聚合器
//!
//! 维护按域名累计的成功/总数计数器，计算累计可用性百分比

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 单个域名的累计统计
///
/// 两个计数器在进程生命周期内只增不减，从不重置。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomainStats {
    /// 归一化域名
    pub domain: String,
    /// 累计成功次数
    pub successes: u64,
    /// 累计探测总数
    pub total: u64,
}

impl DomainStats {
    /// 创建空统计
    fn new(domain: String) -> Self {
        Self {
            domain,
            successes: 0,
            total: 0,
        }
    }

    /// 记录一次探测结果
    fn record(&mut self, success: bool) {
        self.total += 1;
        if success {
            self.successes += 1;
        }
    }

    /// 计算累计可用性百分比
    ///
    /// # 返回
    /// * `u32` - round(100 × successes / total)，范围[0, 100]
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.successes as f64 / self.total as f64) * 100.0).round() as u32
    }
}

/// 周期报告中的单个域名条目
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomainReport {
    /// 归一化域名
    pub domain: String,
    /// 累计可用性百分比
    pub percentage: u32,
    /// 累计成功次数
    pub successes: u64,
    /// 累计探测总数
    pub total: u64,
}

/// 可用性聚合器
///
/// 纯逻辑单元：更新和报告都不做任何I/O，日志输出由监控循环负责。
/// 报告顺序为域名首次出现的顺序，保证跨周期稳定。
#[derive(Debug, Default)]
pub struct AvailabilityAggregator {
    /// 域名 → 累计统计
    stats: HashMap<String, DomainStats>,
    /// 域名首次出现顺序
    order: Vec<String>,
}

impl AvailabilityAggregator {
    /// 创建空聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次探测结果
    ///
    /// 总数总是加一，成功数仅在成功时加一。O(1)，可无限累计。
    ///
    /// # 参数
    /// * `domain` - 归一化域名
    /// * `success` - 本次探测是否成功
    pub fn update(&mut self, domain: &str, success: bool) {
        let stats = self.stats.entry(domain.to_string()).or_insert_with(|| {
            self.order.push(domain.to_string());
            DomainStats::new(domain.to_string())
        });

        stats.record(success);
    }

    /// 查询某个域名的累计可用性百分比
    ///
    /// # 参数
    /// * `domain` - 归一化域名
    ///
    /// # 返回
    /// * `Option<u32>` - 百分比；域名从未被探测时为None
    pub fn percentage(&self, domain: &str) -> Option<u32> {
        self.stats.get(domain).map(DomainStats::percentage)
    }

    /// 查询某个域名的累计统计
    pub fn stats(&self, domain: &str) -> Option<&DomainStats> {
        self.stats.get(domain)
    }

    /// 生成本周期报告
    ///
    /// 每个至少被探测过一次的域名对应一条记录，按首次出现顺序排列。
    ///
    /// # 返回
    /// * `Vec<DomainReport>` - 报告条目列表
    pub fn report(&self) -> Vec<DomainReport> {
        self.order
            .iter()
            .filter_map(|domain| self.stats.get(domain))
            .map(|stats| DomainReport {
                domain: stats.domain.clone(),
                percentage: stats.percentage(),
                successes: stats.successes,
                total: stats.total,
            })
            .collect()
    }

    /// 已记录的域名数量
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// 是否尚未记录任何域名
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}
