//! 统计信息
//!
//! 定义网络仿真统计数据结构。

/// 网络统计信息
#[derive(Debug, Default)]
pub struct Stats {
    pub delivered_pkts: u64,
    pub delivered_bytes: u64,
    pub dropped_pkts: u64,
    pub dropped_bytes: u64,
    pub generated_flows: u64,
    pub completed_flows: u64,
}
