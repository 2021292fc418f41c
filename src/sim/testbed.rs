//! 测床配置（JSON）
//!
//! 运行参数的序列化描述：拓扑尺寸、时长、负载、平均流大小等。所有字段
//! 可省略，省略时取 CONGA 测床默认值。

use crate::queue::QueueKind;
use crate::route::{CoreSelect, RandomCore, SrcModCore};
use crate::topo::LeafSpineOpts;
use serde::{Deserialize, Serialize};

use super::flow_gen::SizeDist;
use super::time::SimTime;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestbedSpec {
    pub schema_version: u32,
    #[serde(default)]
    pub topology: Option<TopologyParams>,
    #[serde(default)]
    pub duration_s: Option<f64>,
    /// 目标负载：leaf 链路容量的占比，(0, 1]。
    #[serde(default)]
    pub load: Option<f64>,
    #[serde(default)]
    pub flow_size_bytes: Option<u64>,
    #[serde(default)]
    pub size_dist: Option<SizeDist>,
    #[serde(default)]
    pub core_select: Option<CoreSelectMode>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl TestbedSpec {
    pub fn duration_s(&self) -> f64 {
        self.duration_s.unwrap_or(10.0)
    }

    pub fn load(&self) -> f64 {
        self.load.unwrap_or(0.7)
    }

    pub fn flow_size_bytes(&self) -> u64 {
        self.flow_size_bytes.unwrap_or(100_000)
    }

    pub fn size_dist(&self) -> SizeDist {
        self.size_dist.unwrap_or(SizeDist::Exponential)
    }

    pub fn core_select(&self) -> CoreSelectMode {
        self.core_select.unwrap_or(CoreSelectMode::Random)
    }

    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(1)
    }

    pub fn topo_opts(&self) -> LeafSpineOpts {
        match &self.topology {
            Some(t) => t.to_opts(),
            None => LeafSpineOpts::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopologyParams {
    #[serde(default)]
    pub core_count: Option<usize>,
    #[serde(default)]
    pub leaf_count: Option<usize>,
    #[serde(default)]
    pub servers_per_leaf: Option<usize>,
    #[serde(default)]
    pub leaf_link_gbps: Option<u64>,
    #[serde(default)]
    pub core_link_gbps: Option<u64>,
    #[serde(default)]
    pub leaf_buffer_bytes: Option<u64>,
    #[serde(default)]
    pub core_buffer_bytes: Option<u64>,
    #[serde(default)]
    pub endpoint_buffer_bytes: Option<u64>,
    #[serde(default)]
    pub hop_delay_us: Option<u64>,
    #[serde(default)]
    pub queue_kind: Option<QueueKind>,
}

impl TopologyParams {
    /// 合并到默认配置上。
    pub fn to_opts(&self) -> LeafSpineOpts {
        let d = LeafSpineOpts::default();
        let gbps = |g: u64| g.saturating_mul(1_000_000_000);
        LeafSpineOpts {
            core_count: self.core_count.unwrap_or(d.core_count),
            leaf_count: self.leaf_count.unwrap_or(d.leaf_count),
            servers_per_leaf: self.servers_per_leaf.unwrap_or(d.servers_per_leaf),
            leaf_link_bps: self.leaf_link_gbps.map(gbps).unwrap_or(d.leaf_link_bps),
            core_link_bps: self.core_link_gbps.map(gbps).unwrap_or(d.core_link_bps),
            leaf_buffer_bytes: self.leaf_buffer_bytes.unwrap_or(d.leaf_buffer_bytes),
            core_buffer_bytes: self.core_buffer_bytes.unwrap_or(d.core_buffer_bytes),
            endpoint_buffer_bytes: self
                .endpoint_buffer_bytes
                .unwrap_or(d.endpoint_buffer_bytes),
            hop_delay: self
                .hop_delay_us
                .map(SimTime::from_micros)
                .unwrap_or(d.hop_delay),
            queue_kind: self.queue_kind.unwrap_or(d.queue_kind),
        }
    }
}

/// core 选择策略的配置名。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoreSelectMode {
    Random,
    SrcMod,
}

impl CoreSelectMode {
    pub fn build(self, seed: u64) -> Box<dyn CoreSelect> {
        match self {
            CoreSelectMode::Random => Box::new(RandomCore::new(seed)),
            CoreSelectMode::SrcMod => Box::new(SrcModCore),
        }
    }
}
