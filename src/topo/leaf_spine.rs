//! Leaf-Spine（两层 leaf/core）拓扑构建
//!
//! 每个 leaf 与每个 core 之间全互联（每方向一条链路），每个 leaf 下挂
//! 固定数量的 server。默认参数取 CONGA 测床的配置。

use crate::error::ConfigError;
use crate::net::{Network, NodeId, Tier};
use crate::queue::{QueueKind, make_queue};
use crate::sim::SimTime;

/// Leaf-Spine 拓扑配置选项
#[derive(Debug, Clone)]
pub struct LeafSpineOpts {
    pub core_count: usize,
    pub leaf_count: usize,
    pub servers_per_leaf: usize,
    /// leaf 层链路速率（leaf→core 与 server 挂接都用它）。
    pub leaf_link_bps: u64,
    /// core 层链路速率（core→leaf）。
    pub core_link_bps: u64,
    pub leaf_buffer_bytes: u64,
    pub core_buffer_bytes: u64,
    /// server→leaf 方向的端点发送缓冲。
    pub endpoint_buffer_bytes: u64,
    /// 每跳固定传播时延。
    pub hop_delay: SimTime,
    pub queue_kind: QueueKind,
}

impl Default for LeafSpineOpts {
    fn default() -> Self {
        // CONGA 测床配置：12 core / 24 leaf / 每 leaf 32 server，
        // 10G leaf、40G core，10us 每跳。
        Self {
            core_count: 12,
            leaf_count: 24,
            servers_per_leaf: 32,
            leaf_link_bps: 10_000_000_000,
            core_link_bps: 40_000_000_000,
            leaf_buffer_bytes: 512_000,
            core_buffer_bytes: 1_024_000,
            endpoint_buffer_bytes: 8_192_000,
            hop_delay: SimTime::from_micros(10),
            queue_kind: QueueKind::DropTail,
        }
    }
}

/// 拓扑句柄：维度加各类节点的 id 表。
///
/// 构建完成后只读；路由生成通过显式传入的句柄访问拓扑，不存在任何
/// 模块级全局状态。
#[derive(Debug, Clone)]
pub struct LeafSpineTopology {
    pub core_count: usize,
    pub leaf_count: usize,
    pub servers_per_leaf: usize,
    pub servers: Vec<NodeId>,
    pub leaf_switches: Vec<NodeId>,
    pub core_switches: Vec<NodeId>,
}

impl LeafSpineTopology {
    /// 端点全集大小
    pub fn server_count(&self) -> usize {
        self.servers.len()
    }

    /// 端点 id 对应的节点。越界是程序性错误，直接 panic。
    pub fn server(&self, id: u32) -> NodeId {
        let n = self.servers.len();
        *self
            .servers
            .get(id as usize)
            .unwrap_or_else(|| panic!("server id {id} out of range (0..{n})"))
    }

    /// 端点所属的 leaf 下标
    pub fn leaf_of(&self, id: u32) -> usize {
        assert!(
            (id as usize) < self.servers.len(),
            "server id {id} out of range (0..{})",
            self.servers.len()
        );
        id as usize / self.servers_per_leaf
    }

    pub fn leaf(&self, i: usize) -> NodeId {
        self.leaf_switches[i]
    }

    pub fn core(&self, j: usize) -> NodeId {
        self.core_switches[j]
    }
}

fn check_positive(what: &'static str, got: u64) -> Result<(), ConfigError> {
    if got == 0 {
        return Err(ConfigError::NonPositive { what, got });
    }
    Ok(())
}

/// 构建 leaf-spine 拓扑。
///
/// 链路方向语义沿用 CONGA 测床：leaf→core 用 leaf 速率/leaf 缓冲，
/// core→leaf 用 core 速率/core 缓冲；server→leaf 用 leaf 速率/端点缓冲，
/// leaf→server 用 leaf 速率/leaf 缓冲。
pub fn build_leaf_spine(
    net: &mut Network,
    opts: &LeafSpineOpts,
) -> Result<LeafSpineTopology, ConfigError> {
    check_positive("core_count", opts.core_count as u64)?;
    check_positive("leaf_count", opts.leaf_count as u64)?;
    check_positive("servers_per_leaf", opts.servers_per_leaf as u64)?;
    check_positive("leaf_link_bps", opts.leaf_link_bps)?;
    check_positive("core_link_bps", opts.core_link_bps)?;
    check_positive("leaf_buffer_bytes", opts.leaf_buffer_bytes)?;
    check_positive("core_buffer_bytes", opts.core_buffer_bytes)?;
    check_positive("endpoint_buffer_bytes", opts.endpoint_buffer_bytes)?;

    // 传播时延允许为零（退化但合法的配置）。
    let delay = opts.hop_delay;

    let mut leaf_switches = Vec::with_capacity(opts.leaf_count);
    for i in 0..opts.leaf_count {
        leaf_switches.push(net.add_switch(format!("leaf_{i}"), Tier::Leaf));
    }

    let mut core_switches = Vec::with_capacity(opts.core_count);
    for j in 0..opts.core_count {
        core_switches.push(net.add_switch(format!("core_{j}"), Tier::Core));
    }

    // leaf 与 core 全互联：每对 (leaf, core) 每方向恰好一条链路。
    for &leaf in &leaf_switches {
        for &core in &core_switches {
            net.connect(
                leaf,
                core,
                delay,
                opts.leaf_link_bps,
                make_queue(opts.queue_kind, opts.leaf_buffer_bytes),
            );
            net.connect(
                core,
                leaf,
                delay,
                opts.core_link_bps,
                make_queue(opts.queue_kind, opts.core_buffer_bytes),
            );
        }
    }

    let mut servers = Vec::with_capacity(opts.leaf_count * opts.servers_per_leaf);
    for (i, &leaf) in leaf_switches.iter().enumerate() {
        for s in 0..opts.servers_per_leaf {
            let srv = net.add_server(format!("srv_{i}_{s}"));
            net.connect(
                srv,
                leaf,
                delay,
                opts.leaf_link_bps,
                make_queue(opts.queue_kind, opts.endpoint_buffer_bytes),
            );
            net.connect(
                leaf,
                srv,
                delay,
                opts.leaf_link_bps,
                make_queue(opts.queue_kind, opts.leaf_buffer_bytes),
            );
            servers.push(srv);
        }
    }

    Ok(LeafSpineTopology {
        core_count: opts.core_count,
        leaf_count: opts.leaf_count,
        servers_per_leaf: opts.servers_per_leaf,
        servers,
        leaf_switches,
        core_switches,
    })
}
