//! 路由生成器
//!
//! 生成器持有拓扑句柄与选择策略，通过显式构造参数绑定，不依赖任何
//! 全局状态。每次调用都分配全新的路由向量，调用之间互不共享。

use super::select::CoreSelect;
use crate::error::ConfigError;
use crate::net::NodeId;
use crate::topo::LeafSpineTopology;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use tracing::trace;

/// 两层拓扑下路由的固定跳数：src server、src leaf、core、dst leaf、dst server。
pub const ROUTE_HOPS: usize = 5;

/// 一对新生成的路由：反向是正向的严格镜像，源/宿角色互换。
#[derive(Debug, Clone)]
pub struct FlowRoutes {
    pub fwd: Vec<NodeId>,
    pub rev: Vec<NodeId>,
    pub src_id: u32,
    pub dst_id: u32,
    /// 被选中的 core 下标。
    pub core: usize,
}

/// 路由生成器
pub struct RouteGenerator {
    topo: LeafSpineTopology,
    select: Box<dyn CoreSelect>,
    rng: Pcg64,
}

impl RouteGenerator {
    pub fn new(topo: LeafSpineTopology, select: Box<dyn CoreSelect>, seed: u64) -> Self {
        Self {
            topo,
            select,
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    /// 生成器绑定的拓扑句柄
    pub fn topology(&self) -> &LeafSpineTopology {
        &self.topo
    }

    /// 抽样一对互异端点并生成路由。
    ///
    /// dst 从剩余 n-1 个端点里均匀抽取：先抽 [0, n-1)，再把落在 src 上
    /// 的取值跳过去。一步到位，不存在无界重试；端点全集只有一个成员时
    /// 立即失败。
    pub fn generate(&mut self) -> Result<FlowRoutes, ConfigError> {
        let n = self.topo.server_count() as u32;
        if n < 2 {
            return Err(ConfigError::SingleEndpoint);
        }

        let src = self.rng.gen_range(0..n);
        let draw = self.rng.gen_range(0..n - 1);
        let dst = if draw >= src { draw + 1 } else { draw };

        Ok(self.generate_between(src, dst))
    }

    /// 为给定端点对生成路由。
    ///
    /// 端点 id 越界或 src == dst 属于调用方的程序性错误，直接 panic。
    pub fn generate_between(&mut self, src_id: u32, dst_id: u32) -> FlowRoutes {
        assert!(
            src_id != dst_id,
            "flow endpoints must be distinct (got {src_id} twice)"
        );

        let src_leaf = self.topo.leaf_of(src_id);
        let dst_leaf = self.topo.leaf_of(dst_id);
        let core = self
            .select
            .pick(src_id, dst_id, self.topo.core_count);
        assert!(
            core < self.topo.core_count,
            "core selector returned out-of-range index {core} (core_count {})",
            self.topo.core_count
        );

        // 两层拓扑下所有流都经过 core，同 leaf 的流也一样，跳数恒定。
        let fwd = vec![
            self.topo.server(src_id),
            self.topo.leaf(src_leaf),
            self.topo.core(core),
            self.topo.leaf(dst_leaf),
            self.topo.server(dst_id),
        ];
        let mut rev = fwd.clone();
        rev.reverse();

        trace!(src_id, dst_id, src_leaf, dst_leaf, core, "生成路由对");

        FlowRoutes {
            fwd,
            rev,
            src_id,
            dst_id,
            core,
        }
    }
}
