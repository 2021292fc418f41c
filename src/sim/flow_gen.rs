//! 流到达过程
//!
//! 外部工作负载边界的实现：按泊松过程产生流到达，每次到达调用一次
//! 路由生成器，把得到的路由对绑定到一条新流上，然后调度下一次到达。
//! 拓扑在整个仿真期间只读，任意多次到达都可以安全地生成路由。

use crate::net::NetWorld;
use crate::queue::DEFAULT_PKT_BYTES;
use crate::route::RouteGenerator;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use super::event::Event;
use super::simulator::Simulator;
use super::time::SimTime;
use super::world::World;

/// 默认端点发送速率（10 Gbps，与 CONGA 测床的 leaf 速率一致）。
pub const DEFAULT_ENDHOST_RATE_BPS: u64 = 10_000_000_000;

/// 流大小分布：均值由配置给出。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeDist {
    Fixed,
    Exponential,
}

/// 流生成器：到达率由目标负载（bps）与平均流大小换算。
pub struct FlowGenerator {
    route_gen: RouteGenerator,
    flow_rate_bps: u64,
    mean_flow_bytes: u64,
    dist: SizeDist,
    start: SimTime,
    end: Option<SimTime>,
    endhost_rate_bps: u64,
    pkt_bytes: u32,
    rng: Pcg64,
    next_flow_id: u64,
}

impl FlowGenerator {
    pub fn new(
        route_gen: RouteGenerator,
        flow_rate_bps: u64,
        mean_flow_bytes: u64,
        dist: SizeDist,
        seed: u64,
    ) -> Self {
        assert!(flow_rate_bps > 0, "flow_rate_bps must be positive");
        assert!(mean_flow_bytes > 0, "mean_flow_bytes must be positive");
        Self {
            route_gen,
            flow_rate_bps,
            mean_flow_bytes,
            dist,
            start: SimTime::ZERO,
            end: None,
            endhost_rate_bps: DEFAULT_ENDHOST_RATE_BPS,
            pkt_bytes: DEFAULT_PKT_BYTES as u32,
            rng: Pcg64::seed_from_u64(seed),
            next_flow_id: 1,
        }
    }

    /// 限定到达的时间窗：窗外不再调度新到达。
    pub fn set_time_limits(&mut self, start: SimTime, end: SimTime) {
        self.start = start;
        self.end = Some(end);
    }

    /// 端点发送速率：决定数据包的注入节奏。端点发送缓冲本身属于拓扑
    /// （server→leaf 链路在构建期就带上了端点缓冲）。
    pub fn set_endhost_rate(&mut self, rate_bps: u64) {
        assert!(rate_bps > 0, "endhost rate must be positive");
        self.endhost_rate_bps = rate_bps;
    }

    /// 已产生的流数量
    pub fn flows_generated(&self) -> u64 {
        self.next_flow_id - 1
    }

    fn sample_size(&mut self) -> u64 {
        match self.dist {
            SizeDist::Fixed => self.mean_flow_bytes,
            SizeDist::Exponential => {
                let u: f64 = self.rng.r#gen();
                let sz = -(1.0 - u).ln() * self.mean_flow_bytes as f64;
                (sz.round() as u64).max(1)
            }
        }
    }

    /// 泊松到达：间隔服从指数分布，均值 = 平均流大小 / 目标速率。
    fn next_interarrival(&mut self) -> SimTime {
        let mean_s = (self.mean_flow_bytes as f64 * 8.0) / self.flow_rate_bps as f64;
        let u: f64 = self.rng.r#gen();
        let gap_s = -(1.0 - u).ln() * mean_s;
        SimTime((gap_s * 1_000_000_000.0).round() as u64)
    }

    /// 端点速率下一个整包的序列化时间，用作注入间隔。
    fn pace(&self) -> SimTime {
        let bits = self.pkt_bytes as u128 * 8;
        let nanos = (bits * 1_000_000_000u128 + (self.endhost_rate_bps as u128 - 1))
            / self.endhost_rate_bps as u128;
        SimTime(nanos.min(u64::MAX as u128) as u64)
    }

    /// 装入仿真器：在窗口起点调度第一次到达，返回共享句柄。
    pub fn install(self, sim: &mut Simulator) -> Arc<Mutex<FlowGenerator>> {
        let at = self.start;
        let generator = Arc::new(Mutex::new(self));
        sim.schedule(
            at,
            FlowArrival {
                generator: Arc::clone(&generator),
            },
        );
        generator
    }
}

/// 事件：一次流到达。
pub struct FlowArrival {
    pub generator: Arc<Mutex<FlowGenerator>>,
}

impl Event for FlowArrival {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let FlowArrival { generator } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<NetWorld>()
            .expect("world must be NetWorld");

        let mut g = generator.lock().expect("flow generator lock");

        if let Some(end) = g.end {
            if sim.now() > end {
                return;
            }
        }

        let routes = match g.route_gen.generate() {
            Ok(r) => r,
            Err(e) => {
                // 退化配置下不再产生任何流。
                warn!(error = %e, "路由生成失败，停止流到达");
                return;
            }
        };

        let flow_id = g.next_flow_id;
        g.next_flow_id += 1;
        let size = g.sample_size();
        let pace = g.pace();
        let pkt_bytes = g.pkt_bytes;

        debug!(flow_id, src = routes.src_id, dst = routes.dst_id, size, "流到达");

        w.net.start_flow(
            flow_id,
            routes.fwd,
            routes.rev,
            routes.src_id,
            routes.dst_id,
            size,
            pkt_bytes,
            pace,
            sim,
        );

        let gap = g.next_interarrival();
        let next_at = SimTime(sim.now().0.saturating_add(gap.0));
        if let Some(end) = g.end {
            if next_at > end {
                return;
            }
        }
        drop(g);
        sim.schedule(next_at, FlowArrival { generator });
    }
}
