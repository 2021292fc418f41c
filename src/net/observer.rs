//! 观察者挂点
//!
//! 每个交换机、server、链路在构建时都会向挂在 Network 上的观察者登记；
//! 丢包、流开始/完成也会上报。日志的格式与持久化不在核心职责内，核心
//! 只提供挂点。

use super::id::{LinkId, NodeId};
use super::node::Tier;
use crate::sim::SimTime;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// 观察者接口：所有回调默认空实现，按需覆写。
pub trait FabricObserver: Send {
    fn switch_built(&mut self, _id: NodeId, _name: &str, _tier: Tier) {}
    fn server_built(&mut self, _id: NodeId, _name: &str) {}
    fn link_built(
        &mut self,
        _id: LinkId,
        _from: NodeId,
        _to: NodeId,
        _bandwidth_bps: u64,
        _q_cap_bytes: u64,
        _latency: SimTime,
    ) {
    }
    fn packet_dropped(&mut self, _t: SimTime, _link: LinkId, _q_bytes: u64, _q_cap_bytes: u64) {}
    fn flow_started(&mut self, _t: SimTime, _flow_id: u64, _src_id: u32, _dst_id: u32, _bytes: u64) {
    }
    fn flow_completed(&mut self, _t: SimTime, _flow_id: u64, _fct: SimTime) {}
}

/// 一条可序列化的观察记录（JSON）。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObsEvent {
    SwitchBuilt {
        node: usize,
        name: String,
        tier: Tier,
    },
    ServerBuilt {
        node: usize,
        name: String,
    },
    LinkBuilt {
        link: usize,
        from: usize,
        to: usize,
        bandwidth_bps: u64,
        q_cap_bytes: u64,
        latency_ns: u64,
    },
    Drop {
        t_ns: u64,
        link: usize,
        q_bytes: u64,
        q_cap_bytes: u64,
    },
    FlowStarted {
        t_ns: u64,
        flow_id: u64,
        src_id: u32,
        dst_id: u32,
        bytes: u64,
    },
    FlowCompleted {
        t_ns: u64,
        flow_id: u64,
        fct_ns: u64,
    },
}

/// 一个简单的内存收集器：记录全部观察事件，仿真结束后由调用方写 JSON。
///
/// 事件表放在 `Arc<Mutex<..>>` 里，调用方把观察者交给 Network 之后仍能
/// 通过自己持有的句柄读取。
#[derive(Debug, Default)]
pub struct MemObserver {
    events: Arc<Mutex<Vec<ObsEvent>>>,
}

impl MemObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 事件表句柄，交给 Network 之前先 clone 一份留给自己。
    pub fn handle(&self) -> Arc<Mutex<Vec<ObsEvent>>> {
        Arc::clone(&self.events)
    }

    fn push(&mut self, ev: ObsEvent) {
        self.events.lock().expect("observer events lock").push(ev);
    }
}

impl FabricObserver for MemObserver {
    fn switch_built(&mut self, id: NodeId, name: &str, tier: Tier) {
        self.push(ObsEvent::SwitchBuilt {
            node: id.0,
            name: name.to_string(),
            tier,
        });
    }

    fn server_built(&mut self, id: NodeId, name: &str) {
        self.push(ObsEvent::ServerBuilt {
            node: id.0,
            name: name.to_string(),
        });
    }

    fn link_built(
        &mut self,
        id: LinkId,
        from: NodeId,
        to: NodeId,
        bandwidth_bps: u64,
        q_cap_bytes: u64,
        latency: SimTime,
    ) {
        self.push(ObsEvent::LinkBuilt {
            link: id.0,
            from: from.0,
            to: to.0,
            bandwidth_bps,
            q_cap_bytes,
            latency_ns: latency.0,
        });
    }

    fn packet_dropped(&mut self, t: SimTime, link: LinkId, q_bytes: u64, q_cap_bytes: u64) {
        self.push(ObsEvent::Drop {
            t_ns: t.0,
            link: link.0,
            q_bytes,
            q_cap_bytes,
        });
    }

    fn flow_started(&mut self, t: SimTime, flow_id: u64, src_id: u32, dst_id: u32, bytes: u64) {
        self.push(ObsEvent::FlowStarted {
            t_ns: t.0,
            flow_id,
            src_id,
            dst_id,
            bytes,
        });
    }

    fn flow_completed(&mut self, t: SimTime, flow_id: u64, fct: SimTime) {
        self.push(ObsEvent::FlowCompleted {
            t_ns: t.0,
            flow_id,
            fct_ns: fct.0,
        });
    }
}
