//! 流状态与数据注入事件
//!
//! 一条流把字节切成定长数据包，按端点速率匀速注入正向路由；目的 server
//! 每收到一个数据包就在反向路由上回一个定长 ack。不做重传、不做拥塞
//! 控制：丢掉的数据包不再补发，流的活动只受仿真终点约束。

use super::id::NodeId;
use super::net_world::NetWorld;
use crate::sim::{Event, SimTime, Simulator, World};

/// ack 包大小（字节）。
pub const ACK_BYTES: u32 = 64;

/// 一条在途流：路由对归流独占所有，流完成时整体释放。
#[derive(Debug)]
pub struct FlowState {
    pub fwd: Vec<NodeId>,
    pub rev: Vec<NodeId>,
    pub total_bytes: u64,
    pub pkt_bytes: u32,
    pub pkts_total: u64,
    pub pkts_sent: u64,
    pub acks_received: u64,
    /// 相邻两个数据包注入的间隔（端点速率下一个包的序列化时间）。
    pub pace: SimTime,
    pub started_at: SimTime,
}

impl FlowState {
    /// 流是否已被完全确认。
    pub fn is_complete(&self) -> bool {
        self.acks_received >= self.pkts_total
    }
}

/// 事件：为某条流注入下一个数据包。
#[derive(Debug)]
pub struct InjectFlowData {
    pub flow_id: u64,
}

impl Event for InjectFlowData {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let InjectFlowData { flow_id } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<NetWorld>()
            .expect("world must be NetWorld");
        w.net.inject_next(flow_id, sim);
    }
}
