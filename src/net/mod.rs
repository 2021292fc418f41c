//! 网络模拟模块
//!
//! 此模块包含网络模拟的核心组件：节点、链路、数据包、流状态与网络拓扑。

// 子模块声明
mod deliver_packet;
mod flow;
mod id;
mod link;
mod link_ready;
mod net_world;
mod network;
mod node;
mod observer;
mod packet;
mod stats;

// 重新导出公共接口
pub use deliver_packet::DeliverPacket;
pub use flow::{FlowState, InjectFlowData, ACK_BYTES};
pub use id::{LinkId, NodeId};
pub use link::Link;
pub use link_ready::LinkReady;
pub use net_world::NetWorld;
pub use network::Network;
pub use node::{Node, Server, Switch, Tier};
pub use observer::{FabricObserver, MemObserver, ObsEvent};
pub use packet::{Packet, PacketKind};
pub use stats::Stats;
