//! 节点类型
//!
//! 定义网络节点，包括节点 trait 和具体实现（server、交换机）。

use super::id::NodeId;
use super::network::Network;
use super::packet::Packet;
use crate::sim::Simulator;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 交换机层级：leaf 直连 server，core 互联所有 leaf。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Leaf,
    Core,
}

/// 节点接口
pub trait Node: Send {
    /// 获取节点标识符
    fn id(&self) -> NodeId;

    /// 获取节点名称
    fn name(&self) -> &str;

    /// 处理到达的数据包
    fn on_packet(&mut self, pkt: Packet, sim: &mut Simulator, net: &mut Network);
}

/// Server 节点：流的端点。
#[derive(Debug)]
pub struct Server {
    id: NodeId,
    name: String,
}

impl Server {
    /// 创建新 server
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Node for Server {
    fn id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn on_packet(&mut self, pkt: Packet, sim: &mut Simulator, net: &mut Network) {
        if self.id != pkt.dst() {
            debug!(node = %self.name, pkt_id = pkt.id, "未到达目的地，继续转发");
            net.forward_from(self.id, pkt, sim);
        } else {
            debug!(node = %self.name, pkt_id = pkt.id, "🖥️  已到达目的 server");
            net.on_delivered(pkt, sim);
        }
    }
}

/// 交换机节点
#[derive(Debug)]
pub struct Switch {
    id: NodeId,
    name: String,
    tier: Tier,
}

impl Switch {
    /// 创建新交换机
    pub fn new(id: NodeId, name: impl Into<String>, tier: Tier) -> Self {
        Self {
            id,
            name: name.into(),
            tier,
        }
    }

    /// 交换机层级
    pub fn tier(&self) -> Tier {
        self.tier
    }
}

impl Node for Switch {
    fn id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn on_packet(&mut self, pkt: Packet, sim: &mut Simulator, net: &mut Network) {
        // 路由端点只能是 server；交换机永远是中间跳。
        assert!(
            self.id != pkt.dst(),
            "switch {} is the route destination (route invariant violated)",
            self.name
        );
        debug!(node = %self.name, tier = ?self.tier, pkt_id = pkt.id, "🔀 交换机转发");
        net.forward_from(self.id, pkt, sim);
    }
}
