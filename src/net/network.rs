//! 网络拓扑管理
//!
//! 定义网络拓扑结构，包含节点、链路、数据包转发、流状态表和统计信息。
//! 拓扑构建完成之后是只读共享状态；路由生成只读取它，从不修改。

use std::collections::HashMap;

use super::deliver_packet::DeliverPacket;
use super::flow::{ACK_BYTES, FlowState, InjectFlowData};
use super::id::{LinkId, NodeId};
use super::link::Link;
use super::link_ready::LinkReady;
use super::node::{Node, Server, Switch, Tier};
use super::observer::FabricObserver;
use super::packet::{Packet, PacketKind};
use super::stats::Stats;
use crate::queue::PacketQueue;
use crate::sim::{SimTime, Simulator};
use tracing::{debug, info, trace};

/// 网络拓扑
#[derive(Default)]
pub struct Network {
    nodes: Vec<Option<Box<dyn Node>>>,
    links: Vec<Link>,
    edges: HashMap<(NodeId, NodeId), LinkId>,
    /// 每个节点挂接的链路（出入两个方向都算）。
    attached: Vec<Vec<LinkId>>,
    flows: HashMap<u64, FlowState>,
    next_pkt_id: u64,
    pub stats: Stats,
    observer: Option<Box<dyn FabricObserver>>,
}

impl Network {
    /// 挂接观察者。要观察到建构期事件，必须在建拓扑之前挂。
    pub fn attach_observer(&mut self, obs: Box<dyn FabricObserver>) {
        self.observer = Some(obs);
    }

    /// 添加 server 节点
    pub fn add_server(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let name = name.into();
        if let Some(obs) = &mut self.observer {
            obs.server_built(id, &name);
        }
        self.nodes.push(Some(Box::new(Server::new(id, name))));
        self.attached.push(Vec::new());
        id
    }

    /// 添加交换机节点
    pub fn add_switch(&mut self, name: impl Into<String>, tier: Tier) -> NodeId {
        let id = NodeId(self.nodes.len());
        let name = name.into();
        if let Some(obs) = &mut self.observer {
            obs.switch_built(id, &name, tier);
        }
        self.nodes.push(Some(Box::new(Switch::new(id, name, tier))));
        self.attached.push(Vec::new());
        id
    }

    /// 连接两个节点（创建单向链路：限速有界队列段 + 固定时延管道段）
    pub fn connect(
        &mut self,
        from: NodeId,
        to: NodeId,
        latency: SimTime,
        bandwidth_bps: u64,
        queue: Box<dyn PacketQueue>,
    ) -> LinkId {
        let id = LinkId(self.links.len());
        if let Some(obs) = &mut self.observer {
            obs.link_built(id, from, to, bandwidth_bps, queue.capacity_bytes(), latency);
        }
        self.links.push(Link::new(from, to, latency, bandwidth_bps, queue));
        self.edges.insert((from, to), id);
        self.attached[from.0].push(id);
        self.attached[to.0].push(id);
        id
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn link(&self, id: LinkId) -> &Link {
        &self.links[id.0]
    }

    pub fn link_between(&self, from: NodeId, to: NodeId) -> Option<LinkId> {
        self.edges.get(&(from, to)).copied()
    }

    /// 某节点挂接的全部链路
    pub fn attached_links(&self, node: NodeId) -> &[LinkId] {
        &self.attached[node.0]
    }

    /// 在途流数量
    pub fn flow_count(&self) -> usize {
        self.flows.len()
    }

    pub fn flow(&self, flow_id: u64) -> Option<&FlowState> {
        self.flows.get(&flow_id)
    }

    /// 创建数据包
    pub fn make_packet(
        &mut self,
        flow_id: u64,
        size_bytes: u32,
        kind: PacketKind,
        route: Vec<NodeId>,
    ) -> Packet {
        let id = self.next_pkt_id;
        self.next_pkt_id = self.next_pkt_id.wrapping_add(1);
        Packet {
            id,
            flow_id,
            size_bytes,
            kind,
            route,
            hop: 0,
        }
    }

    /// 将数据包交付给节点处理
    pub fn deliver(&mut self, to: NodeId, pkt: Packet, sim: &mut Simulator) {
        // 暂时把节点取出来，避免 &mut self 与 &mut node 的重叠借用。
        let mut node = self.nodes[to.0].take().expect("node exists");
        node.on_packet(pkt, sim, self);
        self.nodes[to.0] = Some(node);
    }

    /// 从指定节点转发数据包：入队，空闲则立即开始序列化。
    pub fn forward_from(&mut self, from: NodeId, pkt: Packet, sim: &mut Simulator) {
        let to = pkt.next().expect("has_next checked by caller");
        let link_id = *self
            .edges
            .get(&(from, to))
            .unwrap_or_else(|| panic!("no link from {:?} to {:?}", from, to));
        let link = &mut self.links[link_id.0];

        match link.queue.enqueue(pkt) {
            Err(dropped) => {
                trace!(
                    link_id = ?link_id,
                    q_bytes = link.queue.bytes(),
                    q_cap = link.queue.capacity_bytes(),
                    pkt_id = dropped.id,
                    "队列满，丢包"
                );
                self.stats.dropped_pkts += 1;
                self.stats.dropped_bytes += dropped.size_bytes as u64;
                let q_bytes = link.queue.bytes();
                let q_cap = link.queue.capacity_bytes();
                if let Some(obs) = &mut self.observer {
                    obs.packet_dropped(sim.now(), link_id, q_bytes, q_cap);
                }
            }
            Ok(()) => {
                if self.links[link_id.0].busy_until <= sim.now() {
                    self.start_tx(link_id, sim);
                }
            }
        }
    }

    /// 链路空闲：尝试序列化队首 packet，并调度其到达与链路再次就绪。
    pub(crate) fn on_link_ready(&mut self, link_id: LinkId, sim: &mut Simulator) {
        self.start_tx(link_id, sim);
    }

    fn start_tx(&mut self, link_id: LinkId, sim: &mut Simulator) {
        let link = &mut self.links[link_id.0];
        // 链路同一时刻只序列化一个 packet。同一时间戳上别的事件已经
        // 占住链路时，迟到的 LinkReady 不做任何事。
        if link.busy_until > sim.now() {
            return;
        }
        let Some(pkt) = link.queue.dequeue() else {
            return;
        };

        let now = sim.now();
        let tx_time = link.tx_time(pkt.size_bytes);
        let depart = SimTime(now.0.saturating_add(tx_time.0));
        link.busy_until = depart;
        let arrive = SimTime(depart.0.saturating_add(link.latency.0));
        let to = link.to;

        trace!(
            link_id = ?link_id,
            pkt_id = pkt.id,
            tx_time = ?tx_time,
            depart = ?depart,
            arrive = ?arrive,
            "开始序列化发送"
        );

        sim.schedule(depart, LinkReady { link_id });
        sim.schedule(arrive, DeliverPacket { to, pkt: pkt.advance() });
    }

    /// 登记一条新流并开始注入。路由对从此归流状态表独占所有。
    #[allow(clippy::too_many_arguments)]
    pub fn start_flow(
        &mut self,
        flow_id: u64,
        fwd: Vec<NodeId>,
        rev: Vec<NodeId>,
        src_id: u32,
        dst_id: u32,
        total_bytes: u64,
        pkt_bytes: u32,
        pace: SimTime,
        sim: &mut Simulator,
    ) {
        assert!(total_bytes > 0, "flow must carry at least one byte");
        assert!(pkt_bytes > 0, "pkt_bytes must be positive");
        let pkts_total = total_bytes.div_ceil(pkt_bytes as u64);

        debug!(
            flow_id,
            src_id,
            dst_id,
            total_bytes,
            pkts_total,
            now = ?sim.now(),
            "🚀 新流开始"
        );

        self.stats.generated_flows += 1;
        if let Some(obs) = &mut self.observer {
            obs.flow_started(sim.now(), flow_id, src_id, dst_id, total_bytes);
        }

        let prev = self.flows.insert(
            flow_id,
            FlowState {
                fwd,
                rev,
                total_bytes,
                pkt_bytes,
                pkts_total,
                pkts_sent: 0,
                acks_received: 0,
                pace,
                started_at: sim.now(),
            },
        );
        assert!(prev.is_none(), "flow id {flow_id} reused while in flight");

        sim.schedule(sim.now(), InjectFlowData { flow_id });
    }

    /// 为某条流注入下一个数据包；还有剩余就调度下一次注入。
    pub(crate) fn inject_next(&mut self, flow_id: u64, sim: &mut Simulator) {
        let Some(flow) = self.flows.get_mut(&flow_id) else {
            return;
        };
        if flow.pkts_sent >= flow.pkts_total {
            return;
        }

        // 最后一个包承载余数（整除时仍是整包）。
        let sent_bytes = flow.pkts_sent * flow.pkt_bytes as u64;
        let remain = flow.total_bytes - sent_bytes;
        let size = remain.min(flow.pkt_bytes as u64) as u32;
        flow.pkts_sent += 1;

        let route = flow.fwd.clone();
        let pace = flow.pace;
        let more = flow.pkts_sent < flow.pkts_total;

        let pkt = self.make_packet(flow_id, size, PacketKind::Data, route);
        let from = pkt.src();
        self.forward_from(from, pkt, sim);

        if more {
            let next_at = SimTime(sim.now().0.saturating_add(pace.0));
            sim.schedule(next_at, InjectFlowData { flow_id });
        }
    }

    /// 数据包送达目的地时的处理。
    ///
    /// 数据包触发反向 ack；最后一个 ack 回到源端时流完成，流状态（含
    /// 路由对）被整体释放。
    pub(crate) fn on_delivered(&mut self, pkt: Packet, sim: &mut Simulator) {
        self.stats.delivered_pkts += 1;
        self.stats.delivered_bytes += pkt.size_bytes as u64;

        match pkt.kind {
            PacketKind::Data => {
                let Some(flow) = self.flows.get(&pkt.flow_id) else {
                    return;
                };
                let rev = flow.rev.clone();
                let ack = self.make_packet(pkt.flow_id, ACK_BYTES, PacketKind::Ack, rev);
                let from = ack.src();
                self.forward_from(from, ack, sim);
            }
            PacketKind::Ack => {
                let Some(flow) = self.flows.get_mut(&pkt.flow_id) else {
                    return;
                };
                flow.acks_received += 1;
                if !flow.is_complete() {
                    return;
                }

                let flow = self
                    .flows
                    .remove(&pkt.flow_id)
                    .expect("completed flow exists");
                self.stats.completed_flows += 1;
                let fct = SimTime(sim.now().0.saturating_sub(flow.started_at.0));
                info!(flow_id = pkt.flow_id, fct = ?fct, "✅ 流完成，释放路由");
                if let Some(obs) = &mut self.observer {
                    obs.flow_completed(sim.now(), pkt.flow_id, fct);
                }
            }
        }
    }
}
