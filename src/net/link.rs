//! 链路类型
//!
//! 一条单向链路由两段组成：限速有界缓冲的队列段（queue hop）加固定传播
//! 时延的管道段（pipe hop）。每个方向、每对相邻节点恰好一条。

use super::id::NodeId;
use crate::queue::PacketQueue;
use crate::sim::SimTime;

/// 单向网络链路
#[derive(Debug)]
pub struct Link {
    pub from: NodeId,
    pub to: NodeId,
    /// 管道段：固定传播时延。
    pub latency: SimTime,
    /// 队列段：序列化速率。
    pub bandwidth_bps: u64,
    pub busy_until: SimTime,
    /// 队列段：有界缓冲，容量不足时丢弃新到达的 packet。
    pub queue: Box<dyn PacketQueue>,
}

impl Link {
    /// 创建新链路
    pub fn new(
        from: NodeId,
        to: NodeId,
        latency: SimTime,
        bandwidth_bps: u64,
        queue: Box<dyn PacketQueue>,
    ) -> Self {
        Self {
            from,
            to,
            latency,
            bandwidth_bps,
            busy_until: SimTime::ZERO,
            queue,
        }
    }

    /// 计算传输指定字节数所需的时间
    pub(crate) fn tx_time(&self, bytes: u32) -> SimTime {
        // ceil(bytes*8 / bps) 秒 -> 纳秒
        if self.bandwidth_bps == 0 {
            return SimTime(u64::MAX / 4);
        }
        let bits = (bytes as u128).saturating_mul(8);
        let nanos = (bits.saturating_mul(1_000_000_000u128)
            + (self.bandwidth_bps as u128 - 1))
            / self.bandwidth_bps as u128;
        SimTime(nanos.min(u64::MAX as u128) as u64)
    }
}
