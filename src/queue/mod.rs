//! 队列策略（Queue disciplines）
//!
//! 提供 DropTail（尾丢弃）队列和 ack 优先队列，两者都是有界缓冲。

use crate::net::Packet;
use serde::{Deserialize, Serialize};

mod ack_priority;
mod drop_tail;

pub use ack_priority::AckPriorityQueue;
pub use drop_tail::DropTailQueue;

pub const DEFAULT_PKT_BYTES: u64 = 1500;

pub fn mem_from_pkt(pkts: u64) -> u64 {
    pkts.saturating_mul(DEFAULT_PKT_BYTES)
}

/// Packet 队列抽象
pub trait PacketQueue: std::fmt::Debug + Send {
    /// 入队：成功返回 Ok；若被丢弃则返回 Err(pkt)
    fn enqueue(&mut self, pkt: Packet) -> Result<(), Packet>;
    /// 出队：按队列策略返回下一个 packet
    fn dequeue(&mut self) -> Option<Packet>;

    fn len(&self) -> usize;
    fn bytes(&self) -> u64;
    fn capacity_bytes(&self) -> u64;
}

/// 队列策略种类（拓扑构建参数）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    DropTail,
    AckPriority,
}

/// 按种类构造队列。
pub fn make_queue(kind: QueueKind, cap_bytes: u64) -> Box<dyn PacketQueue> {
    match kind {
        QueueKind::DropTail => Box::new(DropTailQueue::new(cap_bytes)),
        QueueKind::AckPriority => Box::new(AckPriorityQueue::new(cap_bytes)),
    }
}
