//! Ack 优先队列（有界，尾丢弃）
//!
//! 反向 ack 严格优先于数据包出队，避免双向流共用出口队列时 ack 饿死。

use std::collections::VecDeque;

use crate::net::{Packet, PacketKind};

use super::PacketQueue;

#[derive(Debug)]
pub struct AckPriorityQueue {
    cap_bytes: u64,
    used_bytes: u64,
    hi: VecDeque<Packet>,
    lo: VecDeque<Packet>,
}

impl AckPriorityQueue {
    pub fn new(cap_bytes: u64) -> Self {
        Self {
            cap_bytes,
            used_bytes: 0,
            hi: VecDeque::new(),
            lo: VecDeque::new(),
        }
    }
}

impl PacketQueue for AckPriorityQueue {
    fn enqueue(&mut self, pkt: Packet) -> Result<(), Packet> {
        let sz = pkt.size_bytes as u64;
        if self.used_bytes.saturating_add(sz) > self.cap_bytes {
            return Err(pkt);
        }
        self.used_bytes = self.used_bytes.saturating_add(sz);
        match pkt.kind {
            PacketKind::Ack => self.hi.push_back(pkt),
            PacketKind::Data => self.lo.push_back(pkt),
        }
        Ok(())
    }

    fn dequeue(&mut self) -> Option<Packet> {
        let pkt = self.hi.pop_front().or_else(|| self.lo.pop_front())?;
        self.used_bytes = self.used_bytes.saturating_sub(pkt.size_bytes as u64);
        Some(pkt)
    }

    fn len(&self) -> usize {
        self.hi.len().saturating_add(self.lo.len())
    }

    fn bytes(&self) -> u64 {
        self.used_bytes
    }

    fn capacity_bytes(&self) -> u64 {
        self.cap_bytes
    }
}
