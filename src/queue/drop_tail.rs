//! DropTail（尾丢弃）队列
//!
//! 剩余容量装不下新到达的 packet 时直接丢弃它，已入队的不受影响。

use std::collections::VecDeque;

use crate::net::Packet;

use super::PacketQueue;

#[derive(Debug)]
pub struct DropTailQueue {
    cap_bytes: u64,
    used_bytes: u64,
    q: VecDeque<Packet>,
}

impl DropTailQueue {
    pub fn new(cap_bytes: u64) -> Self {
        Self {
            cap_bytes,
            used_bytes: 0,
            q: VecDeque::new(),
        }
    }
}

impl PacketQueue for DropTailQueue {
    fn enqueue(&mut self, pkt: Packet) -> Result<(), Packet> {
        let sz = pkt.size_bytes as u64;
        if self.used_bytes.saturating_add(sz) > self.cap_bytes {
            return Err(pkt);
        }
        self.used_bytes = self.used_bytes.saturating_add(sz);
        self.q.push_back(pkt);
        Ok(())
    }

    fn dequeue(&mut self) -> Option<Packet> {
        let pkt = self.q.pop_front()?;
        self.used_bytes = self.used_bytes.saturating_sub(pkt.size_bytes as u64);
        Some(pkt)
    }

    fn len(&self) -> usize {
        self.q.len()
    }

    fn bytes(&self) -> u64 {
        self.used_bytes
    }

    fn capacity_bytes(&self) -> u64 {
        self.cap_bytes
    }
}
