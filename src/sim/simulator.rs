//! 仿真器
//!
//! 定义事件驱动仿真器，维护当前时间与事件队列。

use super::event::Event;
use super::scheduled_event::ScheduledEvent;
use super::time::SimTime;
use super::world::World;
use std::collections::BinaryHeap;
use tracing::{debug, info, trace};

/// 事件驱动仿真器：维护当前时间与事件队列。
///
/// 仿真终点（`set_endtime`）由仿真器自己执行：超过终点的事件不再被取出，
/// 驱动层只负责在 `do_next_event` 返回 `false` 时停下来。
#[derive(Default)]
pub struct Simulator {
    now: SimTime,
    next_seq: u64,
    endtime: Option<SimTime>,
    q: BinaryHeap<ScheduledEvent>,
}

impl Simulator {
    /// 获取当前仿真时间
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// 设置仿真终点：晚于该时间的事件不再执行。
    pub fn set_endtime(&mut self, t: SimTime) {
        self.endtime = Some(t);
    }

    /// 事件队列中待执行的事件数
    pub fn pending_events(&self) -> usize {
        self.q.len()
    }

    /// 调度事件在指定时间执行
    #[tracing::instrument(skip(self, ev), fields(event_type = std::any::type_name::<E>(), schedule_at = ?at))]
    pub fn schedule<E: Event>(&mut self, at: SimTime, ev: E) {
        let seq = self.next_seq;
        trace!(now = ?self.now, seq, "调度事件");

        self.next_seq = self.next_seq.wrapping_add(1);
        self.q.push(ScheduledEvent {
            at,
            seq,
            ev: Box::new(ev),
        });

        debug!(queue_size = self.q.len(), "事件已加入队列");
    }

    /// 执行下一个事件。
    ///
    /// 返回 `false` 表示队列已空，或下一个事件越过了配置的仿真终点。
    pub fn do_next_event(&mut self, world: &mut dyn World) -> bool {
        let Some(top) = self.q.peek() else {
            return false;
        };
        if let Some(end) = self.endtime {
            if top.at > end {
                debug!(next_at = ?top.at, endtime = ?end, "下一事件越过仿真终点");
                return false;
            }
        }

        let item = self.q.pop().expect("peek then pop");
        self.now = item.at;
        item.ev.execute(self, world);
        world.on_tick(self);
        true
    }

    /// 运行直到事件队列为空或到达 `until`。
    pub fn run_until(&mut self, until: SimTime, world: &mut dyn World) {
        while let Some(top) = self.q.peek() {
            if top.at > until {
                break;
            }
            let item = self.q.pop().expect("peek then pop");
            self.now = item.at;
            item.ev.execute(self, world);
            world.on_tick(self);
        }
        self.now = self.now.max(until);
    }

    /// 运行所有事件直到队列为空（或越过仿真终点）。
    #[tracing::instrument(skip(self, world))]
    pub fn run(&mut self, world: &mut dyn World) {
        info!("▶️  开始运行仿真");
        debug!(now = ?self.now, queue_size = self.q.len(), "初始状态");

        let mut event_count = 0u64;
        while self.do_next_event(world) {
            event_count += 1;
        }

        info!(
            total_events = event_count,
            final_time = ?self.now,
            "✅ 仿真完成"
        );
    }
}
