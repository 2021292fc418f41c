//! 链路就绪事件
//!
//! 一次序列化发送在 depart 时刻结束时触发，驱动该链路队列中的下一个
//! packet 出队。

use super::id::LinkId;
use super::net_world::NetWorld;
use crate::sim::{Event, Simulator, World};
use tracing::trace;

/// 事件：链路完成一次发送，尝试继续发送队首 packet。
#[derive(Debug)]
pub struct LinkReady {
    pub link_id: LinkId,
}

impl Event for LinkReady {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let LinkReady { link_id } = *self;
        trace!(link_id = ?link_id, now = ?sim.now(), "链路就绪");
        let w = world
            .as_any_mut()
            .downcast_mut::<NetWorld>()
            .expect("world must be NetWorld");
        w.net.on_link_ready(link_id, sim);
    }
}
