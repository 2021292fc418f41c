//! 事件 trait
//!
//! 仿真中发生的一切（数据包到达、链路就绪、流到达、数据注入）都实现
//! 这个接口。

use super::simulator::Simulator;
use super::world::World;

/// 事件：可被调度执行，执行即消费（`self: Box<Self>` 转移所有权）。
pub trait Event: Send + 'static {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World);
}
