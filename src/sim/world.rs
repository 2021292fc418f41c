//! 世界 trait
//!
//! 事件执行时拿到的业务状态。网络仿真里它就是持有 Network 的
//! NetWorld；事件通过 `as_any_mut` 向下转型取回具体类型。

use super::simulator::Simulator;
use std::any::Any;

/// 仿真世界：由业务层实现。
pub trait World: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// 每个事件执行完后被调用一次。
    fn on_tick(&mut self, _sim: &mut Simulator) {}
}
