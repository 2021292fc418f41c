//! 网络世界
//!
//! World 的网络实现：持有 Network。网络事件（数据包交付、链路就绪、
//! 流注入、流到达）都向下转型到这个类型来访问拓扑与流状态。

use super::network::Network;
use crate::sim::World;
use std::any::Any;

/// 持有 Network 的仿真世界。
#[derive(Default)]
pub struct NetWorld {
    pub net: Network,
}

impl World for NetWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
