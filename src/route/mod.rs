//! 路由生成模块
//!
//! 给定一对端点（或让生成器自己抽样），产出穿过某个 core 交换机的
//! 5 跳正向路由与其镜像反向路由。

mod generator;
mod select;

pub use generator::{FlowRoutes, ROUTE_HOPS, RouteGenerator};
pub use select::{CoreSelect, RandomCore, SrcModCore};
