//! 标识符类型
//!
//! server 与交换机共用同一个节点 id 空间（按加入 Network 的顺序分配）；
//! 链路 id 按方向分配，一对节点之间两个方向是两条链路。

/// 节点标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// 链路标识符（单方向）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkId(pub usize);
