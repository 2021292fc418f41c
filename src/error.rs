//! 配置错误类型
//!
//! 拓扑构建与路由生成在配置非法时返回的错误。越界索引等程序性
//! 不变量违例不走这里，直接 panic。

use thiserror::Error;

/// 配置错误：在构建期检测并中止，绝不静默修正。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 数量、速率或缓冲区参数必须为正。
    #[error("{what} must be positive (got {got})")]
    NonPositive { what: &'static str, got: u64 },

    /// 端点全集只有一个 server，无法抽取 src != dst 的流。
    #[error("endpoint universe has a single server; cannot draw distinct src/dst")]
    SingleEndpoint,
}
