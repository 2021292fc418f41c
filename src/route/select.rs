//! Core 交换机选择策略
//!
//! 路由生成时选哪个 core 是可插拔的：默认均匀随机（每次调用每个 core
//! 都有正概率被选中），也提供按 src id 取模的确定性轮转（在均匀的源
//! 分布下各 core 精确均衡）。

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

/// 选择策略接口
pub trait CoreSelect: Send {
    fn pick(&mut self, src_id: u32, dst_id: u32, core_count: usize) -> usize;
}

/// 均匀随机选择
pub struct RandomCore {
    rng: Pcg64,
}

impl RandomCore {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
        }
    }
}

impl CoreSelect for RandomCore {
    fn pick(&mut self, _src_id: u32, _dst_id: u32, core_count: usize) -> usize {
        self.rng.gen_range(0..core_count)
    }
}

/// 按 src id 取模的确定性轮转
#[derive(Debug, Default)]
pub struct SrcModCore;

impl CoreSelect for SrcModCore {
    fn pick(&mut self, src_id: u32, _dst_id: u32, core_count: usize) -> usize {
        src_id as usize % core_count
    }
}
