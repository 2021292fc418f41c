//! 仿真时间类型
//!
//! 时间以纳秒整数推进；构造函数覆盖常用单位，配置项里的浮点秒数走
//! `from_secs_f64`。

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// 仿真时间（纳秒）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    pub fn from_micros(us: u64) -> SimTime {
        SimTime(us.saturating_mul(1_000))
    }

    pub fn from_millis(ms: u64) -> SimTime {
        SimTime(ms.saturating_mul(1_000_000))
    }

    pub fn from_secs(s: u64) -> SimTime {
        SimTime(s.saturating_mul(NANOS_PER_SEC))
    }

    /// 从秒（浮点）构造；非正值按零处理。
    pub fn from_secs_f64(s: f64) -> SimTime {
        if s <= 0.0 {
            return SimTime::ZERO;
        }
        SimTime((s * NANOS_PER_SEC as f64).round() as u64)
    }
}
