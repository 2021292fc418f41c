//! 仿真驱动循环
//!
//! 把仿真器泵到事件耗尽，或按批次泵并在每批之后询问操作员是否继续。
//! 驱动层不负责仿真终点：终点由仿真器的 `set_endtime` 执行，这里只在
//! `do_next_event` 返回 `false` 时收尾。

use super::simulator::Simulator;
use super::time::SimTime;
use super::world::World;
use std::io::{self, BufRead, Write};
use tracing::info;

/// 交互模式下每批事件数的默认值。
pub const DEFAULT_BATCH_SIZE: u64 = 1000;

/// 操作员：每批事件之后被询问是否继续。
pub trait Operator {
    fn continue_after(&mut self, events_processed: u64, now: SimTime) -> bool;
}

/// 从标准输入读取操作员应答；只有 `y`/`Y` 视为继续。
#[derive(Debug, Default)]
pub struct StdinOperator;

impl Operator for StdinOperator {
    fn continue_after(&mut self, events_processed: u64, now: SimTime) -> bool {
        print!("\nProcessed {events_processed} events (t={now:?}). Continue? (y/n): ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim(), "y" | "Y")
    }
}

/// 驱动结束的方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverOutcome {
    /// 事件耗尽（或越过仿真终点），任何模式下都可能发生。
    Completed,
    /// 操作员拒绝继续，立即停止。
    Stopped,
}

/// 一次驱动运行的结果。
#[derive(Debug, Clone, Copy)]
pub struct DriverReport {
    pub outcome: DriverOutcome,
    pub events_processed: u64,
}

/// 仿真驱动：非交互模式一口气泵完；交互模式按批泵、每批之后询问操作员。
pub struct SimulationDriver {
    batch_size: u64,
    operator: Option<Box<dyn Operator>>,
}

impl SimulationDriver {
    /// 非交互模式：泵到事件耗尽为止。
    pub fn new() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            operator: None,
        }
    }

    /// 交互模式：每 `batch_size` 个事件之后询问 `operator` 是否继续。
    pub fn interactive(batch_size: u64, operator: Box<dyn Operator>) -> Self {
        assert!(batch_size > 0, "batch_size must be positive");
        Self {
            batch_size,
            operator: Some(operator),
        }
    }

    /// 泵事件直到耗尽或操作员停止。
    pub fn run(&mut self, sim: &mut Simulator, world: &mut dyn World) -> DriverReport {
        let mut processed = 0u64;

        let Some(op) = self.operator.as_mut() else {
            while sim.do_next_event(world) {
                processed += 1;
            }
            info!(events = processed, now = ?sim.now(), "✅ 事件耗尽，驱动完成");
            return DriverReport {
                outcome: DriverOutcome::Completed,
                events_processed: processed,
            };
        };

        loop {
            for _ in 0..self.batch_size {
                if !sim.do_next_event(world) {
                    // 批中途耗尽也直接完成，与非交互模式一致。
                    info!(events = processed, now = ?sim.now(), "✅ 事件耗尽，驱动完成");
                    return DriverReport {
                        outcome: DriverOutcome::Completed,
                        events_processed: processed,
                    };
                }
                processed += 1;
            }
            if !op.continue_after(processed, sim.now()) {
                info!(events = processed, now = ?sim.now(), "⏹️  操作员停止驱动");
                return DriverReport {
                    outcome: DriverOutcome::Stopped,
                    events_processed: processed,
                };
            }
        }
    }
}

impl Default for SimulationDriver {
    fn default() -> Self {
        Self::new()
    }
}
