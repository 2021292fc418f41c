//! 仿真核心模块
//!
//! 此模块包含事件驱动仿真的核心组件：仿真时间、事件、世界、仿真器、
//! 驱动循环以及流到达过程。

// 子模块声明
mod driver;
mod event;
mod flow_gen;
mod scheduled_event;
mod simulator;
mod testbed;
mod time;
mod world;

// 重新导出公共接口
pub use driver::{DriverOutcome, DriverReport, Operator, SimulationDriver, StdinOperator};
pub use event::Event;
pub use flow_gen::{DEFAULT_ENDHOST_RATE_BPS, FlowArrival, FlowGenerator, SizeDist};
pub use scheduled_event::ScheduledEvent;
pub use simulator::Simulator;
pub use testbed::{CoreSelectMode, TestbedSpec, TopologyParams};
pub use time::SimTime;
pub use world::World;
