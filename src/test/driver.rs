use crate::sim::{DriverOutcome, Event, Operator, SimTime, SimulationDriver, Simulator, World};
use std::any::Any;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct DummyWorld;

impl World for DummyWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct Noop;

impl Event for Noop {
    fn execute(self: Box<Self>, _sim: &mut Simulator, _world: &mut dyn World) {}
}

/// 按脚本应答的操作员；每次被询问时的已处理事件数记到共享表里。
struct ScriptedOperator {
    responses: Vec<bool>,
    asked_at: Arc<Mutex<Vec<u64>>>,
}

impl ScriptedOperator {
    fn new(responses: Vec<bool>) -> (Self, Arc<Mutex<Vec<u64>>>) {
        let asked_at = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                responses,
                asked_at: Arc::clone(&asked_at),
            },
            asked_at,
        )
    }
}

impl Operator for ScriptedOperator {
    fn continue_after(&mut self, events_processed: u64, _now: SimTime) -> bool {
        self.asked_at
            .lock()
            .expect("asked_at lock")
            .push(events_processed);
        if self.responses.is_empty() {
            return false;
        }
        self.responses.remove(0)
    }
}

fn schedule_noops(sim: &mut Simulator, n: u64) {
    for i in 0..n {
        sim.schedule(SimTime(i), Noop);
    }
}

#[test]
fn non_interactive_driver_pumps_until_exhaustion() {
    let mut sim = Simulator::default();
    let mut world = DummyWorld;
    schedule_noops(&mut sim, 2500);

    let mut driver = SimulationDriver::new();
    let report = driver.run(&mut sim, &mut world);

    assert_eq!(report.outcome, DriverOutcome::Completed);
    assert_eq!(report.events_processed, 2500);
    assert_eq!(sim.pending_events(), 0);
}

#[test]
fn operator_decline_after_first_batch_stops_at_exactly_one_batch() {
    let mut sim = Simulator::default();
    let mut world = DummyWorld;
    schedule_noops(&mut sim, 2500);

    let (op, asked_at) = ScriptedOperator::new(vec![false]);
    let mut driver = SimulationDriver::interactive(1000, Box::new(op));
    let report = driver.run(&mut sim, &mut world);

    assert_eq!(report.outcome, DriverOutcome::Stopped);
    assert_eq!(report.events_processed, 1000);
    assert_eq!(sim.pending_events(), 1500);
    assert_eq!(&*asked_at.lock().expect("asked_at lock"), &[1000]);
}

#[test]
fn operator_always_accepting_reaches_completion_mid_batch() {
    let mut sim = Simulator::default();
    let mut world = DummyWorld;
    schedule_noops(&mut sim, 2500);

    let (op, asked_at) = ScriptedOperator::new(vec![true; 8]);
    let mut driver = SimulationDriver::interactive(1000, Box::new(op));
    let report = driver.run(&mut sim, &mut world);

    // 第三批在 2500 处耗尽，直接完成；只在前两个整批之后被询问过。
    assert_eq!(report.outcome, DriverOutcome::Completed);
    assert_eq!(report.events_processed, 2500);
    assert_eq!(sim.pending_events(), 0);
    assert_eq!(&*asked_at.lock().expect("asked_at lock"), &[1000, 2000]);
}

#[test]
fn exhaustion_inside_first_batch_completes_without_asking() {
    let mut sim = Simulator::default();
    let mut world = DummyWorld;
    schedule_noops(&mut sim, 5);

    let (op, asked_at) = ScriptedOperator::new(vec![]);
    let mut driver = SimulationDriver::interactive(1000, Box::new(op));
    let report = driver.run(&mut sim, &mut world);

    assert_eq!(report.outcome, DriverOutcome::Completed);
    assert_eq!(report.events_processed, 5);
    assert!(asked_at.lock().expect("asked_at lock").is_empty());
}

#[test]
#[should_panic(expected = "batch_size must be positive")]
fn zero_batch_size_is_rejected() {
    let (op, _) = ScriptedOperator::new(vec![]);
    let _ = SimulationDriver::interactive(0, Box::new(op));
}
