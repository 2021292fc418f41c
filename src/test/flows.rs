use crate::net::{ACK_BYTES, NetWorld, Packet, PacketKind};
use crate::queue::{QueueKind, make_queue};
use crate::route::{RandomCore, RouteGenerator};
use crate::sim::{Event, FlowGenerator, SimTime, Simulator, SizeDist, World};
use crate::topo::{LeafSpineOpts, LeafSpineTopology, build_leaf_spine};

fn small_world(opts: &LeafSpineOpts) -> (NetWorld, LeafSpineTopology) {
    let mut world = NetWorld::default();
    let topo = build_leaf_spine(&mut world.net, opts).expect("build");
    (world, topo)
}

fn small_opts() -> LeafSpineOpts {
    LeafSpineOpts {
        core_count: 2,
        leaf_count: 2,
        servers_per_leaf: 2,
        ..LeafSpineOpts::default()
    }
}

#[test]
fn single_flow_completes_and_releases_its_routes() {
    let (mut world, topo) = small_world(&small_opts());
    let mut sim = Simulator::default();

    let mut rgen = RouteGenerator::new(topo, Box::new(RandomCore::new(1)), 1);
    let routes = rgen.generate_between(0, 3);

    world.net.start_flow(
        1,
        routes.fwd,
        routes.rev,
        routes.src_id,
        routes.dst_id,
        3_000,
        1_500,
        SimTime::from_micros(1),
        &mut sim,
    );
    assert_eq!(world.net.flow_count(), 1);

    sim.run(&mut world);

    assert_eq!(world.net.stats.generated_flows, 1);
    assert_eq!(world.net.stats.completed_flows, 1);
    assert_eq!(world.net.flow_count(), 0);
    assert!(world.net.flow(1).is_none());

    // 2 个数据包 + 2 个 ack。
    assert_eq!(world.net.stats.delivered_pkts, 4);
    assert_eq!(
        world.net.stats.delivered_bytes,
        3_000 + 2 * ACK_BYTES as u64
    );
    assert_eq!(world.net.stats.dropped_pkts, 0);
}

#[test]
fn last_packet_carries_the_remainder() {
    let (mut world, topo) = small_world(&small_opts());
    let mut sim = Simulator::default();

    let mut rgen = RouteGenerator::new(topo, Box::new(RandomCore::new(2)), 2);
    let routes = rgen.generate_between(1, 2);

    // 2000 字节切成 1500 + 500。
    world.net.start_flow(
        7,
        routes.fwd,
        routes.rev,
        routes.src_id,
        routes.dst_id,
        2_000,
        1_500,
        SimTime::from_micros(1),
        &mut sim,
    );

    sim.run(&mut world);

    assert_eq!(world.net.stats.completed_flows, 1);
    assert_eq!(world.net.stats.delivered_pkts, 4);
    assert_eq!(
        world.net.stats.delivered_bytes,
        2_000 + 2 * ACK_BYTES as u64
    );
}

#[test]
fn poisson_workload_drains_to_an_empty_flow_table() {
    let (mut world, topo) = small_world(&small_opts());
    let mut sim = Simulator::default();

    let rgen = RouteGenerator::new(topo, Box::new(RandomCore::new(11)), 11);
    let mut flow_gen = FlowGenerator::new(rgen, 1_000_000_000, 10_000, SizeDist::Fixed, 11);
    flow_gen.set_time_limits(SimTime::ZERO, SimTime::from_millis(1));
    let handle = flow_gen.install(&mut sim);

    // 到达窗之后不再有新流，余下事件把在途流全部跑完。
    sim.run(&mut world);

    let generated = handle.lock().expect("flow generator lock").flows_generated();
    assert!(generated > 0);
    assert_eq!(world.net.stats.generated_flows, generated);
    assert_eq!(world.net.stats.completed_flows, generated);
    assert_eq!(world.net.flow_count(), 0);
    assert_eq!(world.net.stats.dropped_pkts, 0);
}

#[test]
fn exponential_sizes_complete_under_light_load() {
    let (mut world, topo) = small_world(&small_opts());
    let mut sim = Simulator::default();

    let rgen = RouteGenerator::new(topo, Box::new(RandomCore::new(23)), 23);
    let mut flow_gen = FlowGenerator::new(rgen, 1_000_000_000, 20_000, SizeDist::Exponential, 23);
    flow_gen.set_time_limits(SimTime::ZERO, SimTime::from_millis(2));
    let handle = flow_gen.install(&mut sim);

    sim.run(&mut world);

    let generated = handle.lock().expect("flow generator lock").flows_generated();
    assert!(generated > 0);
    assert_eq!(world.net.stats.completed_flows, generated);
    assert_eq!(world.net.flow_count(), 0);
}

#[test]
fn ack_priority_fabric_completes_flows_too() {
    let opts = LeafSpineOpts {
        queue_kind: QueueKind::AckPriority,
        ..small_opts()
    };
    let (mut world, topo) = small_world(&opts);
    let mut sim = Simulator::default();

    let mut rgen = RouteGenerator::new(topo, Box::new(RandomCore::new(5)), 5);
    let routes = rgen.generate_between(0, 2);

    world.net.start_flow(
        1,
        routes.fwd,
        routes.rev,
        routes.src_id,
        routes.dst_id,
        15_000,
        1_500,
        SimTime::from_micros(1),
        &mut sim,
    );
    sim.run(&mut world);

    assert_eq!(world.net.stats.completed_flows, 1);
    assert_eq!(world.net.flow_count(), 0);
}

/// 在指定时刻把一个 packet 从它的源节点转发出去。
struct ForwardPacket {
    pkt: Packet,
}

impl Event for ForwardPacket {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let ForwardPacket { pkt } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<NetWorld>()
            .expect("world must be NetWorld");
        let from = pkt.src();
        w.net.forward_from(from, pkt, sim);
    }
}

#[test]
fn link_serializes_one_packet_at_a_time_even_on_timestamp_ties() {
    let mut world = NetWorld::default();
    let a = world.net.add_server("a");
    let b = world.net.add_server("b");
    // 1 Mbps：一个 1500B packet 序列化 12ms。
    world.net.connect(
        a,
        b,
        SimTime::from_micros(10),
        1_000_000,
        make_queue(QueueKind::DropTail, 10_000),
    );

    let mut sim = Simulator::default();
    let route = vec![a, b];
    let p1 = world.net.make_packet(1, 1_500, PacketKind::Data, route.clone());
    let p2 = world.net.make_packet(1, 1_500, PacketKind::Data, route.clone());
    let p3 = world.net.make_packet(1, 1_500, PacketKind::Data, route);

    // p3 的转发事件先入队：它在 t=12ms 与第一次发送的链路就绪事件同
    // 时刻执行，且排在前面。
    sim.schedule(SimTime(12_000_000), ForwardPacket { pkt: p3 });
    world.net.forward_from(a, p1, &mut sim);
    world.net.forward_from(a, p2, &mut sim);

    sim.run(&mut world);

    // 三个 packet 必须逐个序列化：3 x 12ms + 10us，不允许并行占用链路。
    assert_eq!(world.net.stats.delivered_pkts, 3);
    assert_eq!(world.net.stats.dropped_pkts, 0);
    assert_eq!(sim.now(), SimTime(36_010_000));
}

#[test]
fn overflowed_queue_drops_packets_and_the_flow_never_completes() {
    // 端点缓冲只装得下一个整包，链路又慢，背靠背注入必然溢出。
    let opts = LeafSpineOpts {
        core_count: 1,
        leaf_count: 2,
        servers_per_leaf: 1,
        leaf_link_bps: 1_000_000,
        core_link_bps: 1_000_000,
        leaf_buffer_bytes: 1_500,
        core_buffer_bytes: 1_500,
        endpoint_buffer_bytes: 1_500,
        ..LeafSpineOpts::default()
    };
    let (mut world, topo) = small_world(&opts);
    let mut sim = Simulator::default();

    let mut rgen = RouteGenerator::new(topo, Box::new(RandomCore::new(0)), 0);
    let routes = rgen.generate_between(0, 1);

    world.net.start_flow(
        1,
        routes.fwd,
        routes.rev,
        routes.src_id,
        routes.dst_id,
        15_000,
        1_500,
        SimTime(1),
        &mut sim,
    );
    sim.run(&mut world);

    assert!(world.net.stats.dropped_pkts > 0);
    assert_eq!(world.net.stats.completed_flows, 0);
    // 未被完全确认的流留在状态表里，路由不被释放。
    assert_eq!(world.net.flow_count(), 1);
    assert!(world.net.flow(1).is_some());
}
