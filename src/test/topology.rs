use crate::error::ConfigError;
use crate::net::{MemObserver, Network, ObsEvent};
use crate::sim::SimTime;
use crate::topo::{LeafSpineOpts, build_leaf_spine};

fn small_opts(core_count: usize, leaf_count: usize, servers_per_leaf: usize) -> LeafSpineOpts {
    LeafSpineOpts {
        core_count,
        leaf_count,
        servers_per_leaf,
        ..LeafSpineOpts::default()
    }
}

#[test]
fn leaf_spine_link_and_node_counts_match_full_mesh() {
    let mut net = Network::default();
    let opts = small_opts(3, 4, 2);
    let topo = build_leaf_spine(&mut net, &opts).expect("build");

    assert_eq!(topo.leaf_switches.len(), 4);
    assert_eq!(topo.core_switches.len(), 3);
    assert_eq!(topo.servers.len(), 8);
    assert_eq!(topo.server_count(), 8);
    assert_eq!(net.node_count(), 4 + 3 + 8);

    // leaf*core*2 条骨干链路 + leaf*servers_per_leaf*2 条 server 挂接。
    assert_eq!(net.link_count(), 4 * 3 * 2 + 4 * 2 * 2);

    // 每对 (leaf, core) 每个方向恰好一条。
    for i in 0..4 {
        for j in 0..3 {
            let up = net.link_between(topo.leaf(i), topo.core(j)).expect("up link");
            let down = net.link_between(topo.core(j), topo.leaf(i)).expect("down link");
            assert_ne!(up, down);
        }
    }
}

#[test]
fn leaf_spine_attachment_lists_cover_both_directions() {
    let mut net = Network::default();
    let opts = small_opts(3, 4, 2);
    let topo = build_leaf_spine(&mut net, &opts).expect("build");

    for i in 0..4 {
        // 每个 leaf：到每个 core 两个方向 + 每个 server 两个方向。
        assert_eq!(net.attached_links(topo.leaf(i)).len(), 3 * 2 + 2 * 2);
    }
    for j in 0..3 {
        assert_eq!(net.attached_links(topo.core(j)).len(), 4 * 2);
    }
    for &srv in &topo.servers {
        assert_eq!(net.attached_links(srv).len(), 2);
    }
}

#[test]
fn leaf_spine_link_rates_and_buffers_follow_direction() {
    let mut net = Network::default();
    let opts = small_opts(2, 2, 1);
    let topo = build_leaf_spine(&mut net, &opts).expect("build");

    let up = net
        .link_between(topo.leaf(0), topo.core(0))
        .expect("up link");
    assert_eq!(net.link(up).bandwidth_bps, opts.leaf_link_bps);
    assert_eq!(net.link(up).queue.capacity_bytes(), opts.leaf_buffer_bytes);

    let down = net
        .link_between(topo.core(0), topo.leaf(0))
        .expect("down link");
    assert_eq!(net.link(down).bandwidth_bps, opts.core_link_bps);
    assert_eq!(net.link(down).queue.capacity_bytes(), opts.core_buffer_bytes);

    let srv_up = net
        .link_between(topo.server(0), topo.leaf(0))
        .expect("server uplink");
    assert_eq!(net.link(srv_up).bandwidth_bps, opts.leaf_link_bps);
    assert_eq!(
        net.link(srv_up).queue.capacity_bytes(),
        opts.endpoint_buffer_bytes
    );

    let srv_down = net
        .link_between(topo.leaf(0), topo.server(0))
        .expect("server downlink");
    assert_eq!(net.link(srv_down).queue.capacity_bytes(), opts.leaf_buffer_bytes);
}

#[test]
fn leaf_of_maps_servers_to_their_owning_leaf() {
    let mut net = Network::default();
    let topo = build_leaf_spine(&mut net, &small_opts(2, 3, 4)).expect("build");

    assert_eq!(topo.leaf_of(0), 0);
    assert_eq!(topo.leaf_of(3), 0);
    assert_eq!(topo.leaf_of(4), 1);
    assert_eq!(topo.leaf_of(11), 2);
}

#[test]
fn non_positive_counts_fail_the_build() {
    let mut net = Network::default();
    assert_eq!(
        build_leaf_spine(&mut net, &small_opts(0, 4, 2)).unwrap_err(),
        ConfigError::NonPositive {
            what: "core_count",
            got: 0
        }
    );
    assert_eq!(
        build_leaf_spine(&mut net, &small_opts(3, 0, 2)).unwrap_err(),
        ConfigError::NonPositive {
            what: "leaf_count",
            got: 0
        }
    );
    assert_eq!(
        build_leaf_spine(&mut net, &small_opts(3, 4, 0)).unwrap_err(),
        ConfigError::NonPositive {
            what: "servers_per_leaf",
            got: 0
        }
    );
}

#[test]
fn non_positive_rates_and_buffers_fail_the_build() {
    let mut net = Network::default();

    let mut opts = small_opts(2, 2, 1);
    opts.core_link_bps = 0;
    assert_eq!(
        build_leaf_spine(&mut net, &opts).unwrap_err(),
        ConfigError::NonPositive {
            what: "core_link_bps",
            got: 0
        }
    );

    let mut opts = small_opts(2, 2, 1);
    opts.endpoint_buffer_bytes = 0;
    assert_eq!(
        build_leaf_spine(&mut net, &opts).unwrap_err(),
        ConfigError::NonPositive {
            what: "endpoint_buffer_bytes",
            got: 0
        }
    );
}

#[test]
fn zero_hop_delay_is_a_valid_configuration() {
    let mut net = Network::default();
    let mut opts = small_opts(2, 2, 1);
    opts.hop_delay = SimTime::ZERO;

    let topo = build_leaf_spine(&mut net, &opts).expect("build");
    assert_eq!(topo.server_count(), 2);
    assert_eq!(net.link_count(), 2 * 2 * 2 + 2 * 1 * 2);
}

#[test]
fn observer_sees_every_switch_server_and_link_built() {
    let mut net = Network::default();
    let obs = MemObserver::new();
    let handle = obs.handle();
    net.attach_observer(Box::new(obs));

    build_leaf_spine(&mut net, &small_opts(3, 4, 2)).expect("build");

    let events = handle.lock().expect("observer events lock");
    let switches = events
        .iter()
        .filter(|e| matches!(e, ObsEvent::SwitchBuilt { .. }))
        .count();
    let servers = events
        .iter()
        .filter(|e| matches!(e, ObsEvent::ServerBuilt { .. }))
        .count();
    let links = events
        .iter()
        .filter(|e| matches!(e, ObsEvent::LinkBuilt { .. }))
        .count();

    assert_eq!(switches, 4 + 3);
    assert_eq!(servers, 8);
    assert_eq!(links, 4 * 3 * 2 + 4 * 2 * 2);
    assert!(matches!(events[0], ObsEvent::SwitchBuilt { .. }));
}

#[test]
#[should_panic(expected = "out of range")]
fn out_of_range_server_id_panics() {
    let mut net = Network::default();
    let topo = build_leaf_spine(&mut net, &small_opts(2, 2, 1)).expect("build");
    let _ = topo.server(2);
}
