// End-to-end reconciliation against an in-memory store with migrations
// applied, driving the public reconcile entry point the way the spool loop
// does.

use std::net::IpAddr;

use sea_orm::{
    ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter,
};

use topomap::dns::Resolver;
use topomap::reconcile::{reconcile, reconcile_with};
use topomap::snapshot::{InterfaceFacts, Snapshot, System};
use topomap_entity::*;
use topomap_migration::{Migrator, MigratorTrait};

async fn store() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options.max_connections(1);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

fn snapshot(hostname: &str, timestamp: i64) -> Snapshot {
    Snapshot {
        hostname: hostname.to_string(),
        timestamp,
        system: System {
            name: format!("{}.example.net", hostname),
            description: "48 port switch".to_string(),
            object_id: ".1.3.6.1.4.1.9.1.1208".to_string(),
            uptime: 4_500_000,
        },
        ..Default::default()
    }
}

fn access_port(vlan: i32, macs: &[&str]) -> InterfaceFacts {
    InterfaceFacts {
        admin_status: 1,
        oper_status: 1,
        speed: Some(1_000_000_000),
        ethernet: true,
        vlans: vec![vlan],
        macs: macs.iter().map(|mac| mac.to_string()).collect(),
        ..Default::default()
    }
}

#[tokio::test]
async fn full_cycle_populates_every_table() {
    let db = store().await;
    let mut snap = snapshot("sw1", 1_700_000_000);
    snap.interfaces
        .insert(1, access_port(100, &["aa:bb:cc:dd:ee:01"]));
    snap.interfaces
        .insert(2, access_port(200, &["aa:bb:cc:dd:ee:02"]));
    snap.ipv4_neighbors.insert(
        "10.0.0.5".to_string(),
        "aa:bb:cc:dd:ee:01".to_string(),
    );

    let summary = reconcile(&db, None, &snap, false).await.unwrap();
    assert_eq!(summary.interfaces, 2);
    assert_eq!(summary.vlans, 2);
    assert_eq!(summary.macs, 2);
    assert_eq!(summary.new_macs.len(), 2);
    assert_eq!(summary.mac_ips, 1);

    assert_eq!(device::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(interface::Entity::find().count(&db).await.unwrap(), 2);
    assert_eq!(vlan::Entity::find().count(&db).await.unwrap(), 2);
    assert_eq!(vlan_port::Entity::find().count(&db).await.unwrap(), 2);
    assert_eq!(mac::Entity::find().count(&db).await.unwrap(), 2);
    assert_eq!(mac_port::Entity::find().count(&db).await.unwrap(), 2);
    assert_eq!(mac_ip::Entity::find().count(&db).await.unwrap(), 1);

    let binding = mac_ip::Entity::find().one(&db).await.unwrap().unwrap();
    assert_eq!(binding.address, "10.0.0.5");
    assert_eq!(binding.version, 4);
    assert_eq!(binding.hostname, None);
}

#[tokio::test]
async fn reconcile_twice_is_idempotent() {
    let db = store().await;
    let mut snap = snapshot("sw1", 1_700_000_000);
    snap.interfaces
        .insert(1, access_port(100, &["aa:bb:cc:dd:ee:01", "aa:bb:cc:dd:ee:02"]));
    snap.interfaces.insert(2, access_port(100, &[]));
    snap.ipv4_neighbors.insert(
        "10.0.0.5".to_string(),
        "aa:bb:cc:dd:ee:01".to_string(),
    );
    snap.ipv6_neighbors.insert(
        "2001:db8::5".to_string(),
        "aa:bb:cc:dd:ee:02".to_string(),
    );

    reconcile(&db, None, &snap, false).await.unwrap();
    let mut again = snap.clone();
    again.timestamp = 1_700_000_900;
    let summary = reconcile(&db, None, &again, false).await.unwrap();

    // The second cycle confirms rows instead of duplicating them.
    assert!(summary.new_macs.is_empty());
    assert_eq!(device::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(interface::Entity::find().count(&db).await.unwrap(), 2);
    assert_eq!(vlan::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(vlan_port::Entity::find().count(&db).await.unwrap(), 2);
    assert_eq!(mac::Entity::find().count(&db).await.unwrap(), 2);
    assert_eq!(mac_port::Entity::find().count(&db).await.unwrap(), 2);
    assert_eq!(mac_ip::Entity::find().count(&db).await.unwrap(), 2);

    let refreshed = device::Entity::find().one(&db).await.unwrap().unwrap();
    assert_eq!(refreshed.last_polled, 1_700_000_900);
}

#[tokio::test]
async fn shared_vlan_is_deduplicated() {
    let db = store().await;
    let mut snap = snapshot("sw1", 1_700_000_000);
    snap.interfaces.insert(1, access_port(100, &[]));
    snap.interfaces.insert(2, access_port(100, &[]));
    snap.interfaces.insert(3, access_port(100, &[]));

    reconcile(&db, None, &snap, false).await.unwrap();

    assert_eq!(vlan::Entity::find().count(&db).await.unwrap(), 1);
    let row = vlan::Entity::find().one(&db).await.unwrap().unwrap();
    assert_eq!(row.number, 100);
    assert_eq!(vlan_port::Entity::find().count(&db).await.unwrap(), 3);
}

async fn idle_recorded(db: &DatabaseConnection) -> i64 {
    interface::Entity::find()
        .filter(interface::Column::Ifindex.eq(1))
        .one(db)
        .await
        .unwrap()
        .unwrap()
        .idle_since
}

#[tokio::test]
async fn idle_clock_survives_cycles() {
    let db = store().await;

    let cycle = |admin: i32, oper: i32, timestamp: i64| {
        let mut snap = snapshot("sw1", timestamp);
        snap.interfaces.insert(
            1,
            InterfaceFacts {
                admin_status: admin,
                oper_status: oper,
                ethernet: true,
                ..Default::default()
            },
        );
        snap
    };

    // First observation: fresh rows start not-idle.
    reconcile(&db, None, &cycle(1, 1, 1_000), false).await.unwrap();
    assert_eq!(idle_recorded(&db).await, 0);

    // Link lost: the idle clock starts at the poll that noticed.
    reconcile(&db, None, &cycle(1, 2, 2_000), false).await.unwrap();
    assert_eq!(idle_recorded(&db).await, 2_000);

    // Still down a cycle later: the original timestamp sticks.
    reconcile(&db, None, &cycle(1, 2, 3_000), false).await.unwrap();
    assert_eq!(idle_recorded(&db).await, 2_000);

    // Link restored: no longer idle.
    reconcile(&db, None, &cycle(1, 1, 4_000), false).await.unwrap();
    assert_eq!(idle_recorded(&db).await, 0);

    // Down again, then administratively disabled: also not idle.
    reconcile(&db, None, &cycle(1, 2, 5_000), false).await.unwrap();
    assert_eq!(idle_recorded(&db).await, 5_000);
    reconcile(&db, None, &cycle(2, 2, 6_000), false).await.unwrap();
    assert_eq!(idle_recorded(&db).await, 0);
}

#[tokio::test]
async fn concurrent_devices_share_one_mac_row() {
    let db = store().await;
    let mut first = snapshot("sw1", 1_700_000_000);
    first
        .interfaces
        .insert(1, access_port(100, &["aa:bb:cc:dd:ee:ff"]));
    let mut second = snapshot("sw2", 1_700_000_010);
    second
        .interfaces
        .insert(7, access_port(300, &["AA:BB:CC:DD:EE:FF"]));

    let (one, two) = tokio::join!(
        reconcile(&db, None, &first, false),
        reconcile(&db, None, &second, false)
    );
    one.unwrap();
    two.unwrap();

    let macs = mac::Entity::find().all(&db).await.unwrap();
    assert_eq!(macs.len(), 1);
    assert_eq!(macs[0].address, "aabbccddeeff");

    // Both devices' observations reference the same row.
    let ports = mac_port::Entity::find().all(&db).await.unwrap();
    assert_eq!(ports.len(), 2);
    assert!(ports.iter().all(|port| port.mac_id == macs[0].mac_id));
}

#[tokio::test]
async fn neighbor_entry_without_learned_mac_is_dropped() {
    let db = store().await;
    let mut snap = snapshot("sw1", 1_700_000_000);
    snap.interfaces
        .insert(1, access_port(100, &["aa:bb:cc:dd:ee:01"]));
    // Never learned on any interface, so it cannot be linked.
    snap.ipv4_neighbors.insert(
        "10.0.0.9".to_string(),
        "11:22:33:44:55:66".to_string(),
    );
    snap.ipv4_neighbors.insert(
        "10.0.0.5".to_string(),
        "aa:bb:cc:dd:ee:01".to_string(),
    );

    reconcile(&db, None, &snap, false).await.unwrap();

    let bindings = mac_ip::Entity::find().all(&db).await.unwrap();
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].address, "10.0.0.5");
}

#[tokio::test]
async fn invalid_neighbor_addresses_are_dropped() {
    let db = store().await;
    let mut snap = snapshot("sw1", 1_700_000_000);
    snap.interfaces
        .insert(1, access_port(100, &["aa:bb:cc:dd:ee:01"]));
    snap.ipv4_neighbors
        .insert("not-an-ip".to_string(), "aa:bb:cc:dd:ee:01".to_string());
    // An IPv6 address in the IPv4 table is a version mismatch.
    snap.ipv4_neighbors
        .insert("2001:db8::9".to_string(), "aa:bb:cc:dd:ee:01".to_string());
    snap.ipv4_neighbors
        .insert("10.0.0.5".to_string(), "aa:bb:cc:dd:ee:01".to_string());

    reconcile(&db, None, &snap, false).await.unwrap();

    let bindings = mac_ip::Entity::find().all(&db).await.unwrap();
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].address, "10.0.0.5");
}

#[tokio::test]
async fn failed_reverse_dns_leaves_hostname_null() {
    struct FailingResolver;
    impl Resolver for FailingResolver {
        fn reverse_lookup(&self, _ip: IpAddr) -> Option<String> {
            None
        }
    }

    let db = store().await;
    let mut snap = snapshot("sw1", 1_700_000_000);
    snap.interfaces
        .insert(1, access_port(100, &["aa:bb:cc:dd:ee:01"]));
    snap.ipv4_neighbors.insert(
        "10.0.0.5".to_string(),
        "aa:bb:cc:dd:ee:01".to_string(),
    );

    reconcile_with(&db, None, &snap, Some(&FailingResolver))
        .await
        .unwrap();

    let binding = mac_ip::Entity::find().one(&db).await.unwrap().unwrap();
    assert_eq!(binding.address, "10.0.0.5");
    assert_eq!(binding.hostname, None);
}

#[tokio::test]
async fn resolved_hostnames_are_recorded() {
    struct StaticResolver;
    impl Resolver for StaticResolver {
        fn reverse_lookup(&self, ip: IpAddr) -> Option<String> {
            Some(format!("host-{}.example.net", ip))
        }
    }

    let db = store().await;
    let mut snap = snapshot("sw1", 1_700_000_000);
    snap.interfaces
        .insert(1, access_port(100, &["aa:bb:cc:dd:ee:01"]));
    snap.ipv4_neighbors.insert(
        "10.0.0.5".to_string(),
        "aa:bb:cc:dd:ee:01".to_string(),
    );

    reconcile_with(&db, None, &snap, Some(&StaticResolver))
        .await
        .unwrap();

    let binding = mac_ip::Entity::find().one(&db).await.unwrap().unwrap();
    assert_eq!(
        binding.hostname.as_deref(),
        Some("host-10.0.0.5.example.net")
    );
}

#[tokio::test]
async fn cycles_tag_rows_with_their_event() {
    let db = store().await;
    let mut snap = snapshot("sw1", 1_700_000_000);
    snap.interfaces
        .insert(1, access_port(100, &["aa:bb:cc:dd:ee:01"]));

    reconcile(&db, None, &snap, false).await.unwrap();
    let first = device::Entity::find().one(&db).await.unwrap().unwrap();

    let mut again = snap.clone();
    again.timestamp = 1_700_000_900;
    reconcile(&db, None, &again, false).await.unwrap();
    let second = device::Entity::find().one(&db).await.unwrap().unwrap();

    // Each cycle gets its own event, and confirmed rows follow it.
    assert_eq!(event::Entity::find().count(&db).await.unwrap(), 2);
    assert_ne!(first.event_id, second.event_id);
    let port = interface::Entity::find().one(&db).await.unwrap().unwrap();
    assert_eq!(port.event_id, second.event_id);
    let learned = mac::Entity::find().one(&db).await.unwrap().unwrap();
    assert_eq!(learned.event_id, second.event_id);
}
