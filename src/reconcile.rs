// The reconciliation pipeline. One run ingests a single device snapshot and
// upserts seven entity tables in strict stage order: device, interfaces,
// vlans, vlan memberships, macs, mac-port observations, ip-to-mac bindings.
// Devices reconcile independently and concurrently; the mac and oui tables
// are the only state shared between pipelines.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Instant;

use chrono::Utc;
use log::{debug, warn};
use mac_oui::Oui as OuiDb;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use topomap_entity::*;

use crate::db;
use crate::dns::{Resolver, SystemResolver};
use crate::error::ReconcileError;
use crate::snapshot::{mac_prefix, normalize_ip, normalize_mac, Snapshot};

/// ifAdminStatus / ifOperStatus "up".
const IF_STATUS_UP: i32 = 1;
/// ifAdminStatus "down".
const IF_STATUS_DOWN: i32 = 2;

static SYSTEM_RESOLVER: SystemResolver = SystemResolver;

/// The stage the pipeline is allowed to run next. Each stage runs only when
/// the cursor is exactly at it and advances the cursor on success, so "stage
/// N may run" is a single comparison instead of a collection of flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
    Interfaces,
    Vlans,
    VlanPorts,
    Macs,
    MacPorts,
    MacIps,
    Done,
}

impl Stage {
    fn next(self) -> Stage {
        match self {
            Stage::Interfaces => Stage::Vlans,
            Stage::Vlans => Stage::VlanPorts,
            Stage::VlanPorts => Stage::Macs,
            Stage::Macs => Stage::MacPorts,
            Stage::MacPorts => Stage::MacIps,
            Stage::MacIps | Stage::Done => Stage::Done,
        }
    }
}

/// What one reconcile run touched.
#[derive(Clone, Debug, Default)]
pub struct Summary {
    pub hostname: String,
    pub interfaces: usize,
    pub vlans: usize,
    pub macs: usize,
    /// Addresses this cycle observed that no device had reported before.
    pub new_macs: Vec<String>,
    pub mac_ips: usize,
}

/// Reconcile one snapshot. `dns` enables reverse lookups for learned IP
/// addresses; `oui_db` is the bundled vendor database used to seed the oui
/// table for prefixes not seen before.
pub async fn reconcile(
    db: &DatabaseConnection,
    oui_db: Option<&OuiDb>,
    snapshot: &Snapshot,
    dns: bool,
) -> Result<Summary, ReconcileError> {
    let resolver = if dns {
        Some(&SYSTEM_RESOLVER as &dyn Resolver)
    } else {
        None
    };
    reconcile_with(db, oui_db, snapshot, resolver).await
}

/// As `reconcile`, with the DNS collaborator injected.
pub async fn reconcile_with(
    db: &DatabaseConnection,
    oui_db: Option<&OuiDb>,
    snapshot: &Snapshot,
    resolver: Option<&dyn Resolver>,
) -> Result<Summary, ReconcileError> {
    snapshot.validate()?;
    let started = Instant::now();

    let event = register_event(db, snapshot).await?;
    let device = register_device(db, snapshot, event.event_id).await?;

    let reconciler = Reconciler {
        db,
        oui_db,
        resolver,
        snapshot,
        device,
        event_id: event.event_id,
        stage: Stage::Interfaces,
        failure: None,
        summary: Summary {
            hostname: snapshot.hostname.clone(),
            ..Default::default()
        },
    };
    let summary = reconciler.process().await?;
    debug!(
        "reconciled host {} in {:?}",
        summary.hostname,
        started.elapsed()
    );
    Ok(summary)
}

/// Records the polling cycle itself; rows confirmed by this run are stamped
/// with the returned id.
async fn register_event(
    db: &DatabaseConnection,
    snapshot: &Snapshot,
) -> Result<event::Model, ReconcileError> {
    let row = event::ActiveModel {
        created: Set(Utc::now().naive_utc().to_string()),
        hostname: Set(snapshot.hostname.clone()),
        ..Default::default()
    };
    Ok(row.insert(db).await?)
}

/// Upserts the device row and returns it; every later stage keys off its id.
async fn register_device(
    db: &DatabaseConnection,
    snapshot: &Snapshot,
    event_id: i32,
) -> Result<device::Model, ReconcileError> {
    debug!("updating device table for host {}", snapshot.hostname);
    let model = match db::device_by_hostname(db, &snapshot.hostname).await? {
        Some(found) => {
            let mut row: device::ActiveModel = found.into();
            row.event_id = Set(event_id);
            row.sys_name = Set(snapshot.system.name.clone());
            row.sys_description = Set(snapshot.system.description.clone());
            row.sys_object_id = Set(snapshot.system.object_id.clone());
            row.sys_uptime = Set(snapshot.system.uptime);
            row.last_polled = Set(snapshot.timestamp);
            row.update(db).await?
        }
        None => {
            let row = device::ActiveModel {
                event_id: Set(event_id),
                hostname: Set(snapshot.hostname.clone()),
                name: Set(snapshot.hostname.clone()),
                sys_name: Set(snapshot.system.name.clone()),
                sys_description: Set(snapshot.system.description.clone()),
                sys_object_id: Set(snapshot.system.object_id.clone()),
                sys_uptime: Set(snapshot.system.uptime),
                last_polled: Set(snapshot.timestamp),
                enabled: Set(true),
                ..Default::default()
            };
            row.insert(db).await?
        }
    };
    Ok(model)
}

/// Idle clock for an interface that already has a row. Up-with-link and
/// administratively-down ports are not idle; an enabled port without link
/// keeps the timestamp of the cycle that first saw it idle until the link
/// returns or the port is shut down.
fn idle_since(admin_status: i32, oper_status: i32, recorded: i64, now: i64) -> i64 {
    if admin_status == IF_STATUS_UP && oper_status == IF_STATUS_UP {
        0
    } else if admin_status == IF_STATUS_DOWN {
        0
    } else if recorded != 0 {
        recorded
    } else {
        now
    }
}

struct Reconciler<'a> {
    db: &'a DatabaseConnection,
    oui_db: Option<&'a OuiDb>,
    resolver: Option<&'a dyn Resolver>,
    snapshot: &'a Snapshot,
    device: device::Model,
    event_id: i32,
    stage: Stage,
    failure: Option<ReconcileError>,
    summary: Summary,
}

impl<'a> Reconciler<'a> {
    /// Runs every stage in order. Stages self-gate on the cursor: once one
    /// fails the cursor stops advancing, the rest become no-ops, and the
    /// first store error is the one reported for the cycle.
    async fn process(mut self) -> Result<Summary, ReconcileError> {
        self.run(Stage::Interfaces).await;
        self.run(Stage::Vlans).await;
        self.run(Stage::VlanPorts).await;
        self.run(Stage::Macs).await;
        self.run(Stage::MacPorts).await;
        self.run(Stage::MacIps).await;

        if let Some(err) = self.failure {
            return Err(err);
        }
        Ok(self.summary)
    }

    async fn run(&mut self, stage: Stage) {
        if self.stage != stage {
            warn!(
                "invalid update sequence for stage {:?} when processing host {}",
                stage, self.device.hostname
            );
            return;
        }
        debug!("starting {:?} for host {}", stage, self.device.hostname);
        let outcome = match stage {
            Stage::Interfaces => self.interfaces().await,
            Stage::Vlans => self.vlans().await,
            Stage::VlanPorts => self.vlan_ports().await,
            Stage::Macs => self.macs().await,
            Stage::MacPorts => self.mac_ports().await,
            Stage::MacIps => self.mac_ips().await,
            Stage::Done => Ok(()),
        };
        match outcome {
            Ok(()) => {
                debug!("completed {:?} for host {}", stage, self.device.hostname);
                self.stage = stage.next();
            }
            Err(err) => {
                warn!(
                    "{:?} failed for host {}: {}",
                    stage, self.device.hostname, err
                );
                self.failure.get_or_insert(err);
            }
        }
    }

    /// One row per (device, ifindex). Existing rows run the idle clock and
    /// have every descriptive field overwritten; new rows start not-idle.
    async fn interfaces(&mut self) -> Result<(), ReconcileError> {
        let db = self.db;
        let snapshot = self.snapshot;
        let device_id = self.device.device_id;
        let event_id = self.event_id;

        let existing: HashMap<i64, interface::Model> = db::interfaces_for_device(db, device_id)
            .await?
            .into_iter()
            .map(|row| (row.ifindex, row))
            .collect();

        let mut inserts = Vec::new();
        for (&ifindex, facts) in &snapshot.interfaces {
            self.summary.interfaces += 1;
            match existing.get(&ifindex) {
                Some(found) => {
                    let idle = idle_since(
                        facts.admin_status,
                        facts.oper_status,
                        found.idle_since,
                        snapshot.timestamp,
                    );
                    let mut row: interface::ActiveModel = found.clone().into();
                    row.event_id = Set(event_id);
                    row.admin_status = Set(facts.admin_status);
                    row.oper_status = Set(facts.oper_status);
                    row.speed = Set(facts.speed);
                    row.alias = Set(facts.alias.clone());
                    row.description = Set(facts.description.clone());
                    row.duplex = Set(facts.duplex);
                    row.ethernet = Set(facts.ethernet);
                    row.native_vlan = Set(facts.native_vlan);
                    row.trunk = Set(facts.trunk);
                    row.remote_device = Set(facts.neighbor.remote_device.clone());
                    row.remote_port = Set(facts.neighbor.remote_port.clone());
                    row.platform = Set(facts.neighbor.platform.clone());
                    row.remote_port_description =
                        Set(facts.neighbor.remote_port_description.clone());
                    row.remote_capabilities = Set(facts.neighbor.remote_capabilities.clone());
                    row.remote_system_description =
                        Set(facts.neighbor.remote_system_description.clone());
                    row.remote_system_name = Set(facts.neighbor.remote_system_name.clone());
                    row.idle_since = Set(idle);
                    row.update(db).await?;
                }
                None => inserts.push(interface::ActiveModel {
                    device_id: Set(device_id),
                    event_id: Set(event_id),
                    ifindex: Set(ifindex),
                    admin_status: Set(facts.admin_status),
                    oper_status: Set(facts.oper_status),
                    speed: Set(facts.speed),
                    alias: Set(facts.alias.clone()),
                    description: Set(facts.description.clone()),
                    duplex: Set(facts.duplex),
                    ethernet: Set(facts.ethernet),
                    native_vlan: Set(facts.native_vlan),
                    trunk: Set(facts.trunk),
                    remote_device: Set(facts.neighbor.remote_device.clone()),
                    remote_port: Set(facts.neighbor.remote_port.clone()),
                    platform: Set(facts.neighbor.platform.clone()),
                    remote_port_description: Set(facts.neighbor.remote_port_description.clone()),
                    remote_capabilities: Set(facts.neighbor.remote_capabilities.clone()),
                    remote_system_description: Set(facts
                        .neighbor
                        .remote_system_description
                        .clone()),
                    remote_system_name: Set(facts.neighbor.remote_system_name.clone()),
                    idle_since: Set(0),
                    enabled: Set(true),
                    ..Default::default()
                }),
            }
        }
        db::insert_interfaces(db, inserts).await?;
        Ok(())
    }

    /// Dedupes the VLAN numbers referenced anywhere on the device before any
    /// lookup, then updates or batch-inserts one row per (device, vlan).
    async fn vlans(&mut self) -> Result<(), ReconcileError> {
        let db = self.db;
        let device_id = self.device.device_id;
        let event_id = self.event_id;

        let mut numbers: BTreeSet<i32> = BTreeSet::new();
        for facts in self.snapshot.interfaces.values() {
            numbers.extend(facts.vlans.iter().copied());
        }
        self.summary.vlans = numbers.len();

        let existing: HashMap<i32, vlan::Model> = db::vlans_for_device(db, device_id)
            .await?
            .into_iter()
            .map(|row| (row.number, row))
            .collect();

        let mut inserts = Vec::new();
        for number in numbers {
            match existing.get(&number) {
                Some(found) => {
                    let mut row: vlan::ActiveModel = found.clone().into();
                    row.event_id = Set(event_id);
                    row.enabled = Set(true);
                    row.update(db).await?;
                }
                None => inserts.push(vlan::ActiveModel {
                    device_id: Set(device_id),
                    event_id: Set(event_id),
                    number: Set(number),
                    name: Set(None),
                    state: Set(0),
                    enabled: Set(true),
                    ..Default::default()
                }),
            }
        }
        db::insert_vlans(db, inserts).await?;
        Ok(())
    }

    /// Joins interfaces to the VLANs they carry. Either side missing means
    /// that single association is dropped, never the stage.
    async fn vlan_ports(&mut self) -> Result<(), ReconcileError> {
        let db = self.db;
        let snapshot = self.snapshot;
        let device_id = self.device.device_id;
        let event_id = self.event_id;

        let interfaces: HashMap<i64, interface::Model> = db::interfaces_for_device(db, device_id)
            .await?
            .into_iter()
            .map(|row| (row.ifindex, row))
            .collect();
        let vlans: HashMap<i32, vlan::Model> = db::vlans_for_device(db, device_id)
            .await?
            .into_iter()
            .map(|row| (row.number, row))
            .collect();
        let interface_ids: Vec<i32> = interfaces.values().map(|row| row.interface_id).collect();
        let existing: HashMap<(i32, i32), vlan_port::Model> =
            db::vlan_ports_for_interfaces(db, &interface_ids)
                .await?
                .into_iter()
                .map(|row| ((row.interface_id, row.vlan_id), row))
                .collect();

        let mut inserts = Vec::new();
        for (ifindex, facts) in &snapshot.interfaces {
            let iface = match interfaces.get(ifindex) {
                Some(row) => row,
                None => {
                    debug!(
                        "skipping vlans on unresolved ifindex {} for host {}",
                        ifindex, self.device.hostname
                    );
                    continue;
                }
            };
            let mut numbers = facts.vlans.clone();
            numbers.sort_unstable();
            numbers.dedup();
            for number in numbers {
                let vlan_row = match vlans.get(&number) {
                    Some(row) => row,
                    None => {
                        debug!(
                            "skipping unresolved vlan {} on ifindex {} for host {}",
                            number, ifindex, self.device.hostname
                        );
                        continue;
                    }
                };
                match existing.get(&(iface.interface_id, vlan_row.vlan_id)) {
                    Some(found) => {
                        let mut row: vlan_port::ActiveModel = found.clone().into();
                        row.event_id = Set(event_id);
                        row.enabled = Set(true);
                        row.update(db).await?;
                    }
                    None => inserts.push(vlan_port::ActiveModel {
                        interface_id: Set(iface.interface_id),
                        vlan_id: Set(vlan_row.vlan_id),
                        event_id: Set(event_id),
                        enabled: Set(true),
                        ..Default::default()
                    }),
                }
            }
        }
        db::insert_vlan_ports(db, inserts).await?;
        Ok(())
    }

    /// Dedupes every MAC learned on the device's known interfaces, resolves
    /// each vendor prefix once, and upserts the globally shared mac table.
    /// Inserts go through insert-or-ignore so two pipelines observing the
    /// same address cannot double-insert it.
    async fn macs(&mut self) -> Result<(), ReconcileError> {
        let db = self.db;
        let snapshot = self.snapshot;
        let device_id = self.device.device_id;
        let event_id = self.event_id;

        let known: HashSet<i64> = db::interfaces_for_device(db, device_id)
            .await?
            .into_iter()
            .map(|row| row.ifindex)
            .collect();

        let mut unique_macs: BTreeSet<String> = BTreeSet::new();
        for (ifindex, facts) in &snapshot.interfaces {
            if !known.contains(ifindex) {
                continue;
            }
            for raw in &facts.macs {
                match normalize_mac(raw) {
                    Some(address) => {
                        unique_macs.insert(address);
                    }
                    None => debug!(
                        "dropping malformed mac {:?} on host {}",
                        raw, self.device.hostname
                    ),
                }
            }
        }
        self.summary.macs = unique_macs.len();

        let unknown_oui = db::ensure_unknown_oui(db).await?;
        let prefixes: BTreeSet<String> = unique_macs.iter().map(|mac| mac_prefix(mac)).collect();
        let mut vendor_ids: HashMap<String, i32> = HashMap::new();
        for prefix in prefixes {
            let oui_id = self.resolve_oui(&prefix, unknown_oui).await?;
            vendor_ids.insert(prefix, oui_id);
        }

        let existing: HashMap<String, mac::Model> =
            db::macs_by_address(db, unique_macs.iter().cloned())
                .await?
                .into_iter()
                .map(|row| (row.address.clone(), row))
                .collect();

        let mut inserts = Vec::new();
        for address in &unique_macs {
            let oui_id = vendor_ids
                .get(&mac_prefix(address))
                .copied()
                .unwrap_or(unknown_oui);
            match existing.get(address) {
                Some(found) => {
                    let mut row: mac::ActiveModel = found.clone().into();
                    row.event_id = Set(event_id);
                    row.oui_id = Set(oui_id);
                    row.enabled = Set(true);
                    row.update(db).await?;
                }
                None => {
                    self.summary.new_macs.push(address.clone());
                    inserts.push(mac::ActiveModel {
                        oui_id: Set(oui_id),
                        event_id: Set(event_id),
                        address: Set(address.clone()),
                        enabled: Set(true),
                        ..Default::default()
                    });
                }
            }
        }
        db::insert_macs(db, inserts).await?;
        Ok(())
    }

    /// Vendor id for a prefix: the oui table first, then the bundled vendor
    /// database (seeding the table for next time), then the sentinel row.
    async fn resolve_oui(&self, prefix: &str, unknown_oui: i32) -> Result<i32, ReconcileError> {
        if let Some(found) = db::oui_by_prefix(self.db, prefix).await? {
            return Ok(found.oui_id);
        }
        let vendor = match self.oui_db.and_then(|db| vendor_for_prefix(db, prefix)) {
            Some(name) => name,
            None => return Ok(unknown_oui),
        };
        db::insert_ouis(
            self.db,
            vec![oui::ActiveModel {
                prefix: Set(prefix.to_string()),
                vendor: Set(vendor),
                ..Default::default()
            }],
        )
        .await?;
        // Re-select: another device pipeline may have won the insert.
        match db::oui_by_prefix(self.db, prefix).await? {
            Some(found) => Ok(found.oui_id),
            None => Ok(unknown_oui),
        }
    }

    /// Joins interfaces to the MACs learned on them, skipping any pair where
    /// either side is unresolved.
    async fn mac_ports(&mut self) -> Result<(), ReconcileError> {
        let db = self.db;
        let snapshot = self.snapshot;
        let device_id = self.device.device_id;
        let event_id = self.event_id;

        let interfaces: HashMap<i64, interface::Model> = db::interfaces_for_device(db, device_id)
            .await?
            .into_iter()
            .map(|row| (row.ifindex, row))
            .collect();

        let mut addresses: BTreeSet<String> = BTreeSet::new();
        for facts in snapshot.interfaces.values() {
            addresses.extend(facts.macs.iter().filter_map(|raw| normalize_mac(raw)));
        }
        let macs: HashMap<String, mac::Model> = db::macs_by_address(db, addresses.into_iter())
            .await?
            .into_iter()
            .map(|row| (row.address.clone(), row))
            .collect();

        let interface_ids: Vec<i32> = interfaces.values().map(|row| row.interface_id).collect();
        let existing: HashMap<(i32, i32), mac_port::Model> =
            db::mac_ports_for_interfaces(db, &interface_ids)
                .await?
                .into_iter()
                .map(|row| ((row.interface_id, row.mac_id), row))
                .collect();

        let mut inserts = Vec::new();
        for (ifindex, facts) in &snapshot.interfaces {
            let iface = match interfaces.get(ifindex) {
                Some(row) => row,
                None => {
                    debug!(
                        "skipping macs on unresolved ifindex {} for host {}",
                        ifindex, self.device.hostname
                    );
                    continue;
                }
            };
            let mut sorted: Vec<String> =
                facts.macs.iter().filter_map(|raw| normalize_mac(raw)).collect();
            sorted.sort_unstable();
            sorted.dedup();
            for address in sorted {
                let mac_row = match macs.get(&address) {
                    Some(row) => row,
                    None => {
                        debug!(
                            "skipping unresolved mac {} on ifindex {} for host {}",
                            address, ifindex, self.device.hostname
                        );
                        continue;
                    }
                };
                match existing.get(&(iface.interface_id, mac_row.mac_id)) {
                    Some(found) => {
                        let mut row: mac_port::ActiveModel = found.clone().into();
                        row.event_id = Set(event_id);
                        row.enabled = Set(true);
                        row.update(db).await?;
                    }
                    None => inserts.push(mac_port::ActiveModel {
                        interface_id: Set(iface.interface_id),
                        mac_id: Set(mac_row.mac_id),
                        event_id: Set(event_id),
                        enabled: Set(true),
                        ..Default::default()
                    }),
                }
            }
        }
        db::insert_mac_ports(db, inserts).await?;
        Ok(())
    }

    /// Learned IP-to-MAC bindings from the optional neighbor tables, with
    /// best-effort reverse DNS. A MAC seen only in a neighbor table but never
    /// on an interface cannot be linked and is dropped.
    async fn mac_ips(&mut self) -> Result<(), ReconcileError> {
        let db = self.db;
        let snapshot = self.snapshot;
        let device_id = self.device.device_id;
        let event_id = self.event_id;
        let resolver = self.resolver;

        let mut candidates: Vec<(String, String, i32)> = Vec::new();
        let tables = [
            (&snapshot.ipv4_neighbors, 4),
            (&snapshot.ipv6_neighbors, 6),
        ];
        for (table, version) in tables {
            for (raw_ip, raw_mac) in table {
                let address = match normalize_ip(raw_ip, version) {
                    Some(address) => address,
                    None => {
                        debug!(
                            "dropping invalid neighbor address {:?} for host {}",
                            raw_ip, self.device.hostname
                        );
                        continue;
                    }
                };
                let mac_address = match normalize_mac(raw_mac) {
                    Some(mac_address) => mac_address,
                    None => {
                        debug!(
                            "dropping neighbor {} with malformed mac {:?} for host {}",
                            address, raw_mac, self.device.hostname
                        );
                        continue;
                    }
                };
                candidates.push((address, mac_address, version));
            }
        }

        let macs: HashMap<String, mac::Model> = db::macs_by_address(
            db,
            candidates
                .iter()
                .map(|(_, mac_address, _)| mac_address.clone())
                .collect::<BTreeSet<String>>(),
        )
        .await?
        .into_iter()
        .map(|row| (row.address.clone(), row))
        .collect();

        let existing: HashMap<(i32, String), mac_ip::Model> =
            db::mac_ips_for_device(db, device_id)
                .await?
                .into_iter()
                .map(|row| ((row.mac_id, row.address.clone()), row))
                .collect();

        // Sorted order keeps the update sequence deterministic.
        candidates.sort();
        let mut inserts = Vec::new();
        for (address, mac_address, version) in candidates {
            let mac_row = match macs.get(&mac_address) {
                Some(row) => row,
                None => {
                    debug!(
                        "skipping neighbor {} -> {}: mac never learned on an interface of host {}",
                        address, mac_address, self.device.hostname
                    );
                    continue;
                }
            };
            let hostname = match resolver {
                Some(resolver) => address
                    .parse()
                    .ok()
                    .and_then(|ip| resolver.reverse_lookup(ip)),
                None => None,
            };
            self.summary.mac_ips += 1;
            match existing.get(&(mac_row.mac_id, address.clone())) {
                Some(found) => {
                    let mut row: mac_ip::ActiveModel = found.clone().into();
                    row.event_id = Set(event_id);
                    row.hostname = Set(hostname);
                    row.version = Set(version);
                    row.enabled = Set(true);
                    row.update(db).await?;
                }
                None => inserts.push(mac_ip::ActiveModel {
                    device_id: Set(device_id),
                    mac_id: Set(mac_row.mac_id),
                    event_id: Set(event_id),
                    address: Set(address),
                    hostname: Set(hostname),
                    version: Set(version),
                    enabled: Set(true),
                    ..Default::default()
                }),
            }
        }
        db::insert_mac_ips(db, inserts).await?;
        Ok(())
    }
}

/// Vendor lookup against the bundled database, which wants a full
/// colon-separated MAC.
fn vendor_for_prefix(oui_db: &OuiDb, prefix: &str) -> Option<String> {
    let mac = format!(
        "{}:{}:{}:00:00:00",
        &prefix[0..2],
        &prefix[2..4],
        &prefix[4..6]
    );
    match oui_db.lookup_by_mac(&mac) {
        Ok(Some(record)) => Some(record.company_name.to_string()),
        Ok(None) => None,
        Err(e) => {
            warn!("vendor lookup failed for prefix {}: {}", prefix, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{InterfaceFacts, System};
    use sea_orm::{ConnectOptions, Database, EntityTrait, PaginatorTrait};
    use topomap_migration::{Migrator, MigratorTrait};

    async fn test_db() -> DatabaseConnection {
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
                description: "test switch".to_string(),
                object_id: ".1.3.6.1.4.1.9.1.1208".to_string(),
                uptime: 86400,
            },
            ..Default::default()
        }
    }

    #[test]
    fn idle_clock_resets_when_port_is_active() {
        assert_eq!(idle_since(1, 1, 1700000000, 1700000600), 0);
    }

    #[test]
    fn idle_clock_resets_when_port_is_shut_down() {
        assert_eq!(idle_since(2, 2, 1700000000, 1700000600), 0);
    }

    #[test]
    fn idle_clock_starts_when_link_is_lost() {
        assert_eq!(idle_since(1, 2, 0, 1700000600), 1700000600);
    }

    #[test]
    fn idle_clock_is_sticky_while_idle() {
        assert_eq!(idle_since(1, 2, 1700000000, 1700000600), 1700000000);
    }

    #[tokio::test]
    async fn malformed_snapshot_writes_nothing() {
        let db = test_db().await;
        let mut bad = snapshot("sw1", 1700000000);
        bad.hostname = String::new();

        let err = reconcile(&db, None, &bad, false).await.unwrap_err();
        assert!(matches!(err, ReconcileError::MalformedSnapshot(_)));
        assert_eq!(device::Entity::find().count(&db).await.unwrap(), 0);
        assert_eq!(event::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn stalled_cursor_skips_downstream_stages() {
        let db = test_db().await;
        let mut snap = snapshot("sw1", 1700000000);
        snap.interfaces.insert(
            1,
            InterfaceFacts {
                admin_status: 1,
                oper_status: 1,
                vlans: vec![100],
                macs: vec!["aa:bb:cc:dd:ee:ff".to_string()],
                ..Default::default()
            },
        );

        let event = register_event(&db, &snap).await.unwrap();
        let device = register_device(&db, &snap, event.event_id).await.unwrap();
        let mut reconciler = Reconciler {
            db: &db,
            oui_db: None,
            resolver: None,
            snapshot: &snap,
            device,
            event_id: event.event_id,
            stage: Stage::Interfaces,
            failure: None,
            summary: Summary::default(),
        };

        // The interface stage never ran, so everything downstream must no-op.
        reconciler.run(Stage::Vlans).await;
        reconciler.run(Stage::VlanPorts).await;
        reconciler.run(Stage::Macs).await;
        reconciler.run(Stage::MacPorts).await;
        reconciler.run(Stage::MacIps).await;

        assert_eq!(reconciler.stage, Stage::Interfaces);
        assert_eq!(interface::Entity::find().count(&db).await.unwrap(), 0);
        assert_eq!(vlan::Entity::find().count(&db).await.unwrap(), 0);
        assert_eq!(vlan_port::Entity::find().count(&db).await.unwrap(), 0);
        assert_eq!(mac::Entity::find().count(&db).await.unwrap(), 0);
        assert_eq!(mac_port::Entity::find().count(&db).await.unwrap(), 0);
        assert_eq!(mac_ip::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn registrar_updates_in_place() {
        let db = test_db().await;
        let snap = snapshot("sw1", 1700000000);

        let event = register_event(&db, &snap).await.unwrap();
        let first = register_device(&db, &snap, event.event_id).await.unwrap();

        let mut later = snapshot("sw1", 1700000900);
        later.system.description = "reprovisioned".to_string();
        let event = register_event(&db, &later).await.unwrap();
        let second = register_device(&db, &later, event.event_id).await.unwrap();

        assert_eq!(first.device_id, second.device_id);
        assert_eq!(second.last_polled, 1700000900);
        assert_eq!(second.sys_description, "reprovisioned");
        assert_eq!(device::Entity::find().count(&db).await.unwrap(), 1);
    }
}
