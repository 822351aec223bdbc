pub use sea_orm_migration::prelude::*;

mod m20250118_073012_event;
mod m20250118_074920_device;
mod m20250118_082455_interface;
mod m20250119_031208_vlan;
mod m20250119_032016_vlan_port;
mod m20250119_055321_oui;
mod m20250119_060010_mac;
mod m20250119_061154_mac_port;
mod m20250120_043522_mac_ip;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250118_073012_event::Migration),
            Box::new(m20250118_074920_device::Migration),
            Box::new(m20250118_082455_interface::Migration),
            Box::new(m20250119_031208_vlan::Migration),
            Box::new(m20250119_032016_vlan_port::Migration),
            Box::new(m20250119_055321_oui::Migration),
            Box::new(m20250119_060010_mac::Migration),
            Box::new(m20250119_061154_mac_port::Migration),
            Box::new(m20250120_043522_mac_ip::Migration),
        ]
    }
}
