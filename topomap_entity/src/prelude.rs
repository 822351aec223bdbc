pub use super::device::Entity as Device;
pub use super::event::Entity as Event;
pub use super::interface::Entity as Interface;
pub use super::mac::Entity as Mac;
pub use super::mac_ip::Entity as MacIp;
pub use super::mac_port::Entity as MacPort;
pub use super::oui::Entity as Oui;
pub use super::vlan::Entity as Vlan;
pub use super::vlan_port::Entity as VlanPort;
