// Store access. Every table exposes the same primitives the pipeline needs:
// existence lookup by natural key, row update, and a conflict-safe batched
// insert. The unique index behind each natural key makes the inserts
// idempotent and safe when several device pipelines run at once.

use log::debug;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, Database, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};

use topomap_entity::*;

/// Prefix of the sentinel row MACs fall back to when no vendor is known.
pub const UNKNOWN_OUI_PREFIX: &str = "000000";

pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    debug!("connecting to {}", database_url);
    Database::connect(database_url).await
}

pub async fn device_by_hostname(
    db: &DatabaseConnection,
    hostname: &str,
) -> Result<Option<device::Model>, DbErr> {
    device::Entity::find()
        .filter(device::Column::Hostname.eq(hostname))
        .one(db)
        .await
}

pub async fn interfaces_for_device(
    db: &DatabaseConnection,
    device_id: i32,
) -> Result<Vec<interface::Model>, DbErr> {
    interface::Entity::find()
        .filter(interface::Column::DeviceId.eq(device_id))
        .all(db)
        .await
}

pub async fn vlans_for_device(
    db: &DatabaseConnection,
    device_id: i32,
) -> Result<Vec<vlan::Model>, DbErr> {
    vlan::Entity::find()
        .filter(vlan::Column::DeviceId.eq(device_id))
        .all(db)
        .await
}

pub async fn vlan_ports_for_interfaces(
    db: &DatabaseConnection,
    interface_ids: &[i32],
) -> Result<Vec<vlan_port::Model>, DbErr> {
    if interface_ids.is_empty() {
        return Ok(Vec::new());
    }
    vlan_port::Entity::find()
        .filter(vlan_port::Column::InterfaceId.is_in(interface_ids.iter().copied()))
        .all(db)
        .await
}

pub async fn macs_by_address<I>(
    db: &DatabaseConnection,
    addresses: I,
) -> Result<Vec<mac::Model>, DbErr>
where
    I: IntoIterator<Item = String>,
{
    let addresses: Vec<String> = addresses.into_iter().collect();
    if addresses.is_empty() {
        return Ok(Vec::new());
    }
    mac::Entity::find()
        .filter(mac::Column::Address.is_in(addresses))
        .all(db)
        .await
}

pub async fn mac_ports_for_interfaces(
    db: &DatabaseConnection,
    interface_ids: &[i32],
) -> Result<Vec<mac_port::Model>, DbErr> {
    if interface_ids.is_empty() {
        return Ok(Vec::new());
    }
    mac_port::Entity::find()
        .filter(mac_port::Column::InterfaceId.is_in(interface_ids.iter().copied()))
        .all(db)
        .await
}

pub async fn mac_ips_for_device(
    db: &DatabaseConnection,
    device_id: i32,
) -> Result<Vec<mac_ip::Model>, DbErr> {
    mac_ip::Entity::find()
        .filter(mac_ip::Column::DeviceId.eq(device_id))
        .all(db)
        .await
}

pub async fn oui_by_prefix(
    db: &DatabaseConnection,
    prefix: &str,
) -> Result<Option<oui::Model>, DbErr> {
    oui::Entity::find()
        .filter(oui::Column::Prefix.eq(prefix))
        .one(db)
        .await
}

/// Select-or-insert for the sentinel vendor row; safe to race.
pub async fn ensure_unknown_oui(db: &DatabaseConnection) -> Result<i32, DbErr> {
    if let Some(existing) = oui_by_prefix(db, UNKNOWN_OUI_PREFIX).await? {
        return Ok(existing.oui_id);
    }
    insert_ouis(
        db,
        vec![oui::ActiveModel {
            prefix: Set(UNKNOWN_OUI_PREFIX.to_string()),
            vendor: Set("unknown".to_string()),
            ..Default::default()
        }],
    )
    .await?;
    match oui_by_prefix(db, UNKNOWN_OUI_PREFIX).await? {
        Some(row) => Ok(row.oui_id),
        None => Err(DbErr::RecordNotFound(
            "sentinel oui row missing after insert".to_string(),
        )),
    }
}

pub async fn insert_interfaces(
    db: &DatabaseConnection,
    rows: Vec<interface::ActiveModel>,
) -> Result<(), DbErr> {
    if rows.is_empty() {
        return Ok(());
    }
    interface::Entity::insert_many(rows)
        .on_conflict(
            OnConflict::columns([interface::Column::DeviceId, interface::Column::Ifindex])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

pub async fn insert_vlans(
    db: &DatabaseConnection,
    rows: Vec<vlan::ActiveModel>,
) -> Result<(), DbErr> {
    if rows.is_empty() {
        return Ok(());
    }
    vlan::Entity::insert_many(rows)
        .on_conflict(
            OnConflict::columns([vlan::Column::DeviceId, vlan::Column::Number])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

pub async fn insert_vlan_ports(
    db: &DatabaseConnection,
    rows: Vec<vlan_port::ActiveModel>,
) -> Result<(), DbErr> {
    if rows.is_empty() {
        return Ok(());
    }
    vlan_port::Entity::insert_many(rows)
        .on_conflict(
            OnConflict::columns([
                vlan_port::Column::InterfaceId,
                vlan_port::Column::VlanId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

pub async fn insert_ouis(
    db: &DatabaseConnection,
    rows: Vec<oui::ActiveModel>,
) -> Result<(), DbErr> {
    if rows.is_empty() {
        return Ok(());
    }
    oui::Entity::insert_many(rows)
        .on_conflict(
            OnConflict::column(oui::Column::Prefix)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

pub async fn insert_macs(
    db: &DatabaseConnection,
    rows: Vec<mac::ActiveModel>,
) -> Result<(), DbErr> {
    if rows.is_empty() {
        return Ok(());
    }
    mac::Entity::insert_many(rows)
        .on_conflict(
            OnConflict::column(mac::Column::Address)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

pub async fn insert_mac_ports(
    db: &DatabaseConnection,
    rows: Vec<mac_port::ActiveModel>,
) -> Result<(), DbErr> {
    if rows.is_empty() {
        return Ok(());
    }
    mac_port::Entity::insert_many(rows)
        .on_conflict(
            OnConflict::columns([mac_port::Column::InterfaceId, mac_port::Column::MacId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

pub async fn insert_mac_ips(
    db: &DatabaseConnection,
    rows: Vec<mac_ip::ActiveModel>,
) -> Result<(), DbErr> {
    if rows.is_empty() {
        return Ok(());
    }
    mac_ip::Entity::insert_many(rows)
        .on_conflict(
            OnConflict::columns([
                mac_ip::Column::DeviceId,
                mac_ip::Column::MacId,
                mac_ip::Column::Address,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}
