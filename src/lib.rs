// Reconciles per-device topology snapshots into a relational store.

pub mod db;
pub mod dns;
pub mod error;
pub mod reconcile;
pub mod snapshot;
