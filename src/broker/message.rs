//! Payloads pushed to clients.
//!
//! `BoatData` is both the parsed simulator sample and the plain outbound
//! message; `GroupPayload` wraps it with the nearby members of a group.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::broker::key::BoatKey;

/// One polled snapshot of a boat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoatData {
    pub lat: f64,
    pub lon: f64,
    pub ctw: f64,
    pub stw: f64,
    pub cog: f64,
    pub sog: f64,
}

/// A boat sharing a group with the subscriber.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMember {
    pub key: BoatKey,
    pub name: String,
}

/// Outbound message for a `bdl_g` subscriber.
///
/// `others` maps friendly name to `[lat, lon, course]`, already quantized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPayload {
    pub you: BoatData,
    pub others: BTreeMap<String, [f64; 3]>,
}
