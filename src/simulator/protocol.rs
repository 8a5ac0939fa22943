//! Simulator wire format
//!
//! Requests are single lines:
//! - `bd_nc,<key>` asks for live data of one boat
//! - `boatgroupmembers,<key>` asks for the group roster of one boat
//!
//! Live data answers are `<echo>,<key>,<status>[,lat,lon,ctw,stw,cog,sog]`
//! or the bare line `error`. Roster answers are a header
//! `<echo>,<key>,<status>` followed by `key,name` lines and a blank line.

use crate::broker::{BoatData, BoatKey, GroupMember};
use crate::utils::{GatewayError, Result};

pub const ERROR_LINE: &str = "error";

/// Roster name marking a boat that must not be shown.
pub const HIDDEN_NAME: &str = "!";

pub fn live_data_request(key: &BoatKey) -> String {
    format!("bd_nc,{key}\n")
}

pub fn group_members_request(key: &BoatKey) -> String {
    format!("boatgroupmembers,{key}\n")
}

/// One parsed live data response line.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveDataLine {
    Sample { key: BoatKey, data: BoatData },
    NoBoat(String),
    /// An `ok` line that could not be turned into a sample.
    Malformed(String),
    /// A status code other than `ok` or `noboat`.
    Unexpected { key: String, status: String },
}

/// Parse one live data line. A literal `error` line is an `Err`: it ends the
/// exchange for the rest of the cycle.
pub fn parse_live_data_line(line: &str) -> Result<LiveDataLine> {
    let line = trim_line(line);
    if line == ERROR_LINE {
        return Err(GatewayError::Protocol(
            "simulator returned error for live data".to_string(),
        ));
    }

    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < 3 {
        return Ok(LiveDataLine::Malformed(line.to_string()));
    }

    let key = fields[1];
    match fields[2] {
        "ok" => Ok(match parse_sample(key, &fields[3..]) {
            Some((key, data)) => LiveDataLine::Sample { key, data },
            None => LiveDataLine::Malformed(line.to_string()),
        }),
        "noboat" => Ok(LiveDataLine::NoBoat(key.to_string())),
        status => Ok(LiveDataLine::Unexpected {
            key: key.to_string(),
            status: status.to_string(),
        }),
    }
}

fn parse_sample(key: &str, values: &[&str]) -> Option<(BoatKey, BoatData)> {
    let key = BoatKey::parse(key).ok()?;
    // NaN and infinities parse as f64 but are not positions
    let mut nums = values
        .iter()
        .map(|v| v.trim().parse::<f64>().ok().filter(|n| n.is_finite()));
    let mut next = || nums.next().flatten();

    let data = BoatData {
        lat: next()?,
        lon: next()?,
        ctw: next()?,
        stw: next()?,
        cog: next()?,
        sog: next()?,
    };
    Some((key, data))
}

/// Check the roster header; anything but `ok` is a rejection.
pub fn parse_roster_header(line: &str, key: &BoatKey) -> Result<()> {
    let line = trim_line(line);
    if line == ERROR_LINE {
        return Err(GatewayError::Protocol(format!(
            "simulator returned error for group of {key}"
        )));
    }

    match line.split(',').nth(2) {
        Some("ok") => Ok(()),
        Some(status) => Err(GatewayError::RosterRejected {
            key: key.to_string(),
            status: status.to_string(),
        }),
        None => Err(GatewayError::Protocol(format!(
            "malformed roster header: {line:?}"
        ))),
    }
}

/// Parse one `key,name` roster line. Hidden and malformed entries give `None`.
pub fn parse_roster_entry(line: &str) -> Option<GroupMember> {
    let (key, name) = trim_line(line).split_once(',')?;
    if name == HIDDEN_NAME {
        return None;
    }
    Some(GroupMember {
        key: BoatKey::parse(key).ok()?,
        name: name.to_string(),
    })
}

/// Lines are newline-terminated; tolerate a stray carriage return.
pub fn trim_line(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}
