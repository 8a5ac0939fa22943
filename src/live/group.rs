//! Group payload assembly.

use std::collections::{BTreeMap, HashMap};

use crate::broker::{BoatData, BoatKey, GroupMember, GroupPayload};
use crate::geo;

/// Build the message for a group subscriber.
///
/// Members other than `own_key` that have a sample this cycle and lie within
/// `radius_nm` of `own` are listed by friendly name. Their position and
/// course are quantized at the member's distance.
pub fn build_group_payload(
    own_key: &BoatKey,
    own: &BoatData,
    roster: &[GroupMember],
    samples: &HashMap<BoatKey, BoatData>,
    radius_nm: f64,
) -> GroupPayload {
    let mut others = BTreeMap::new();

    for member in roster {
        if &member.key == own_key {
            continue;
        }
        let Some(theirs) = samples.get(&member.key) else {
            continue;
        };

        let d = geo::distance(own.lat, own.lon, theirs.lat, theirs.lon);
        // a NaN distance fails this comparison and is left out
        let within = d <= radius_nm;
        if !within {
            continue;
        }

        others.insert(
            member.name.clone(),
            [
                geo::quantize_coordinate(theirs.lat, d),
                geo::quantize_coordinate(theirs.lon, d),
                geo::quantize_course(theirs.ctw, d),
            ],
        );
    }

    GroupPayload { you: *own, others }
}
