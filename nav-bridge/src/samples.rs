//! Canned test broadcasts
//!
//! Lets a host exercise the full pipeline without a navigation app running.
//! Samples are sent as single plain broadcasts, the way a navigation app would,
//! not through the fan-out emitter.

use std::fmt;
use std::str::FromStr;

use nav_protocol::actions::{
    AMAP_AUTO_LOCATION, AMAP_AUTO_NAVI_DATA, AUTONAVI_STANDARD_BROADCAST_SEND,
};
use nav_stream::{OutboundBroadcast, OutboundValue};

use crate::error::BridgeError;

/// Action used by the error sample; deliberately not recognized
pub const INVALID_TEST_ACTION: &str = "INVALID_ACTION_FOR_TEST";

const TEST_LATITUDE: f64 = 39.9042;
const TEST_LONGITUDE: f64 = 116.4074;
const TEST_ACCURACY: f64 = 10.0;
const TEST_BEARING: f64 = 90.0;
const TEST_SPEED: f64 = 60.0;
const TEST_DISTANCE: i32 = 1500;
const TEST_TIME: i32 = 300;
const TEST_NEXT_TURN: &str = "右转";
const TEST_NEXT_ROAD: &str = "中山路";

/// A named test sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sample {
    Navigation,
    Location,
    Standard,
    /// Unrecognized action with no payload
    Error,
    /// Location, navigation and standard, in that order
    Batch,
}

impl Sample {
    pub const ALL: [Sample; 5] = [
        Sample::Navigation,
        Sample::Location,
        Sample::Standard,
        Sample::Error,
        Sample::Batch,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Sample::Navigation => "navigation",
            Sample::Location => "location",
            Sample::Standard => "standard",
            Sample::Error => "error",
            Sample::Batch => "batch",
        }
    }

    /// Broadcasts for this sample, stamped with `now_millis`
    pub fn broadcasts(&self, now_millis: i64) -> Vec<OutboundBroadcast> {
        match self {
            Sample::Navigation => vec![navigation(now_millis)],
            Sample::Location => vec![location(now_millis)],
            Sample::Standard => vec![standard(now_millis)],
            Sample::Error => vec![OutboundBroadcast::new(INVALID_TEST_ACTION)],
            Sample::Batch => vec![
                location(now_millis),
                navigation(now_millis),
                standard(now_millis),
            ],
        }
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sample {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Sample::ALL
            .into_iter()
            .find(|sample| sample.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| BridgeError::UnknownSample(s.to_string()))
    }
}

fn navigation(now_millis: i64) -> OutboundBroadcast {
    let mut b = OutboundBroadcast::new(AMAP_AUTO_NAVI_DATA);
    b.put("action", OutboundValue::Str("navigation".into()));
    b.put("timestamp", OutboundValue::Long(now_millis));
    b.put("route_distance", OutboundValue::Int(TEST_DISTANCE));
    b.put("route_time", OutboundValue::Int(TEST_TIME));
    b.put("current_speed", OutboundValue::Double(TEST_SPEED));
    b.put("next_turn", OutboundValue::Str(TEST_NEXT_TURN.into()));
    b.put("next_road", OutboundValue::Str(TEST_NEXT_ROAD.into()));
    b.put("latitude", OutboundValue::Double(TEST_LATITUDE));
    b.put("longitude", OutboundValue::Double(TEST_LONGITUDE));
    b.put("accuracy", OutboundValue::Double(TEST_ACCURACY));
    b.put("bearing", OutboundValue::Double(TEST_BEARING));
    b
}

fn location(now_millis: i64) -> OutboundBroadcast {
    let mut b = OutboundBroadcast::new(AMAP_AUTO_LOCATION);
    b.put("action", OutboundValue::Str("location".into()));
    b.put("timestamp", OutboundValue::Long(now_millis));
    b.put("latitude", OutboundValue::Double(TEST_LATITUDE));
    b.put("longitude", OutboundValue::Double(TEST_LONGITUDE));
    b.put("speed", OutboundValue::Double(TEST_SPEED));
    b.put("bearing", OutboundValue::Double(TEST_BEARING));
    b.put("accuracy", OutboundValue::Double(TEST_ACCURACY));
    b.put("provider", OutboundValue::Str("gps".into()));
    b
}

fn standard(now_millis: i64) -> OutboundBroadcast {
    let mut b = OutboundBroadcast::new(AUTONAVI_STANDARD_BROADCAST_SEND);
    b.put("action", OutboundValue::Str("standard_broadcast".into()));
    b.put("timestamp", OutboundValue::Long(now_millis));
    b.put("version", OutboundValue::Str("1.0.0".into()));
    b.put("type", OutboundValue::Str("navigation".into()));
    b.put("status", OutboundValue::Str("active".into()));
    b.put("progress", OutboundValue::Int(50));
    b.put("destination", OutboundValue::Str("天安门广场".into()));
    b.put("EXTRA_ROAD_NAME", OutboundValue::Str(TEST_NEXT_ROAD.into()));
    b.put("EXTRA_REMAIN_DISTANCE", OutboundValue::Int(TEST_DISTANCE));
    b
}
