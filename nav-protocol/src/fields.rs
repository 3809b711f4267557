//! Well-known payload fields and their native wire types.
//!
//! Inbound adapters coerce these keys to their canonical kind; the outbound
//! emitter always writes them with their native type first.

use crate::scalar::ScalarKind;

/// Native type of an extra on the broadcast wire.
///
/// The wire distinguishes 32-bit from 64-bit numbers; the canonical model does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireKind {
    Int,
    Long,
    Float,
    Double,
    Bool,
    Str,
}

impl WireKind {
    /// Canonical scalar kind this wire kind normalizes to
    pub fn scalar_kind(self) -> ScalarKind {
        match self {
            WireKind::Int | WireKind::Long => ScalarKind::Int,
            WireKind::Float | WireKind::Double => ScalarKind::Float,
            WireKind::Bool => ScalarKind::Bool,
            WireKind::Str => ScalarKind::Str,
        }
    }
}

/// A field with a fixed meaning across protocol variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WellKnownField {
    pub name: &'static str,
    pub kind: WireKind,
}

const fn field(name: &'static str, kind: WireKind) -> WellKnownField {
    WellKnownField { name, kind }
}

/// Well-known fields, in outbound serialization order
pub const WELL_KNOWN_FIELDS: &[WellKnownField] = &[
    // navigation telemetry
    field("action", WireKind::Str),
    field("timestamp", WireKind::Long),
    field("route_distance", WireKind::Int),
    field("route_time", WireKind::Int),
    field("current_speed", WireKind::Double),
    field("next_turn", WireKind::Str),
    field("next_road", WireKind::Str),
    // location
    field("latitude", WireKind::Double),
    field("longitude", WireKind::Double),
    field("accuracy", WireKind::Double),
    field("bearing", WireKind::Double),
    field("speed", WireKind::Double),
    field("provider", WireKind::Str),
    // standard broadcast
    field("KEY_TYPE", WireKind::Int),
    field("KEY_ACTION", WireKind::Str),
    field("EXTRA_ROAD_NAME", WireKind::Str),
    field("EXTRA_NEXT_ROAD_NAME", WireKind::Str),
    field("EXTRA_REMAIN_DISTANCE", WireKind::Int),
    field("EXTRA_REMAIN_TIME", WireKind::Int),
    field("EXTRA_CUR_SPEED", WireKind::Int),
    field("EXTRA_LIMIT_SPEED", WireKind::Int),
    field("EXTRA_SEGMENT_SPEED", WireKind::Int),
    field("EXTRA_CAMERA_SPEED", WireKind::Int),
];

/// Look up a well-known field by its wire name
pub fn well_known(name: &str) -> Option<&'static WellKnownField> {
    WELL_KNOWN_FIELDS.iter().find(|f| f.name == name)
}

/// Keys that describe the event rather than carry telemetry.
///
/// Sources often echo these; they never make an event count as parsed.
pub const METADATA_KEYS: &[&str] = &["action", "timestamp"];

pub fn is_metadata(name: &str) -> bool {
    METADATA_KEYS.contains(&name)
}
