//! Maps inbound action identifiers to the adapter that understands them.
//!
//! Routing never fails: anything not in the table goes to [`Adapter::Unknown`].

use crate::actions::{
    AMAP_AUTO_LOCATION, AMAP_AUTO_NAVI, AMAP_AUTO_NAVIGATION, AMAP_AUTO_NAVI_DATA,
    AUTONAVI_STANDARD_BROADCAST_SEND, XMGD_NAVIGATOR,
};
use crate::adapters::{Adapter, NormalizeContext};
use crate::error::AdapterError;
use crate::event::{CanonicalEvent, RawEvent};

/// Select the adapter for `action`
pub fn route(action: &str) -> Adapter {
    match action {
        AMAP_AUTO_NAVI | AMAP_AUTO_NAVI_DATA | AMAP_AUTO_NAVIGATION | XMGD_NAVIGATOR => {
            Adapter::Navigation
        }
        AMAP_AUTO_LOCATION => Adapter::Location,
        AUTONAVI_STANDARD_BROADCAST_SEND => Adapter::Standard,
        _ => Adapter::Unknown,
    }
}

/// Route `raw` by its action and normalize it.
///
/// Errors only come from the standard broadcast adapter, see [`Adapter::normalize`].
pub fn normalize(raw: &RawEvent, ctx: &NormalizeContext) -> Result<CanonicalEvent, AdapterError> {
    route(&raw.action).normalize(raw, ctx)
}
