//! Broadcast action identifiers recognized by the bridge.
//!
//! The exact strings are part of the compatibility contract with the navigation
//! apps that emit them and must not be renamed.

/// Generic navigation telemetry
pub const AMAP_AUTO_NAVI: &str = "AMAP_AUTO_NAVI";

/// Navigation telemetry data
pub const AMAP_AUTO_NAVI_DATA: &str = "AMAP_AUTO_NAVI_DATA";

/// Location update
pub const AMAP_AUTO_LOCATION: &str = "AMAP_AUTO_LOCATION";

/// Navigation session
pub const AMAP_AUTO_NAVIGATION: &str = "AMAP_AUTO_NAVIGATION";

/// Vendor-specific navigation alias
pub const XMGD_NAVIGATOR: &str = "XMGD_NAVIGATOR";

/// Standard broadcast
pub const AUTONAVI_STANDARD_BROADCAST_SEND: &str = "AUTONAVI_STANDARD_BROADCAST_SEND";

/// Category qualifier that some firmware builds require on the standard broadcast
pub const AUTONAVI_STANDARD_CATEGORY: &str = "AUTONAVI_STANDARD_CATEGORY";

/// Every action the bridge listens for, in registration order
pub const RECOGNIZED_ACTIONS: [&str; 6] = [
    AMAP_AUTO_NAVI,
    AMAP_AUTO_NAVI_DATA,
    AMAP_AUTO_LOCATION,
    AMAP_AUTO_NAVIGATION,
    XMGD_NAVIGATOR,
    AUTONAVI_STANDARD_BROADCAST_SEND,
];

/// Actions that all carry navigation telemetry in the same shape
pub const NAVIGATION_FAMILY: [&str; 4] = [
    AMAP_AUTO_NAVI,
    AMAP_AUTO_NAVI_DATA,
    AMAP_AUTO_NAVIGATION,
    XMGD_NAVIGATOR,
];

pub fn is_recognized(action: &str) -> bool {
    RECOGNIZED_ACTIONS.contains(&action)
}
