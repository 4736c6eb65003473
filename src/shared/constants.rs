/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// REPORT CONSTANTS
// =============================================================================

/// Maximum length of a report description, in characters
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Share of the challan fine paid out to the reporter when not configured
pub const DEFAULT_REWARD_PERCENTAGE: u32 = 10;

/// Days between challan issuance and its due date when not configured
pub const DEFAULT_CHALLAN_DUE_DAYS: i64 = 30;

/// Prefix of generated challan numbers (CHN-YYYY-NNNNNNN)
pub const CHALLAN_NUMBER_PREFIX: &str = "CHN";

// =============================================================================
// STATION CONSTANTS
// =============================================================================

/// Radius used for nearby police station lookups when the caller gives none
pub const DEFAULT_STATION_SEARCH_RADIUS_METERS: f64 = 5_000.0;
