use chrono::{FixedOffset, Offset, Utc};
use chrono_tz::OffsetName;

// ---

/// A zone-resolved offset which may carry a displayable zone abbreviation.
///
/// This is the seam between the pattern engine and the calendar library: the
/// engine reads clock and calendar fields through [`chrono::Datelike`] and
/// [`chrono::Timelike`], and the `%Z` label through this trait. Offsets
/// without a name (plain fixed offsets) return `None` and the engine falls
/// back to the numeric RFC822 form.
pub trait ZoneName: Offset {
    fn zone_name(&self) -> Option<&str>;
}

impl ZoneName for chrono_tz::TzOffset {
    fn zone_name(&self) -> Option<&str> {
        self.abbreviation()
    }
}

impl ZoneName for Utc {
    fn zone_name(&self) -> Option<&str> {
        Some("UTC")
    }
}

impl ZoneName for FixedOffset {
    fn zone_name(&self) -> Option<&str> {
        None
    }
}
