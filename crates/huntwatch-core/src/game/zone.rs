use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::memory::layout::zone;

/// Current map and quest clock
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneInfo {
    /// 0 = unknown / loading
    pub zone_id: u32,
    /// Seconds elapsed on the quest clock, absent outside quests
    pub quest_timer: Option<f32>,
}

impl ZoneInfo {
    /// Build from the two raw reads, discarding implausible values.
    pub fn from_raw(zone_id: Option<u32>, quest_timer: Option<f32>) -> Self {
        let zone_id = match zone_id {
            Some(id) if id <= zone::MAX_ZONE_ID => id,
            Some(id) => {
                trace!("Implausible zone id {}", id);
                0
            }
            None => 0,
        };
        let quest_timer = quest_timer
            .filter(|t| t.is_finite() && *t > 0.0 && *t <= zone::MAX_QUEST_TIMER)
            .map(|t| (t * 10.0).round() / 10.0);

        Self {
            zone_id,
            quest_timer,
        }
    }

    /// Quest timer as "m:ss"
    pub fn formatted_timer(&self) -> Option<String> {
        self.quest_timer.map(|t| {
            let total = t as u32;
            format!("{}:{:02}", total / 60, total % 60)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_from_raw() {
        let zone = ZoneInfo::from_raw(Some(101), Some(754.26));
        assert_eq!(zone.zone_id, 101);
        assert_eq!(zone.quest_timer, Some(754.3));
        assert_eq!(zone.formatted_timer().as_deref(), Some("12:34"));
    }

    #[test]
    fn test_zone_from_raw_outside_quest() {
        let zone = ZoneInfo::from_raw(Some(405), Some(0.0));
        assert_eq!(zone.quest_timer, None);
        assert_eq!(zone.formatted_timer(), None);

        let zone = ZoneInfo::from_raw(None, Some(f32::NAN));
        assert_eq!(zone, ZoneInfo::default());
    }

    #[test]
    fn test_zone_from_raw_garbage_id() {
        assert_eq!(ZoneInfo::from_raw(Some(u32::MAX), None).zone_id, 0);
    }

    #[test]
    fn test_formatted_timer_pads_seconds() {
        let zone = ZoneInfo::from_raw(Some(1), Some(65.0));
        assert_eq!(zone.formatted_timer().as_deref(), Some("1:05"));
    }
}
