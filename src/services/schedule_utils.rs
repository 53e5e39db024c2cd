use crate::error::{AppError, AppResult};
use crate::models::owner::WindowPreference;

/// End of the planning day, exclusive. Cross-midnight tasks are rejected at
/// task creation, so no interval ever extends past this bound.
pub const DAY_END_MINUTE: i64 = 24 * 60;

/// Where flexible placement starts when the owner has no window preference.
pub const DEFAULT_ANCHOR_MINUTE: i64 = 8 * 60;

/// Half-open minute-of-day interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinuteSpan {
    pub start: i64,
    pub end: i64,
}

impl MinuteSpan {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> i64 {
        self.end - self.start
    }
}

/// Parse a 24-hour `HH:MM` clock time into minutes since local midnight.
/// Both fields must be two zero-padded digits; anything else is rejected.
pub fn parse_clock(value: &str) -> AppResult<i64> {
    let trimmed = value.trim();
    let (hours_part, minutes_part) = trimmed
        .split_once(':')
        .ok_or_else(|| AppError::invalid_time_format(trimmed))?;

    if hours_part.len() != 2
        || minutes_part.len() != 2
        || !hours_part.chars().all(|c| c.is_ascii_digit())
        || !minutes_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(AppError::invalid_time_format(trimmed));
    }

    let hours: i64 = hours_part
        .parse()
        .map_err(|_| AppError::invalid_time_format(trimmed))?;
    let minutes: i64 = minutes_part
        .parse()
        .map_err(|_| AppError::invalid_time_format(trimmed))?;

    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(AppError::invalid_time_format(trimmed));
    }

    Ok(hours * 60 + minutes)
}

/// Inverse of [`parse_clock`], always zero-padded.
pub fn format_clock(minutes: i64) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Minute bounds for a preference tag. No preference anchors flexible
/// placement at 08:00 with the rest of the day open.
pub fn window_bounds(preference: Option<WindowPreference>) -> MinuteSpan {
    match preference {
        Some(WindowPreference::Morning) => MinuteSpan::new(6 * 60, 12 * 60),
        Some(WindowPreference::Afternoon) => MinuteSpan::new(12 * 60, 17 * 60),
        Some(WindowPreference::Evening) => MinuteSpan::new(17 * 60, 21 * 60),
        None => MinuteSpan::new(DEFAULT_ANCHOR_MINUTE, DAY_END_MINUTE),
    }
}

pub fn overlaps(a: MinuteSpan, b: MinuteSpan) -> bool {
    a.start < b.end && b.start < a.end
}

/// Insert a span keeping the list ordered by start minute. Spans may overlap
/// (fixed tasks are placed verbatim even when they collide), so the list is
/// sorted but not necessarily disjoint.
pub fn insert_span(spans: &mut Vec<MinuteSpan>, span: MinuteSpan) {
    let position = spans.partition_point(|existing| existing.start <= span.start);
    spans.insert(position, span);
}

/// Earliest start minute for a gap of at least `duration` minutes, searching
/// the preferred window first and the whole day as a fallback. Returns `None`
/// only when no gap anywhere in the day is long enough.
pub fn find_slot(duration: i64, occupied: &[MinuteSpan], window: MinuteSpan) -> Option<i64> {
    scan_range(duration, occupied, window.start, window.end)
        .or_else(|| scan_range(duration, occupied, 0, DAY_END_MINUTE))
}

fn scan_range(duration: i64, occupied: &[MinuteSpan], lower: i64, upper: i64) -> Option<i64> {
    if upper - lower < duration {
        return None;
    }

    let mut cursor = lower;
    for span in occupied {
        if span.end <= cursor {
            continue;
        }
        if span.start >= upper {
            break;
        }
        if span.start - cursor >= duration {
            return Some(cursor);
        }
        cursor = cursor.max(span.end);
        if upper - cursor < duration {
            return None;
        }
    }

    Some(cursor)
}
