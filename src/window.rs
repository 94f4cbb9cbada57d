use chrono::{Duration, NaiveDate};

/// Page offsets relative to the anchor day, in display order.
pub const PAGE_OFFSETS: [i64; 3] = [-1, 0, 1];
const TODAY_PAGE: usize = 1;

/// Yesterday/today/tomorrow pager. The current page changes only when a
/// swipe settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    today: NaiveDate,
    current: usize,
}

impl DayWindow {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            current: TODAY_PAGE,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn current_page(&self) -> usize {
        self.current
    }

    pub fn current_offset(&self) -> i64 {
        PAGE_OFFSETS[self.current]
    }

    pub fn current_day(&self) -> NaiveDate {
        self.day_at(self.current)
    }

    pub fn pages(&self) -> [NaiveDate; 3] {
        [self.day_at(0), self.day_at(1), self.day_at(2)]
    }

    fn day_at(&self, page: usize) -> NaiveDate {
        self.today + Duration::days(PAGE_OFFSETS[page])
    }

    /// Called once a page swipe has finished. Returns false for an index
    /// outside the window, leaving the pointer where it was.
    pub fn settle(&mut self, page: usize) -> bool {
        if page >= PAGE_OFFSETS.len() {
            return false;
        }
        self.current = page;
        true
    }

    /// Re-anchors on a new calendar day and jumps back to today's page.
    pub fn roll_to(&mut self, today: NaiveDate) {
        self.today = today;
        self.current = TODAY_PAGE;
    }

    pub fn title(&self, page: usize) -> Option<&'static str> {
        match PAGE_OFFSETS.get(page)? {
            -1 => Some("Yesterday"),
            0 => Some("Today"),
            1 => Some("Tomorrow"),
            _ => None,
        }
    }
}

/// Header line in the `Feb 12, 2026 - Thursday` form.
pub fn format_day_header(day: NaiveDate) -> String {
    day.format("%b %-d, %Y - %A").to_string()
}
