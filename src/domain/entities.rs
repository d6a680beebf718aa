//! Conference page content entities.
//!
//! These mirror the content model edited by the site operators: one
//! aggregate page carrying event metadata, ordered content blocks and
//! promotional banners. Speaker lists are derived from the remote
//! conference API and live in [`crate::domain::speakers`].

use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

use crate::domain::error::DomainError;
use crate::domain::types::ImagePosition;

/// Aggregate root for the conference home page.
#[derive(Debug, Clone, PartialEq)]
pub struct ConferencePageRecord {
    pub title: String,
    pub date_start: Date,
    pub date_end: Date,
    pub time_start: Time,

    pub ticket_link: Option<String>,
    pub cfp_link: Option<String>,
    pub sponsor_link: Option<String>,

    pub location_main: String,
    pub location_city: String,
    pub location_link: Option<String>,
    pub location_image: Option<String>,

    pub keynote_title: String,
    pub keynote_subtitle: Option<String>,
    pub speaker_title: String,
    pub speaker_subtitle: Option<String>,
    pub schedule_title: String,
    pub schedule_subtitle: Option<String>,
    pub sponsor_title: String,
    pub sponsor_subtitle: Option<String>,

    pub contents: Vec<PageContentRecord>,
    pub banners: Vec<BannerRecord>,
}

impl ConferencePageRecord {
    /// Display range for the event, e.g. `27-28 February, 2026`.
    pub fn date(&self) -> String {
        format!(
            "{}-{:02} {}, {}",
            self.date_start.day(),
            self.date_end.day(),
            month_name(self.date_end.month()),
            self.date_end.year()
        )
    }

    /// Doors-open time in 12-hour notation, e.g. `9:00AM`.
    pub fn doors_open(&self) -> String {
        let hour = self.time_start.hour();
        let (hour12, period) = match hour {
            0 => (12, "AM"),
            1..=11 => (hour, "AM"),
            12 => (12, "PM"),
            _ => (hour - 12, "PM"),
        };
        format!("{}:{:02}{}", hour12, self.time_start.minute(), period)
    }

    pub fn day1_date(&self) -> String {
        format!(
            "{} {:02}",
            month_name(self.date_start.month()),
            self.date_start.day()
        )
    }

    pub fn day2_date(&self) -> String {
        format!(
            "{} {:02}",
            month_name(self.date_end.month()),
            self.date_end.day()
        )
    }

    /// First banner whose window contains `now`. Declaration order
    /// breaks ties, so at most one banner is ever reported active.
    pub fn active_banner(&self, now: OffsetDateTime) -> Option<&BannerRecord> {
        self.banners.iter().find(|banner| banner.is_active_at(now))
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.date_end < self.date_start {
            return Err(DomainError::validation(format!(
                "event ends ({}) before it starts ({})",
                self.date_end, self.date_start
            )));
        }
        for banner in &self.banners {
            banner.validate()?;
        }
        Ok(())
    }
}

/// Promotional banner shown while its window contains the current time.
#[derive(Debug, Clone, PartialEq)]
pub struct BannerRecord {
    pub title: String,
    pub call_to_action: String,
    pub link: Option<String>,
    pub start_date: Date,
    pub start_time: Time,
    pub end_date: Date,
    pub end_time: Time,
}

impl BannerRecord {
    pub fn starts_at(&self) -> OffsetDateTime {
        PrimitiveDateTime::new(self.start_date, self.start_time).assume_utc()
    }

    pub fn ends_at(&self) -> OffsetDateTime {
        PrimitiveDateTime::new(self.end_date, self.end_time).assume_utc()
    }

    /// Window containment check, inclusive at both boundaries.
    pub fn is_active_at(&self, now: OffsetDateTime) -> bool {
        self.starts_at() <= now && now <= self.ends_at()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.ends_at() < self.starts_at() {
            return Err(DomainError::validation(format!(
                "banner `{}` ends before it starts",
                self.title
            )));
        }
        Ok(())
    }
}

/// Ordered rich-content block on the home page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContentRecord {
    pub title: String,
    pub subtitle: Option<String>,
    pub body_html: String,
    pub image: Option<String>,
    pub image_position: ImagePosition,
    pub is_subcontent: bool,
}

impl PageContentRecord {
    /// URL anchor derived from the block title.
    pub fn slug(&self) -> String {
        slug::slugify(&self.title)
    }
}

fn month_name(month: Month) -> &'static str {
    match month {
        Month::January => "January",
        Month::February => "February",
        Month::March => "March",
        Month::April => "April",
        Month::May => "May",
        Month::June => "June",
        Month::July => "July",
        Month::August => "August",
        Month::September => "September",
        Month::October => "October",
        Month::November => "November",
        Month::December => "December",
    }
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime, time};

    use super::*;

    fn sample_banner() -> BannerRecord {
        BannerRecord {
            title: "Early bird".to_string(),
            call_to_action: "Get tickets".to_string(),
            link: Some("https://example.com/tickets".to_string()),
            start_date: date!(2026 - 01 - 10),
            start_time: time!(00:00),
            end_date: date!(2026 - 01 - 20),
            end_time: time!(23:59),
        }
    }

    fn sample_page(banners: Vec<BannerRecord>) -> ConferencePageRecord {
        ConferencePageRecord {
            title: "PyCon APAC 2026".to_string(),
            date_start: date!(2026 - 02 - 27),
            date_end: date!(2026 - 02 - 28),
            time_start: time!(09:00),
            ticket_link: None,
            cfp_link: None,
            sponsor_link: None,
            location_main: "SMX Convention Center".to_string(),
            location_city: "Manila".to_string(),
            location_link: None,
            location_image: None,
            keynote_title: "Keynote Speakers".to_string(),
            keynote_subtitle: None,
            speaker_title: "Speakers".to_string(),
            speaker_subtitle: None,
            schedule_title: "Schedule".to_string(),
            schedule_subtitle: None,
            sponsor_title: "Sponsors".to_string(),
            sponsor_subtitle: None,
            contents: Vec::new(),
            banners,
        }
    }

    #[test]
    fn banner_window_is_inclusive_at_both_ends() {
        let banner = sample_banner();

        assert!(banner.is_active_at(datetime!(2026-01-10 00:00 UTC)));
        assert!(banner.is_active_at(datetime!(2026-01-15 12:30 UTC)));
        assert!(banner.is_active_at(datetime!(2026-01-20 23:59 UTC)));

        assert!(!banner.is_active_at(datetime!(2026-01-09 23:59 UTC)));
        assert!(!banner.is_active_at(datetime!(2026-01-21 00:00 UTC)));
    }

    #[test]
    fn active_banner_returns_first_matching_window() {
        let mut second = sample_banner();
        second.title = "Regular sale".to_string();
        let page = sample_page(vec![sample_banner(), second]);

        let active = page
            .active_banner(datetime!(2026-01-15 08:00 UTC))
            .expect("active banner");
        assert_eq!(active.title, "Early bird");
    }

    #[test]
    fn active_banner_is_none_outside_all_windows() {
        let page = sample_page(vec![sample_banner()]);
        assert!(page.active_banner(datetime!(2026-02-01 00:00 UTC)).is_none());
    }

    #[test]
    fn inverted_banner_window_fails_validation() {
        let mut banner = sample_banner();
        banner.end_date = date!(2026 - 01 - 01);
        assert!(banner.validate().is_err());
    }

    #[test]
    fn display_dates_are_formatted_for_templates() {
        let page = sample_page(Vec::new());
        assert_eq!(page.date(), "27-28 February, 2026");
        assert_eq!(page.doors_open(), "9:00AM");
        assert_eq!(page.day1_date(), "February 27");
        assert_eq!(page.day2_date(), "February 28");
    }

    #[test]
    fn doors_open_handles_noon_and_midnight() {
        let mut page = sample_page(Vec::new());
        page.time_start = time!(12:00);
        assert_eq!(page.doors_open(), "12:00PM");
        page.time_start = time!(00:30);
        assert_eq!(page.doors_open(), "12:30AM");
        page.time_start = time!(18:05);
        assert_eq!(page.doors_open(), "6:05PM");
    }

    #[test]
    fn content_slug_derives_from_title() {
        let content = PageContentRecord {
            title: "Why Attend PyCon?".to_string(),
            subtitle: None,
            body_html: "<p>Talks.</p>".to_string(),
            image: None,
            image_position: ImagePosition::Left,
            is_subcontent: false,
        };
        assert_eq!(content.slug(), "why-attend-pycon");
    }
}
