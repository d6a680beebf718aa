//! JSON-facing view of the conference page content.

use std::sync::Arc;

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::entities::{BannerRecord, ConferencePageRecord, PageContentRecord};
use crate::domain::types::ImagePosition;

#[derive(Clone)]
pub struct PageService {
    page: Option<Arc<ConferencePageRecord>>,
}

impl PageService {
    pub fn new(page: Option<ConferencePageRecord>) -> Self {
        Self {
            page: page.map(Arc::new),
        }
    }

    pub fn view(&self) -> Option<PageView> {
        self.view_at(OffsetDateTime::now_utc())
    }

    /// Snapshot of the page against an explicit clock; the active
    /// banner is resolved at call time, not at load time.
    pub fn view_at(&self, now: OffsetDateTime) -> Option<PageView> {
        self.page.as_deref().map(|page| PageView::build(page, now))
    }

    pub fn active_banner_at(&self, now: OffsetDateTime) -> Option<BannerView> {
        self.page
            .as_deref()
            .and_then(|page| page.active_banner(now))
            .map(BannerView::from_record)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub title: String,
    pub date: String,
    pub doors_open: String,
    pub day1_date: String,
    pub day2_date: String,
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
    pub contents: Vec<ContentView>,
    pub banner: Option<BannerView>,
}

impl PageView {
    fn build(page: &ConferencePageRecord, now: OffsetDateTime) -> Self {
        Self {
            title: page.title.clone(),
            date: page.date(),
            doors_open: page.doors_open(),
            day1_date: page.day1_date(),
            day2_date: page.day2_date(),
            ticket_link: page.ticket_link.clone(),
            cfp_link: page.cfp_link.clone(),
            sponsor_link: page.sponsor_link.clone(),
            location_main: page.location_main.clone(),
            location_city: page.location_city.clone(),
            location_link: page.location_link.clone(),
            location_image: page.location_image.clone(),
            keynote_title: page.keynote_title.clone(),
            keynote_subtitle: page.keynote_subtitle.clone(),
            speaker_title: page.speaker_title.clone(),
            speaker_subtitle: page.speaker_subtitle.clone(),
            schedule_title: page.schedule_title.clone(),
            schedule_subtitle: page.schedule_subtitle.clone(),
            sponsor_title: page.sponsor_title.clone(),
            sponsor_subtitle: page.sponsor_subtitle.clone(),
            contents: page.contents.iter().map(ContentView::from_record).collect(),
            banner: page.active_banner(now).map(BannerView::from_record),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentView {
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub body_html: String,
    pub image: Option<String>,
    pub image_position: ImagePosition,
    pub is_subcontent: bool,
}

impl ContentView {
    fn from_record(record: &PageContentRecord) -> Self {
        Self {
            slug: record.slug(),
            title: record.title.clone(),
            subtitle: record.subtitle.clone(),
            body_html: record.body_html.clone(),
            image: record.image.clone(),
            image_position: record.image_position,
            is_subcontent: record.is_subcontent,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BannerView {
    pub title: String,
    pub call_to_action: String,
    pub link: Option<String>,
}

impl BannerView {
    fn from_record(record: &BannerRecord) -> Self {
        Self {
            title: record.title.clone(),
            call_to_action: record.call_to_action.clone(),
            link: record.link.clone(),
        }
    }
}
