//! Conference page content loading.
//!
//! Page content is authored as a flat TOML file and parsed into domain
//! records at startup. Dates are `YYYY-MM-DD`, times `HH:MM`; banner
//! times default to the full day (00:00–23:59) when omitted.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use time::macros::{format_description, time};
use time::{Date, Time};

use crate::domain::entities::{BannerRecord, ConferencePageRecord, PageContentRecord};
use crate::domain::types::ImagePosition;

use super::error::InfraError;

const DEFAULT_BANNER_START: Time = time!(00:00);
const DEFAULT_BANNER_END: Time = time!(23:59);

#[derive(Debug, Deserialize)]
struct RawContentFile {
    page: RawPage,
    #[serde(default)]
    banners: Vec<RawBanner>,
    #[serde(default)]
    contents: Vec<RawContent>,
}

#[derive(Debug, Deserialize)]
struct RawPage {
    title: String,
    date_start: String,
    date_end: String,
    time_start: String,
    ticket_link: Option<String>,
    cfp_link: Option<String>,
    sponsor_link: Option<String>,
    location_main: String,
    location_city: String,
    location_link: Option<String>,
    location_image: Option<String>,
    keynote_title: String,
    keynote_subtitle: Option<String>,
    speaker_title: String,
    speaker_subtitle: Option<String>,
    schedule_title: String,
    schedule_subtitle: Option<String>,
    sponsor_title: String,
    sponsor_subtitle: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBanner {
    #[serde(default)]
    title: String,
    #[serde(default)]
    call_to_action: String,
    link: Option<String>,
    start_date: String,
    start_time: Option<String>,
    end_date: String,
    end_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawContent {
    title: String,
    subtitle: Option<String>,
    body: String,
    image: Option<String>,
    image_position: ImagePosition,
    #[serde(default)]
    is_subcontent: bool,
}

/// Load and validate the conference page from a TOML file.
pub fn load_page(path: &Path) -> Result<ConferencePageRecord, InfraError> {
    let input = fs::read_to_string(path)?;
    parse_page(&input)
}

pub fn parse_page(input: &str) -> Result<ConferencePageRecord, InfraError> {
    let raw: RawContentFile = toml::from_str(input)
        .map_err(|err| InfraError::content(format!("invalid content file: {err}")))?;

    let page = ConferencePageRecord {
        title: raw.page.title,
        date_start: parse_date(&raw.page.date_start)?,
        date_end: parse_date(&raw.page.date_end)?,
        time_start: parse_time(&raw.page.time_start)?,
        ticket_link: raw.page.ticket_link,
        cfp_link: raw.page.cfp_link,
        sponsor_link: raw.page.sponsor_link,
        location_main: raw.page.location_main,
        location_city: raw.page.location_city,
        location_link: raw.page.location_link,
        location_image: raw.page.location_image,
        keynote_title: raw.page.keynote_title,
        keynote_subtitle: raw.page.keynote_subtitle,
        speaker_title: raw.page.speaker_title,
        speaker_subtitle: raw.page.speaker_subtitle,
        schedule_title: raw.page.schedule_title,
        schedule_subtitle: raw.page.schedule_subtitle,
        sponsor_title: raw.page.sponsor_title,
        sponsor_subtitle: raw.page.sponsor_subtitle,
        contents: raw.contents.into_iter().map(build_content).collect(),
        banners: raw
            .banners
            .into_iter()
            .map(build_banner)
            .collect::<Result<Vec<_>, _>>()?,
    };

    page.validate()
        .map_err(|err| InfraError::content(err.to_string()))?;
    Ok(page)
}

fn build_banner(raw: RawBanner) -> Result<BannerRecord, InfraError> {
    Ok(BannerRecord {
        title: raw.title,
        call_to_action: raw.call_to_action,
        link: raw.link,
        start_date: parse_date(&raw.start_date)?,
        start_time: match raw.start_time {
            Some(value) => parse_time(&value)?,
            None => DEFAULT_BANNER_START,
        },
        end_date: parse_date(&raw.end_date)?,
        end_time: match raw.end_time {
            Some(value) => parse_time(&value)?,
            None => DEFAULT_BANNER_END,
        },
    })
}

fn build_content(raw: RawContent) -> PageContentRecord {
    PageContentRecord {
        title: raw.title,
        subtitle: raw.subtitle,
        body_html: raw.body,
        image: raw.image,
        image_position: raw.image_position,
        is_subcontent: raw.is_subcontent,
    }
}

fn parse_date(input: &str) -> Result<Date, InfraError> {
    Date::parse(input, format_description!("[year]-[month]-[day]"))
        .map_err(|err| InfraError::content(format!("invalid date `{input}`: {err}")))
}

fn parse_time(input: &str) -> Result<Time, InfraError> {
    Time::parse(input, format_description!("[hour]:[minute]"))
        .map_err(|err| InfraError::content(format!("invalid time `{input}`: {err}")))
}
