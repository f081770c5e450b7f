//! Shared datasets for unit tests.

use chrono::NaiveDate;
use disaster_dash_dataset_models::{Dataset, EventRecord};
use disaster_dash_disaster_models::DisasterType;

fn at(y: i32, m: u32, d: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .unwrap()
}

/// The three-record scenario: two floods in 2010 (Kenya, Chad) and a
/// drought in Kenya in 2012.
pub fn scenario() -> Dataset {
    Dataset::new(vec![
        EventRecord::new(
            "2010-0001-KEN",
            DisasterType::Flood,
            "KEN",
            "Kenya",
            "Sub-Saharan Africa",
            "Africa",
            2010,
            4,
        )
        .with_deaths(100.0),
        EventRecord::new(
            "2012-0002-KEN",
            DisasterType::Drought,
            "KEN",
            "Kenya",
            "Sub-Saharan Africa",
            "Africa",
            2012,
            7,
        )
        .with_deaths(50.0),
        EventRecord::new(
            "2010-0003-TCD",
            DisasterType::Flood,
            "TCD",
            "Chad",
            "Sub-Saharan Africa",
            "Africa",
            2010,
            8,
        )
        .with_deaths(10.0),
    ])
}

/// A wider dataset spanning two regions, with some missing magnitudes.
pub fn sample() -> Dataset {
    Dataset::new(vec![
        EventRecord::new(
            "2010-0001-KEN",
            DisasterType::Flood,
            "KEN",
            "Kenya",
            "Sub-Saharan Africa",
            "Africa",
            2010,
            4,
        )
        .with_deaths(100.0)
        .with_affected(5_000.0)
        .with_damage(2_000.0)
        .with_last_update(at(2023, 1, 5)),
        EventRecord::new(
            "2012-0002-KEN",
            DisasterType::Drought,
            "KEN",
            "Kenya",
            "Sub-Saharan Africa",
            "Africa",
            2012,
            7,
        )
        .with_deaths(50.0)
        .with_affected(900_000.0)
        .with_last_update(at(2024, 2, 1)),
        EventRecord::new(
            "2010-0003-TCD",
            DisasterType::Flood,
            "TCD",
            "Chad",
            "Sub-Saharan Africa",
            "Africa",
            2010,
            8,
        )
        .with_deaths(10.0)
        .with_affected(200.0)
        .with_damage(150.0)
        .with_last_update(at(2022, 6, 30)),
        EventRecord::new(
            "2011-0004-BGD",
            DisasterType::Storm,
            "BGD",
            "Bangladesh",
            "Southern Asia",
            "Asia",
            2011,
            5,
        )
        .with_deaths(300.0)
        .with_affected(2_000_000.0)
        .with_damage(500_000.0)
        .with_last_update(at(2024, 5, 10)),
        EventRecord::new(
            "2011-0005-JPN",
            DisasterType::Earthquake,
            "JPN",
            "Japan",
            "Eastern Asia",
            "Asia",
            2011,
            3,
        )
        .with_deaths(20_000.0)
        .with_damage(210_000_000.0)
        .with_last_update(at(2023, 11, 11)),
    ])
}
