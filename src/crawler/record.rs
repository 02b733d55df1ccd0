//! Record and dataset types
//!
//! A [`Record`] is one row of the output table. Every field is independently
//! nullable: scalar fields are `Option`s, list fields that are always
//! attempted (platforms, genres, reviews) are plain `Vec`s that may be empty.

use std::fmt;

/// A compact popularity counter, before or after normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Count {
    /// Text as it appeared on the page, e.g. "12.5K" or "340"
    Raw(String),
    /// Normalized integer count
    Value(u64),
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(raw) => f.write_str(raw),
            Self::Value(v) => write!(f, "{}", v),
        }
    }
}

/// One catalog item
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    /// Detail page the record was extracted from. Not part of the exported schema.
    pub url: String,
    pub title: Option<String>,
    pub parent_item: Option<String>,
    pub release_date: Option<String>,
    pub team: Option<Vec<String>>,
    pub rating: Option<f64>,
    pub listed: Option<Count>,
    pub reviewed: Option<Count>,
    pub platforms: Vec<String>,
    pub genres: Vec<String>,
    pub summary: Option<String>,
    pub reviews: Vec<String>,
    pub plays: Option<Count>,
    pub playing: Option<Count>,
    pub backlogs: Option<Count>,
    pub wishlist: Option<Count>,
}

impl Record {
    /// Exported column names, in column order
    pub const COLUMNS: [&'static str; 15] = [
        "Title",
        "ParentGame",
        "ReleaseDate",
        "Team",
        "Rating",
        "xListed",
        "xReviewed",
        "Platforms",
        "Genres",
        "Summary",
        "Reviews",
        "Plays",
        "Playing",
        "Backlogs",
        "Wishlist",
    ];

    /// An all-null record for `url`
    pub fn empty(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// The six compact-count fields with their column names
    pub fn count_fields_mut(&mut self) -> [(&'static str, &mut Option<Count>); 6] {
        [
            ("xListed", &mut self.listed),
            ("xReviewed", &mut self.reviewed),
            ("Plays", &mut self.plays),
            ("Playing", &mut self.playing),
            ("Backlogs", &mut self.backlogs),
            ("Wishlist", &mut self.wishlist),
        ]
    }

    /// Renders the record as one row of text cells in [`Record::COLUMNS`] order
    ///
    /// Nulls become empty cells; lists use their bracketed textual form.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            opt_text(&self.title),
            opt_text(&self.parent_item),
            opt_text(&self.release_date),
            self.team.as_deref().map(list_text).unwrap_or_default(),
            self.rating.map(|r| r.to_string()).unwrap_or_default(),
            opt_count(&self.listed),
            opt_count(&self.reviewed),
            list_text(&self.platforms),
            list_text(&self.genres),
            opt_text(&self.summary),
            list_text(&self.reviews),
            opt_count(&self.plays),
            opt_count(&self.playing),
            opt_count(&self.backlogs),
            opt_count(&self.wishlist),
        ]
    }
}

fn opt_text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn opt_count(value: &Option<Count>) -> String {
    value.as_ref().map(Count::to_string).unwrap_or_default()
}

fn list_text(items: &[String]) -> String {
    format!("{:?}", items)
}

/// Ordered sequence of records sharing the fixed schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    /// Shape as (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.records.len(), Record::COLUMNS.len())
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Dataset {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
