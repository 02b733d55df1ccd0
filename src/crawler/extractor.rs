//! Field extractor for item-detail pages
//!
//! Extraction is driven by [`FIELD_RULES`], a table mapping each field to
//! the selector it starts from and the function that reads it. Every rule is
//! evaluated on its own: a rule that misses leaves its field at the
//! record's null default and never stops the rules after it.

use crate::crawler::document::{
    find_all_in, find_first_in, matches, next_sibling_element, parse_document, text_lines,
    text_of, Document,
};
use crate::crawler::fetcher::{fetch_url, UserAgentPool};
use crate::crawler::record::{Count, Record};
use crate::{ExtractionMiss, FetchError};
use reqwest::Client;

/// One entry of the extraction table
pub struct FieldRule {
    /// Field (or group of fields) the rule fills
    pub field: &'static str,
    /// Selector the rule starts from
    pub selector: &'static str,
    /// Reads the field from the document into the record
    pub apply: fn(&FieldRule, &Document, &mut Record) -> RuleResult,
}

pub type RuleResult = Result<(), ExtractionMiss>;

impl FieldRule {
    fn miss(&self, reason: impl Into<String>) -> ExtractionMiss {
        ExtractionMiss {
            field: self.field,
            reason: reason.into(),
        }
    }

    fn no_match(&self) -> ExtractionMiss {
        self.miss(format!("no element matches {}", self.selector))
    }
}

// Multi-class selectors compare the whole class attribute, so an element
// carrying an extra class is a different element.
const REVIEW_CARD: &str = r#"div[class="row pt-2 pb-1 review-card"]"#;
const REVIEW_BODY: &str = "div.formatted-text";

/// The extraction table, in record column order
pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        field: "title",
        selector: r#"div[class="col-auto pr-1"]"#,
        apply: extract_title,
    },
    FieldRule {
        field: "parent_item",
        selector: r#"a[class="col px-3 mt-lg-2 my-3 my-md-1"]"#,
        apply: extract_parent_item,
    },
    FieldRule {
        field: "release_date",
        selector: r#"div[class="col-auto mt-auto pr-0"]"#,
        apply: extract_release_date,
    },
    FieldRule {
        field: "team",
        selector: r#"div[class="col-auto pl-lg-1 sub-title"]"#,
        apply: extract_team,
    },
    FieldRule {
        field: "rating",
        selector: "#score",
        apply: extract_rating,
    },
    FieldRule {
        field: "listed",
        selector: "p.game-page-sidecard",
        apply: extract_listed,
    },
    FieldRule {
        field: "reviewed",
        selector: "p.game-page-sidecard",
        apply: extract_reviewed,
    },
    FieldRule {
        field: "platforms",
        selector: "a.game-page-platform",
        apply: extract_platforms,
    },
    FieldRule {
        field: "genres",
        selector: "p.genre-tag",
        apply: extract_genres,
    },
    FieldRule {
        field: "summary",
        selector: "#collapseSummary",
        apply: extract_summary,
    },
    FieldRule {
        field: "reviews",
        selector: "#game-reviews-section",
        apply: extract_reviews,
    },
    FieldRule {
        field: "counters",
        selector: r#"div[class="col-12 mb-1"]"#,
        apply: extract_counters,
    },
];

/// Fetches one detail page and extracts its record
///
/// # Returns
///
/// * `Ok(Record)` - The page loaded; fields that could not be read are null
/// * `Err(FetchError)` - The page did not load; no record exists for it
pub async fn extract_record(
    client: &Client,
    agents: &UserAgentPool,
    url: &str,
) -> Result<Record, FetchError> {
    // No body, no record
    let body = fetch_url(client, agents, url).await?;
    let document = parse_document(&body);
    let (record, misses) = extract_fields(&document, url);

    // Misses are expected on sparse pages
    for miss in &misses {
        tracing::trace!("{}: {}", url, miss);
    }
    tracing::debug!(
        "Extracted {} ({} of {} rules missed)",
        url,
        misses.len(),
        FIELD_RULES.len()
    );

    Ok(record)
}

/// Runs every rule of [`FIELD_RULES`] against an already-parsed page
///
/// Returns the record together with the misses, which callers only log.
pub fn extract_fields(document: &Document, url: &str) -> (Record, Vec<ExtractionMiss>) {
    let mut record = Record::empty(url);
    let misses = FIELD_RULES
        .iter()
        .filter_map(|rule| (rule.apply)(rule, document, &mut record).err())
        .collect();
    (record, misses)
}

/// Trimmed text of the first match, missing if absent or blank
fn first_text(rule: &FieldRule, document: &Document) -> Result<String, ExtractionMiss> {
    let element = document
        .find_first(rule.selector)
        .ok_or_else(|| rule.no_match())?;
    let text = text_of(element);
    if text.is_empty() {
        return Err(rule.miss("element has no text"));
    }
    Ok(text)
}

/// First whitespace-separated token of a text
fn first_token(rule: &FieldRule, text: &str) -> Result<String, ExtractionMiss> {
    text.split_whitespace()
        .next()
        .map(str::to_string)
        .ok_or_else(|| rule.miss("element has no text"))
}

/// Trimmed texts of every match, possibly empty
fn all_texts(document: &Document, selector: &str) -> Vec<String> {
    document
        .find_all(selector)
        .into_iter()
        .map(text_of)
        .filter(|text| !text.is_empty())
        .collect()
}

fn extract_title(rule: &FieldRule, document: &Document, record: &mut Record) -> RuleResult {
    record.title = Some(first_text(rule, document)?);
    Ok(())
}

fn extract_parent_item(rule: &FieldRule, document: &Document, record: &mut Record) -> RuleResult {
    record.parent_item = Some(first_text(rule, document)?);
    Ok(())
}

/// Last three tokens, e.g. "Released on Dec 10, 2020" -> "Dec 10, 2020"
fn extract_release_date(rule: &FieldRule, document: &Document, record: &mut Record) -> RuleResult {
    let text = first_text(rule, document)?;
    // Drop the "Released on" prefix
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let start = tokens.len().saturating_sub(3);
    record.release_date = Some(tokens[start..].join(" "));
    Ok(())
}

fn extract_team(rule: &FieldRule, document: &Document, record: &mut Record) -> RuleResult {
    let credits = document
        .find_first(rule.selector)
        .ok_or_else(|| rule.no_match())?;
    let team = find_all_in(credits, "a")
        .into_iter()
        .map(text_of)
        .filter(|name| !name.is_empty())
        .collect();
    record.team = Some(team);
    Ok(())
}

/// Last three characters parsed as a float, e.g. "Rating4.2" -> 4.2
fn extract_rating(rule: &FieldRule, document: &Document, record: &mut Record) -> RuleResult {
    let text = first_text(rule, document)?;
    let chars: Vec<char> = text.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(3)..].iter().collect();

    let rating: f64 = tail
        .trim()
        .parse()
        .map_err(|_| rule.miss(format!("'{}' is not a number", tail)))?;
    if !rating.is_finite() || rating < 0.0 {
        return Err(rule.miss(format!("'{}' is not a rating", tail)));
    }

    record.rating = Some(rating);
    Ok(())
}

fn extract_listed(rule: &FieldRule, document: &Document, record: &mut Record) -> RuleResult {
    let text = first_text(rule, document)?;
    record.listed = Some(Count::Raw(first_token(rule, &text)?));
    Ok(())
}

/// The sidecard after the list count: a following sibling first, then
/// anywhere later in the document
fn extract_reviewed(rule: &FieldRule, document: &Document, record: &mut Record) -> RuleResult {
    let listed = document
        .find_first(rule.selector)
        .ok_or_else(|| rule.no_match())?;

    // Sibling first, then anything later in the document
    let reviewed = next_sibling_element(listed)
        .filter(|element| matches(*element, rule.selector))
        .or_else(|| document.next_match(listed, rule.selector))
        .ok_or_else(|| rule.miss("no second sidecard"))?;

    record.reviewed = Some(Count::Raw(first_token(rule, &text_of(reviewed))?));
    Ok(())
}

fn extract_platforms(rule: &FieldRule, document: &Document, record: &mut Record) -> RuleResult {
    record.platforms = all_texts(document, rule.selector);
    Ok(())
}

fn extract_genres(rule: &FieldRule, document: &Document, record: &mut Record) -> RuleResult {
    record.genres = all_texts(document, rule.selector);
    Ok(())
}

fn extract_summary(rule: &FieldRule, document: &Document, record: &mut Record) -> RuleResult {
    record.summary = Some(first_text(rule, document)?);
    Ok(())
}

/// Body text of every review card; cards without a body are skipped
fn extract_reviews(rule: &FieldRule, document: &Document, record: &mut Record) -> RuleResult {
    let section = document
        .find_first(rule.selector)
        .ok_or_else(|| rule.no_match())?;

    record.reviews = find_all_in(section, REVIEW_CARD)
        .into_iter()
        .filter_map(|card| find_first_in(card, REVIEW_BODY))
        .map(text_of)
        .filter(|text| !text.is_empty())
        .collect();
    Ok(())
}

/// Generic labeled-value scan over the statistics strip
///
/// Each container holds a label on its first line and a value on its last.
/// Unknown labels are ignored; counters whose container is missing stay null.
fn extract_counters(rule: &FieldRule, document: &Document, record: &mut Record) -> RuleResult {
    let containers = document.find_all(rule.selector);
    if containers.is_empty() {
        return Err(rule.no_match());
    }

    for container in containers {
        let lines = text_lines(container);
        if lines.len() < 2 {
            continue;
        }
        // Label on the first line, value on the last
        let (label, value) = (&lines[0], &lines[lines.len() - 1]);

        let slot = match label.to_lowercase().as_str() {
            "plays" => &mut record.plays,
            "playing" => &mut record.playing,
            "backlogs" => &mut record.backlogs,
            "wishlist" => &mut record.wishlist,
            _ => continue,
        };
        *slot = Some(Count::Raw(value.clone()));
    }

    Ok(())
}
