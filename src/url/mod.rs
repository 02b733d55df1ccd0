//! URL handling module for Catalog-Harvest
//!
//! This module provides parsing of the listing URL, derivation of the site
//! origin, index page URL construction, and resolution of item links.

mod origin;
mod pagination;
mod resolve;

pub use origin::{parse_http_url, site_origin};
pub use pagination::{index_page_url, index_page_urls, PAGE_PARAM};
pub use resolve::resolve_link;
