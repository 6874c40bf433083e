//! Real-time context for search and news requests.
//!
//! [`WebContextProvider`] fetches a page, a web search results page or a
//! headline feed and reduces it to plain text the relay can hand to the model.
//! The HTML and JSON reduction lives in [`Extractor`] and [`parse_headlines`]
//! so it can be tested without a network.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod extract;
mod news;
mod provider;

pub use config::ContextConfig;
pub use extract::{Extractor, SearchResult, format_search_results, is_public_url, is_url};
pub use news::{Headline, format_headlines, parse_headlines};
pub use provider::{WebContext, WebContextProvider};
