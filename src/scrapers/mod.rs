//! Remote retrieval: sitemap documents and page titles.

mod error;
mod http_client;
pub mod sitemap;
pub mod title;

pub use error::{FetchError, TitleError};
pub use http_client::{resolve_user_agent, HttpClient, HttpResponse, USER_AGENT};
pub use sitemap::{parse_sitemap, SitemapDocument, SitemapFetcher, SitemapKind, SitemapSource};
pub use title::{extract_title, TitleOutcome, TitleResolver, TitleSource};
