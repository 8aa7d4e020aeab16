//! Offer store backed by a PostgREST-style HTTP endpoint (`/rest/v1/<table>`).
//!
//! A [`SearchQuery`] is translated into request parameters in exactly one
//! place, [`offer_search_params`]:
//!
//! - every keyword term becomes its own `title=ilike.*term*` filter; repeated
//!   filters on a column are combined with AND by the backend,
//! - `*` is the pattern wildcard and cannot be escaped, so it is left out of
//!   the pattern and rows are checked against the literal terms on arrival,
//! - a restricted source filter becomes `site_id=in.(1,2,...)`,
//! - results are ordered with `order=reward_decimal.desc`.

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use url::Url;

use finder_core::{Offer, OfferOrder, SearchQuery, Source, SourceFilter, SourceId};
use finder_logging::{finder_debug, finder_trace};

use crate::config::{OFFERS_TABLE, SOURCES_TABLE};
use crate::{FailureKind, OfferStore, StoreConfig, StoreError};

const OFFER_COLUMNS: &str = "id,title,reward_decimal,devices,site_id,point_sites(name)";

#[derive(Debug, Deserialize)]
struct SourceRow {
    id: i64,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OfferRow {
    id: i64,
    title: String,
    reward_decimal: Option<f64>,
    devices: Option<String>,
    site_id: SourceId,
    point_sites: Option<JoinedSource>,
}

#[derive(Debug, Deserialize)]
struct JoinedSource {
    name: Option<String>,
}

impl From<SourceRow> for Source {
    fn from(row: SourceRow) -> Self {
        Source::new(row.id, row.name.unwrap_or_default())
    }
}

impl From<OfferRow> for Offer {
    fn from(row: OfferRow) -> Self {
        Offer {
            id: row.id,
            title: row.title,
            reward_value: row.reward_decimal.unwrap_or_default(),
            devices: row.devices.unwrap_or_default(),
            source_name: row
                .point_sites
                .and_then(|site| site.name)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RestOfferStore {
    config: StoreConfig,
    client: reqwest::Client,
}

impl RestOfferStore {
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.settings.connect_timeout)
            .timeout(config.settings.request_timeout)
            .build()
            .map_err(|err| StoreError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { config, client })
    }

    fn table_url(&self, table: &str, params: &[(&str, String)]) -> Result<Url, StoreError> {
        let base = self.config.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/rest/v1/{table}"))
            .map_err(|err| StoreError::new(FailureKind::InvalidUrl, err.to_string()))?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(key, value)| (*key, value.as_str())));
        Ok(url)
    }

    async fn get_rows<T>(&self, url: Url) -> Result<Vec<T>, StoreError>
    where
        T: for<'de> Deserialize<'de>,
    {
        finder_trace!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header("apikey", &self.config.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.config.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(StoreError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(StoreError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            body.extend_from_slice(&chunk);
        }

        serde_json::from_slice(&body)
            .map_err(|err| StoreError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl OfferStore for RestOfferStore {
    async fn list_sources(&self) -> Result<Vec<Source>, StoreError> {
        let params = [("select", "id,name".to_string()), ("order", "id.asc".to_string())];
        let url = self.table_url(SOURCES_TABLE, &params)?;
        let rows: Vec<SourceRow> = self.get_rows(url).await?;
        finder_debug!("Fetched {} sources", rows.len());
        Ok(rows.into_iter().map(Source::from).collect())
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Offer>, StoreError> {
        let url = self.table_url(OFFERS_TABLE, &offer_search_params(query))?;
        let rows: Vec<OfferRow> = self.get_rows(url).await?;
        let fetched = rows.len();
        let offers: Vec<Offer> = rows
            .into_iter()
            .filter(|row| query.matches(&row.title, row.site_id))
            .map(Offer::from)
            .collect();
        finder_debug!(
            "Search for {:?} returned {} offers ({} dropped)",
            query.keyword_terms(),
            offers.len(),
            fetched - offers.len()
        );
        Ok(offers)
    }
}

/// Query parameters for an offer search, in request order.
pub fn offer_search_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("select", OFFER_COLUMNS.to_string())];
    for term in query.keyword_terms() {
        let pattern = escape_like_term(term);
        if !pattern.is_empty() {
            params.push(("title", format!("ilike.*{pattern}*")));
        }
    }
    if let SourceFilter::Only(ids) = query.source_filter() {
        let list = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        params.push(("site_id", format!("in.({list})")));
    }
    match query.order() {
        OfferOrder::RewardDescending => {
            params.push(("order", "reward_decimal.desc".to_string()));
        }
    }
    params
}

/// Makes a keyword term match literally inside an `ilike` pattern.
///
/// `*` is the wildcard of the filter syntax and cannot be escaped, so it is dropped.
fn escape_like_term(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        match ch {
            '*' => {}
            '\\' | '%' | '_' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn map_reqwest_error(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        return StoreError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return StoreError::new(FailureKind::Decode, err.to_string());
    }
    StoreError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use finder_core::{compose, Composed};
    use std::collections::BTreeSet;

    fn query(keyword: &str, selection: &[i64]) -> SearchQuery {
        match compose(keyword, &selection.iter().copied().collect::<BTreeSet<_>>()) {
            Composed::Query(query) => query,
            Composed::Empty => panic!("blank keyword"),
        }
    }

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(escape_like_term("100%_off"), "100\\%\\_off");
        assert_eq!(escape_like_term("a*b"), "ab");
        assert_eq!(escape_like_term("c:\\"), "c:\\\\");
    }

    #[test]
    fn params_carry_one_filter_per_term() {
        let params = offer_search_params(&query("foo bar", &[2, 1]));
        assert_eq!(
            params,
            vec![
                ("select", OFFER_COLUMNS.to_string()),
                ("title", "ilike.*foo*".to_string()),
                ("title", "ilike.*bar*".to_string()),
                ("site_id", "in.(1,2)".to_string()),
                ("order", "reward_decimal.desc".to_string()),
            ]
        );
    }

    #[test]
    fn wildcard_only_terms_send_no_pattern() {
        let params = offer_search_params(&query("cinema *", &[]));
        let titles: Vec<_> = params.iter().filter(|(key, _)| *key == "title").collect();
        assert_eq!(titles, vec![&("title", "ilike.*cinema*".to_string())]);
    }

    #[test]
    fn all_sources_omits_site_filter() {
        let params = offer_search_params(&query("foo", &[]));
        assert!(params.iter().all(|(key, _)| *key != "site_id"));
    }
}
