//! Name catalog: paginated acquisition of every candidate name.
//!
//! The remote list is walked page by page (`limit` = page size, `offset`
//! advancing by the page size) until a page reports no `next` link. Names are
//! kept exactly as received; case folding happens only when a guess is
//! compared. Any failure aborts the whole load, no partial catalog is kept.

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::GameError;

/// One page of the list endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct NamePage {
    pub results: Vec<NamedEntry>,
    /// URL of the following page, `null` on the last one.
    pub next: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NamedEntry {
    pub name: String,
}

impl NamePage {
    pub fn from_json(body: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}

/// Anything that can hand out list pages (HTTP in the browser, fixtures in tests).
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch_page(&self, limit: usize, offset: usize) -> Result<NamePage, GameError>;
}

pub fn page_url(list_base: &str, limit: usize, offset: usize) -> String {
    format!("{list_base}?limit={limit}&offset={offset}")
}

/// Ordered, immutable list of names. The position of a name is its identity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameCatalog {
    names: Vec<String>,
}

impl NameCatalog {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { names: names.into_iter().map(Into::into).collect() }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Walk every page of `source` and concatenate the names in arrival order.
pub async fn load_catalog<S: PageSource>(
    source: &S,
    page_size: usize,
) -> Result<NameCatalog, GameError> {
    let mut names: Vec<String> = Vec::new();
    let mut offset = 0usize;
    let mut pages = 0usize;
    loop {
        let page = source.fetch_page(page_size, offset).await?;
        pages += 1;
        debug!(offset, received = page.results.len(), last = page.is_last(), "catalog page");
        let last = page.is_last();
        names.extend(page.results.into_iter().map(|e| e.name));
        offset += page_size;
        if last {
            break;
        }
    }
    info!(names = names.len(), pages, "catalog loaded");
    Ok(NameCatalog { names })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Serves a fixed list in pages, recording every (limit, offset) requested.
    struct FixturePages {
        all: Vec<String>,
        requests: RefCell<Vec<(usize, usize)>>,
    }

    impl FixturePages {
        fn new(count: usize) -> Self {
            Self {
                all: (0..count).map(|i| format!("mon-{i}")).collect(),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl PageSource for FixturePages {
        async fn fetch_page(&self, limit: usize, offset: usize) -> Result<NamePage, GameError> {
            self.requests.borrow_mut().push((limit, offset));
            let end = (offset + limit).min(self.all.len());
            let start = offset.min(end);
            let results = self.all[start..end]
                .iter()
                .map(|n| NamedEntry { name: n.clone() })
                .collect();
            let next = (end < self.all.len()).then(|| format!("next?offset={end}"));
            Ok(NamePage { results, next })
        }
    }

    #[test]
    fn page_url_matches_list_endpoint_shape() {
        assert_eq!(
            page_url("https://pokeapi.co/api/v2/pokemon", 100, 200),
            "https://pokeapi.co/api/v2/pokemon?limit=100&offset=200"
        );
    }

    #[test]
    fn parses_list_endpoint_body() {
        let body = r#"{"count":1302,"next":"https://pokeapi.co/api/v2/pokemon?offset=100&limit=100",
            "previous":null,"results":[{"name":"bulbasaur","url":"https://pokeapi.co/api/v2/pokemon/1/"},
            {"name":"ivysaur","url":"https://pokeapi.co/api/v2/pokemon/2/"}]}"#;
        let page = NamePage::from_json(body).unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[1].name, "ivysaur");
        assert!(!page.is_last());

        let last = NamePage::from_json(r#"{"next":null,"results":[]}"#).unwrap();
        assert!(last.is_last());
    }

    #[test]
    fn missing_results_is_a_decode_error() {
        assert!(matches!(NamePage::from_json(r#"{"next":null}"#), Err(GameError::Decode(_))));
    }

    #[test]
    fn concatenates_pages_in_order_and_stops_after_last() {
        for (count, page_size) in [(0usize, 100usize), (1, 100), (100, 100), (250, 100), (7, 3)] {
            let src = FixturePages::new(count);
            let catalog = pollster::block_on(load_catalog(&src, page_size)).unwrap();
            assert_eq!(catalog.len(), count);
            assert_eq!(catalog.names(), src.all.as_slice());

            let reqs = src.requests.borrow();
            let expected_pages = count.div_ceil(page_size).max(1);
            assert_eq!(reqs.len(), expected_pages, "count={count} page_size={page_size}");
            for (i, &(limit, offset)) in reqs.iter().enumerate() {
                assert_eq!(limit, page_size);
                assert_eq!(offset, i * page_size);
            }
        }
    }

    #[test]
    fn first_failure_aborts_the_load() {
        struct FailsOnSecond(RefCell<usize>);
        impl PageSource for FailsOnSecond {
            async fn fetch_page(&self, _limit: usize, offset: usize) -> Result<NamePage, GameError> {
                *self.0.borrow_mut() += 1;
                if offset == 0 {
                    Ok(NamePage {
                        results: vec![NamedEntry { name: "bulbasaur".into() }],
                        next: Some("more".into()),
                    })
                } else {
                    Err(GameError::Network("connection reset".into()))
                }
            }
        }
        let src = FailsOnSecond(RefCell::new(0));
        let res = pollster::block_on(load_catalog(&src, 100));
        assert!(matches!(res, Err(GameError::Network(_))));
        assert_eq!(*src.0.borrow(), 2, "no retry after a failed page");
    }
}
