//! Fan-out coordinator: discovery, concurrent per-(sub-category, year)
//! fetches, then in-order classification and tree assembly.
//!
//! Concurrency is for throughput only. All fetches of one batch run over
//! one injected transport session and are reassembled in submission
//! order (sub-categories outer, years inner), regardless of completion
//! timing. A task that fetched the empty sentinel or a page without the
//! results table contributes nothing; a transport or discovery failure
//! aborts the whole batch so the caller can dispatch the CSV fallback.

use futures::future::join_all;
use scraper::Html;
use tracing::debug;

use crate::domain::{Domain, TableShape, NO_CATEGORY};
use crate::error::ScrapeError;
use crate::model::CategoryGroup;

use super::classify;
use super::discovery::{self, SubCategory};
use super::transport::Transport;

/// One unit of work for the batch: the query to issue and the group the
/// result folds into.
struct FetchTask {
    year: i32,
    subcategory: Option<SubCategory>,
}

impl FetchTask {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::with_capacity(2);
        if let Some(sub) = &self.subcategory {
            query.push(("subopcao", sub.value.clone()));
        }
        query.push(("ano", self.year.to_string()));
        query
    }

    fn group_title(&self) -> String {
        match &self.subcategory {
            Some(sub) => sub.label.clone(),
            None => NO_CATEGORY.to_string(),
        }
    }
}

/// Run the live pipeline for one domain request.
pub async fn run(
    transport: &dyn Transport,
    base_url: &str,
    domain: Domain,
    year_token: &str,
    category: u8,
) -> Result<Vec<CategoryGroup>, ScrapeError> {
    let url = format!("{}{}", base_url, domain.option_code());
    debug!(%url, domain = domain.as_str(), "starting live scrape");

    let landing = transport.get(&url, &[]).await?;
    if landing.is_empty() {
        // Discovery cannot proceed without the landing page.
        return Err(ScrapeError::PageLayout("empty landing page".into()));
    }

    let tasks = {
        let page = Html::parse_document(&landing);
        let window = discovery::year_window(&page)?;
        let years = discovery::resolve_years(year_token, window)?;
        let subcategories = if domain.has_subcategories() {
            Some(discovery::subcategories(&page, category))
        } else {
            None
        };
        build_tasks(&years, subcategories)
    };

    let fetches = tasks.iter().map(|task| {
        let query = task.query();
        let url = &url;
        async move { transport.get(url, &query).await }
    });
    let pages = join_all(fetches).await;

    let mut groups: Vec<CategoryGroup> = Vec::new();
    for (task, fetched) in tasks.iter().zip(pages) {
        let content = fetched?;
        if content.is_empty() {
            debug!(year = task.year, "empty content, skipping task");
            continue;
        }
        let page = Html::parse_document(&content);
        let types = match domain.table_shape() {
            TableShape::Marker => {
                classify::classify_marker(&page, task.year, domain.quantity_unit())
            }
            TableShape::Trade => classify::classify_trade(
                &page,
                task.year,
                domain.quantity_unit(),
                domain.value_unit().unwrap_or_default(),
            ),
        };
        if types.is_empty() {
            continue;
        }
        let title = task.group_title();
        match groups.last_mut() {
            Some(last) if last.title == title => last.types.extend(types),
            _ => groups.push(CategoryGroup { title, types }),
        }
    }

    Ok(groups)
}

/// Cartesian product of the request: sub-categories outer, years inner.
fn build_tasks(years: &[i32], subcategories: Option<Vec<SubCategory>>) -> Vec<FetchTask> {
    match subcategories {
        Some(subs) => subs
            .into_iter()
            .flat_map(|sub| {
                years
                    .iter()
                    .map(move |&year| FetchTask { year, subcategory: Some(sub.clone()) })
            })
            .collect(),
        None => years
            .iter()
            .map(|&year| FetchTask { year, subcategory: None })
            .collect(),
    }
}
