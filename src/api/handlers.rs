// HTTP request handlers for the five domain endpoints.
//
// Each handler runs the live pipeline against a fresh transport session
// and, when that fails, serves the CSV snapshot reconstruction instead.
// Only a snapshot failure ever surfaces as a server error.

use actix_web::{error, web, HttpResponse, Result};
use tracing::warn;

use crate::api::models::{YearCategoryQuery, YearQuery};
use crate::config::AppConfig;
use crate::domain::Domain;
use crate::fallback;
use crate::scrape::{self, HttpTransport};

/// Health check endpoint
pub async fn health_check() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

pub async fn production(
    query: web::Query<YearQuery>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse> {
    scrape_or_fallback(&config, Domain::Production, &query.year, 0).await
}

pub async fn processing(
    query: web::Query<YearCategoryQuery>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse> {
    check_category(Domain::Processing, query.category)?;
    scrape_or_fallback(&config, Domain::Processing, &query.year, query.category).await
}

pub async fn commercialization(
    query: web::Query<YearQuery>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse> {
    scrape_or_fallback(&config, Domain::Commercialization, &query.year, 0).await
}

pub async fn import(
    query: web::Query<YearCategoryQuery>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse> {
    check_category(Domain::Import, query.category)?;
    scrape_or_fallback(&config, Domain::Import, &query.year, query.category).await
}

pub async fn export(
    query: web::Query<YearCategoryQuery>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse> {
    check_category(Domain::Export, query.category)?;
    scrape_or_fallback(&config, Domain::Export, &query.year, query.category).await
}

/// Reject categories outside the domain's bounds; 0 means all.
fn check_category(domain: Domain, category: u8) -> Result<()> {
    if category == 0 {
        return Ok(());
    }
    match domain.category_bounds() {
        Some(bounds) if bounds.contains(&category) => Ok(()),
        Some(bounds) => Err(error::ErrorBadRequest(format!(
            "category must be 0 or {}..={}",
            bounds.start(),
            bounds.end()
        ))),
        None => Err(error::ErrorBadRequest("domain has no categories")),
    }
}

async fn scrape_or_fallback(
    config: &AppConfig,
    domain: Domain,
    year: &str,
    category: u8,
) -> Result<HttpResponse> {
    // One transport session per batch; connections are reused across the
    // fan-out and torn down with it.
    let transport = HttpTransport::new().map_err(error::ErrorInternalServerError)?;
    let groups =
        match scrape::run(&transport, &config.base_url, domain, year, category).await {
            Ok(groups) => groups,
            Err(err) => {
                warn!(
                    domain = domain.as_str(),
                    %err,
                    "live scrape failed, serving CSV snapshot"
                );
                fallback::reconstruct(&config.data_dir, domain, year, category)
                    .map_err(error::ErrorInternalServerError)?
            }
        };
    Ok(HttpResponse::Ok().json(groups))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_zero_is_always_accepted() {
        assert!(check_category(Domain::Processing, 0).is_ok());
        assert!(check_category(Domain::Production, 0).is_ok());
    }

    #[test]
    fn category_bounds_are_enforced_per_domain() {
        assert!(check_category(Domain::Processing, 4).is_ok());
        assert!(check_category(Domain::Processing, 5).is_err());
        assert!(check_category(Domain::Import, 5).is_ok());
        assert!(check_category(Domain::Export, 5).is_err());
    }

    #[test]
    fn domains_without_categories_reject_explicit_values() {
        assert!(check_category(Domain::Production, 1).is_err());
    }
}
