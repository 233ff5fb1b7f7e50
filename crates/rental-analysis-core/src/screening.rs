//! Filter and rank a portfolio of candidate properties.
//!
//! Metric-based filters and sort keys recompute `InvestmentMetrics` for each
//! listing; nothing is cached between calls.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::time::Instant;
use tracing::debug;

use crate::grading::{investment_grade, InvestmentGrade};
use crate::metrics::investment_metrics;
use crate::property::{validate_property, Property};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::RentalAnalysisResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyType {
    SingleFamily,
    Condo,
    Townhouse,
    MultiFamily,
}

/// A property plus the descriptive fields a listing carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyListing {
    pub id: String,
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(alias = "propertyType")]
    pub property_type: PropertyType,
    /// RFC 3339 timestamp; a bare `YYYY-MM-DD` is read as midnight UTC
    #[serde(alias = "dateAdded", deserialize_with = "deserialize_date_added")]
    pub date_added: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub property: Property,
}

/// Unset bounds do not filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningFilters {
    #[serde(alias = "minPrice", skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Money>,
    #[serde(alias = "maxPrice", skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Money>,
    #[serde(alias = "minRent", skip_serializing_if = "Option::is_none")]
    pub min_rent: Option<Money>,
    #[serde(alias = "maxRent", skip_serializing_if = "Option::is_none")]
    pub max_rent: Option<Money>,
    /// Empty means any type
    #[serde(
        alias = "propertyType",
        alias = "propertyTypes",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub property_types: Vec<PropertyType>,
    /// Case-insensitive exact match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Case-insensitive substring match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(alias = "minCapRate", skip_serializing_if = "Option::is_none")]
    pub min_cap_rate: Option<Percent>,
    #[serde(alias = "minCashFlow", skip_serializing_if = "Option::is_none")]
    pub min_cash_flow: Option<Money>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Price,
    Rent,
    #[serde(alias = "capRate")]
    CapRate,
    #[serde(alias = "cashFlow")]
    CashFlow,
    #[default]
    #[serde(alias = "dateAdded")]
    DateAdded,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningInput {
    pub listings: Vec<PropertyListing>,
    #[serde(default)]
    pub filters: ScreeningFilters,
    #[serde(default, alias = "sortBy")]
    pub sort_by: SortKey,
    #[serde(default, alias = "sortOrder")]
    pub sort_order: SortOrder,
}

/// One surviving listing with its headline metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenedProperty {
    pub id: String,
    pub address: String,
    pub purchase_price: Money,
    pub monthly_rent: Money,
    pub cap_rate: Percent,
    pub net_monthly_cash_flow: Money,
    pub cash_on_cash_return: Percent,
    pub grade: InvestmentGrade,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningOutput {
    pub total_listings: usize,
    pub matched: usize,
    pub results: Vec<ScreenedProperty>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Listings passing every filter, in the requested order.
pub fn filter_and_sort<'a>(
    listings: &'a [PropertyListing],
    filters: &ScreeningFilters,
    sort_by: SortKey,
    sort_order: SortOrder,
) -> Vec<&'a PropertyListing> {
    let mut matched: Vec<&PropertyListing> =
        listings.iter().filter(|l| matches_filters(l, filters)).collect();

    matched.sort_by(|a, b| {
        let ordering = compare_by(a, b, sort_by);
        match sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    matched
}

/// Validate every listing, then filter, sort and summarise.
pub fn screen_properties(
    input: &ScreeningInput,
) -> RentalAnalysisResult<ComputationOutput<ScreeningOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    for listing in &input.listings {
        let mut listing_warnings = Vec::new();
        validate_property(&listing.property, &mut listing_warnings)?;
        warnings.extend(
            listing_warnings
                .into_iter()
                .map(|w| format!("{}: {w}", listing.id)),
        );
    }

    let results: Vec<ScreenedProperty> =
        filter_and_sort(&input.listings, &input.filters, input.sort_by, input.sort_order)
            .into_iter()
            .map(|listing| {
                let metrics = investment_metrics(&listing.property);
                ScreenedProperty {
                    id: listing.id.clone(),
                    address: listing.address.clone(),
                    purchase_price: listing.property.purchase_price,
                    monthly_rent: listing.property.monthly_rent,
                    cap_rate: metrics.cap_rate,
                    net_monthly_cash_flow: metrics.net_monthly_cash_flow,
                    cash_on_cash_return: metrics.cash_on_cash_return,
                    grade: investment_grade(&metrics),
                }
            })
            .collect();

    debug!(
        total = input.listings.len(),
        matched = results.len(),
        "screened listings"
    );

    let output = ScreeningOutput {
        total_listings: input.listings.len(),
        matched: results.len(),
        results,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Rental Property Screening",
        &serde_json::json!({
            "filters": input.filters,
            "sort_by": input.sort_by,
            "sort_order": input.sort_order,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn deserialize_date_added<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight))
        .ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid date_added '{raw}': expected an RFC 3339 timestamp or YYYY-MM-DD"
            ))
        })
}

fn matches_filters(listing: &PropertyListing, filters: &ScreeningFilters) -> bool {
    let p = &listing.property;

    if filters.min_price.is_some_and(|min| p.purchase_price < min) {
        return false;
    }
    if filters.max_price.is_some_and(|max| p.purchase_price > max) {
        return false;
    }
    if filters.min_rent.is_some_and(|min| p.monthly_rent < min) {
        return false;
    }
    if filters.max_rent.is_some_and(|max| p.monthly_rent > max) {
        return false;
    }

    if !filters.property_types.is_empty()
        && !filters.property_types.contains(&listing.property_type)
    {
        return false;
    }

    if let Some(state) = &filters.state {
        if !listing.state.eq_ignore_ascii_case(state) {
            return false;
        }
    }
    if let Some(city) = &filters.city {
        if !listing.city.to_lowercase().contains(&city.to_lowercase()) {
            return false;
        }
    }

    if filters.min_cap_rate.is_some() || filters.min_cash_flow.is_some() {
        let metrics = investment_metrics(p);
        if filters.min_cap_rate.is_some_and(|min| metrics.cap_rate < min) {
            return false;
        }
        if filters
            .min_cash_flow
            .is_some_and(|min| metrics.net_monthly_cash_flow < min)
        {
            return false;
        }
    }

    true
}

fn compare_by(a: &PropertyListing, b: &PropertyListing, key: SortKey) -> Ordering {
    match key {
        SortKey::Price => a.property.purchase_price.cmp(&b.property.purchase_price),
        SortKey::Rent => a.property.monthly_rent.cmp(&b.property.monthly_rent),
        SortKey::CapRate => investment_metrics(&a.property)
            .cap_rate
            .cmp(&investment_metrics(&b.property).cap_rate),
        SortKey::CashFlow => investment_metrics(&a.property)
            .net_monthly_cash_flow
            .cmp(&investment_metrics(&b.property).net_monthly_cash_flow),
        SortKey::DateAdded => a.date_added.cmp(&b.date_added),
    }
}
