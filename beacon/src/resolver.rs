//! Resource directory lookup: validate, then query.
//!
//! The one branching decision in the system. A directory query without a city
//! filter is answered straight from the store. A query with a city filter is
//! a two-stage pipeline: the external geocoder first confirms the city exists
//! ([`CityCheck`]), and only a verified name is used as a store filter. An
//! unknown city is a `NotFound` outcome - the store is never consulted for
//! it, so a verified city with no local resources (an empty list) stays
//! distinguishable from a city that does not exist.

use sqlx::PgPool;
use tracing::instrument;

use crate::db::handlers::{Repository, Resources, resources::ResourceFilter};
use crate::db::models::resources::ResourceDBResponse;
use crate::errors::{Error, Result};
use crate::geocode::{CityCheck, GeocodeClient};

/// Bound on an unfiltered directory listing.
pub const UNFILTERED_LIMIT: i64 = 100;

/// Bound on a city-filtered directory listing.
pub const FILTERED_LIMIT: i64 = 50;

/// Resolve a directory query to a bounded list of resources.
#[instrument(skip(geocode, db), err)]
pub async fn resolve(
    geocode: &GeocodeClient,
    db: &PgPool,
    city: Option<&str>,
) -> Result<Vec<ResourceDBResponse>> {
    let filter = match city {
        None => ResourceFilter::unfiltered(UNFILTERED_LIMIT),
        Some(city) => match geocode.verify_city(city).await? {
            CityCheck::Unknown => {
                return Err(Error::UnknownCity { city: city.to_string() });
            }
            CityCheck::Verified(city) => ResourceFilter::for_city(city, FILTERED_LIMIT),
        },
    };

    let mut conn = db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Resources::new(&mut conn);
    let resources = repo.list(&filter).await?;

    Ok(resources)
}
