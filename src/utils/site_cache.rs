use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

/// Geofence fields of a site. Coordinates may be unset, in which case
/// enforcement is skipped (or, on check-out, rejected).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SiteGeo {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub geofence_radius_m: Option<f64>,
}

/// Read-through cache of site geofence data keyed by (tenant, site).
/// Sites change rarely; attendance reads them on every check-in/out.
static SITE_GEO_CACHE: Lazy<Cache<(u64, u64), SiteGeo>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(100_000)
        .time_to_live(Duration::from_secs(3600)) // 1h TTL
        .build()
});

/// Fetch a site's geofence data, active sites only. Cross-tenant ids
/// resolve to None exactly like missing rows.
pub async fn site_geo(
    pool: &MySqlPool,
    tenant_id: u64,
    site_id: u64,
) -> Result<Option<SiteGeo>, sqlx::Error> {
    if let Some(geo) = SITE_GEO_CACHE.get(&(tenant_id, site_id)).await {
        return Ok(Some(geo));
    }

    let row = sqlx::query_as::<_, SiteGeo>(
        r#"
        SELECT latitude, longitude, geofence_radius_m
        FROM sites
        WHERE id = ? AND tenant_id = ? AND is_active = 1
        "#,
    )
    .bind(site_id)
    .bind(tenant_id)
    .fetch_optional(pool)
    .await?;

    if let Some(geo) = &row {
        SITE_GEO_CACHE
            .insert((tenant_id, site_id), geo.clone())
            .await;
    }

    Ok(row)
}

/// Drop a site from the cache after mutation or deactivation.
pub async fn invalidate(tenant_id: u64, site_id: u64) {
    SITE_GEO_CACHE.invalidate(&(tenant_id, site_id)).await;
}

/// Load geofence data of active sites into the cache at startup (batched).
pub async fn warmup_site_cache(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (u64, u64, Option<f64>, Option<f64>, Option<f64>)>(
        r#"
        SELECT id, tenant_id, latitude, longitude, geofence_radius_m
        FROM sites
        WHERE is_active = 1 AND latitude IS NOT NULL AND longitude IS NOT NULL
        "#,
    )
    .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total_count = 0usize;

    while let Some(row) = stream.next().await {
        let (id, tenant_id, latitude, longitude, geofence_radius_m) = row?;
        batch.push((
            (tenant_id, id),
            SiteGeo {
                latitude,
                longitude,
                geofence_radius_m,
            },
        ));
        total_count += 1;

        if batch.len() >= batch_size {
            insert_batch(&mut batch).await;
        }
    }

    if !batch.is_empty() {
        insert_batch(&mut batch).await;
    }

    log::info!("Site geofence cache warmup complete: {} sites", total_count);
    Ok(())
}

async fn insert_batch(batch: &mut Vec<((u64, u64), SiteGeo)>) {
    let futures: Vec<_> = batch
        .drain(..)
        .map(|(key, geo)| SITE_GEO_CACHE.insert(key, geo))
        .collect();

    futures::future::join_all(futures).await;
}
