//! Sequence Counter Store and reference ID generation
//!
//! Counters are rows in `sequence_counters`, keyed by an opaque string and
//! created on first use. The increment is a single atomic upsert executed
//! server-side, so N concurrent callers on the same key receive exactly
//! the values {1, ..., N} with no duplicates. A separate read-then-write
//! pair would reintroduce the race this table exists to prevent.
//!
//! Two key namespaces are in use:
//! - `campaign_{platform}` for campaign reference IDs (`FB-001`)
//! - `order_{campaign_reference_id}` for order reference IDs (`FB-001-01`)
//!
//! The campaign reference string is used verbatim as key material, so each
//! campaign's order counter is independent of every other campaign's.

use payloads::Platform;
use sqlx::{PgExecutor, Postgres, Transaction};

use super::StoreError;

/// Atomically issue the next value for `key`: 1 on first use, then the
/// stored value plus one. The counter row persists indefinitely.
pub async fn next_sequence<'e>(
    key: &str,
    executor: impl PgExecutor<'e>,
) -> Result<i64, StoreError> {
    let value = sqlx::query_scalar::<_, i64>(
        "INSERT INTO sequence_counters (name, value)
        VALUES ($1, 1)
        ON CONFLICT (name)
        DO UPDATE SET value = sequence_counters.value + 1
        RETURNING value",
    )
    .bind(key)
    .fetch_one(executor)
    .await?;
    Ok(value)
}

/// Issue a campaign reference ID like `FB-001`. The sequence is zero-padded
/// to three digits and widens beyond that rather than truncating.
pub async fn campaign_reference_id(
    platform: Platform,
    tx: &mut Transaction<'_, Postgres>,
) -> Result<String, StoreError> {
    let key = format!("campaign_{}", platform.as_str());
    let seq = next_sequence(&key, &mut **tx).await?;
    Ok(format!("{}-{seq:03}", platform.prefix()))
}

/// Issue an order reference ID like `FB-001-01`, zero-padded to two digits.
pub async fn order_reference_id(
    campaign_reference_id: &str,
    tx: &mut Transaction<'_, Postgres>,
) -> Result<String, StoreError> {
    let key = format!("order_{campaign_reference_id}");
    let seq = next_sequence(&key, &mut **tx).await?;
    Ok(format!("{campaign_reference_id}-{seq:02}"))
}
