//! PostgreSQL-backed address store.
//!
//! Each user row holds its collection in the `addresses` jsonb column. Both
//! mutations are single conditional `UPDATE` statements, so PostgreSQL's row
//! lock makes the guard and the write one atomic step: a concurrent update
//! waits for the lock and re-evaluates the guard against the committed row.
//! Both statements also refuse an identifier already held by another element.
//! A statement that touches no row is classified with a follow-up read.

use async_trait::async_trait;
use diesel::sql_types::{Integer, Jsonb, Nullable, Text};
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, define_sql_function, sql_query};
use diesel_async::RunQueryDsl;
use serde_json::Value;
use tracing::debug;

use crate::domain::ports::{AddressStore, AddressStoreError};
use crate::domain::{Address, AddressReplacement, UserId};

use super::address_store_error_mapping::{map_diesel_error, map_document_error, map_pool_error};
use super::pool::DbPool;
use super::schema::users;

define_sql_function! {
    fn jsonb_array_length(value: Jsonb) -> Integer;
}

const APPEND_SQL: &str = r#"
UPDATE users
SET addresses = addresses || jsonb_build_array($2::jsonb)
WHERE user_id = $1
  AND jsonb_array_length(addresses) < $3
  AND NOT EXISTS (
      SELECT 1 FROM jsonb_array_elements(addresses) AS element
      WHERE element ->> 'address_id' = $4
  )
"#;

const REPLACE_AT_INDEX_SQL: &str = r#"
UPDATE users
SET addresses = jsonb_set(
    addresses,
    ARRAY[$2::text],
    $3::jsonb || jsonb_build_object(
        'address_id',
        COALESCE($4, addresses -> $2 ->> 'address_id')
    ),
    false
)
WHERE user_id = $1
  AND jsonb_array_length(addresses) > $2
  AND (
      $4 IS NULL
      OR NOT EXISTS (
          SELECT 1 FROM jsonb_array_elements(addresses) WITH ORDINALITY AS element(value, position)
          WHERE element.position - 1 <> $2
            AND element.value ->> 'address_id' = $4
      )
  )
"#;

/// Diesel-backed implementation of [`AddressStore`].
#[derive(Clone)]
pub struct DieselAddressStore {
    pool: DbPool,
}

impl DieselAddressStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn read_document(&self, user_id: &UserId) -> Result<Option<Value>, AddressStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::user_id.eq(user_id.as_ref()))
            .select(users::addresses)
            .first::<Value>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find_user_addresses"))
    }

    /// Explain why a conditional append matched no row.
    async fn classify_rejected_append(
        &self,
        user_id: &UserId,
        address: &Address,
        max_addresses: usize,
    ) -> AddressStoreError {
        let addresses = match self.find_user_addresses(user_id).await {
            Ok(addresses) => addresses,
            Err(error) => return error,
        };
        if addresses
            .iter()
            .any(|existing| existing.address_id == address.address_id)
        {
            return AddressStoreError::duplicate_address_id(address.address_id.as_ref());
        }
        if addresses.len() >= max_addresses {
            return AddressStoreError::limit_exceeded(max_addresses);
        }
        // The guard failed but the row now satisfies it: the document changed
        // between the two statements, so a fresh attempt is meaningful.
        AddressStoreError::unavailable("address collection changed during append")
    }

    /// Explain why a positional replace matched no row.
    async fn classify_rejected_replace(
        &self,
        user_id: &UserId,
        index: usize,
        replacement: &AddressReplacement,
    ) -> AddressStoreError {
        let addresses = match self.find_user_addresses(user_id).await {
            Ok(addresses) => addresses,
            Err(error) => return error,
        };
        if index >= addresses.len() {
            return AddressStoreError::index_out_of_range(index, addresses.len());
        }
        if let Some(explicit) = replacement.address_id.as_ref() {
            let taken = addresses
                .iter()
                .enumerate()
                .any(|(position, existing)| position != index && existing.address_id == *explicit);
            if taken {
                return AddressStoreError::duplicate_address_id(explicit.as_ref());
            }
        }
        AddressStoreError::unavailable("address collection changed during replace")
    }
}

fn to_sql_int(value: usize, what: &str) -> Result<i32, AddressStoreError> {
    i32::try_from(value).map_err(|_| AddressStoreError::query(format!("{what} out of range")))
}

#[async_trait]
impl AddressStore for DieselAddressStore {
    async fn find_user_address_count(
        &self,
        user_id: &UserId,
    ) -> Result<usize, AddressStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count = users::table
            .filter(users::user_id.eq(user_id.as_ref()))
            .select(jsonb_array_length(users::addresses))
            .first::<i32>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find_user_address_count"))?
            .ok_or_else(AddressStoreError::user_not_found)?;
        usize::try_from(count)
            .map_err(|_| AddressStoreError::query("negative address collection length"))
    }

    async fn find_user_addresses(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Address>, AddressStoreError> {
        let document = self
            .read_document(user_id)
            .await?
            .ok_or_else(AddressStoreError::user_not_found)?;
        serde_json::from_value(document).map_err(map_document_error)
    }

    async fn append_address_atomic(
        &self,
        user_id: &UserId,
        address: &Address,
        max_addresses: usize,
    ) -> Result<(), AddressStoreError> {
        let element = serde_json::to_value(address).map_err(map_document_error)?;
        let max = to_sql_int(max_addresses, "max addresses")?;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = sql_query(APPEND_SQL)
            .bind::<Text, _>(user_id.as_ref())
            .bind::<Jsonb, _>(&element)
            .bind::<Integer, _>(max)
            .bind::<Text, _>(address.address_id.as_ref())
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "append_address_atomic"))?;
        drop(conn);

        if updated == 1 {
            return Ok(());
        }
        debug!(user_id = %user_id, "conditional append matched no row");
        Err(self
            .classify_rejected_append(user_id, address, max_addresses)
            .await)
    }

    async fn replace_address_at_index(
        &self,
        user_id: &UserId,
        index: usize,
        replacement: &AddressReplacement,
    ) -> Result<(), AddressStoreError> {
        let fields = serde_json::to_value(&replacement.fields).map_err(map_document_error)?;
        let position = to_sql_int(index, "address index")?;
        let explicit_id = replacement.address_id.as_ref().map(AsRef::<str>::as_ref);

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = sql_query(REPLACE_AT_INDEX_SQL)
            .bind::<Text, _>(user_id.as_ref())
            .bind::<Integer, _>(position)
            .bind::<Jsonb, _>(&fields)
            .bind::<Nullable<Text>, _>(explicit_id)
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "replace_address_at_index"))?;
        drop(conn);

        if updated == 1 {
            return Ok(());
        }
        debug!(user_id = %user_id, index, "positional replace matched no row");
        Err(self
            .classify_rejected_replace(user_id, index, replacement)
            .await)
    }
}
