//! Postgres tag_data 写入实现

use crate::error::StorageError;
use crate::models::{CurrentRow, LegacyRow, ReferenceTagCheck};
use crate::traits::TagDataStore;
use sqlx::{PgPool, Row};

pub struct PgTagDataStore {
    pub pool: PgPool,
    schema: String,
    table: String,
}

impl PgTagDataStore {
    pub fn new(pool: PgPool, schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            pool,
            schema: schema.into(),
            table: table.into(),
        }
    }

    pub async fn connect(
        database_url: &str,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self::new(pool, schema, table))
    }

    /// `"schema"."table"`，标识符已转义。
    fn qualified_table(&self) -> String {
        format!("{}.{}", quote_ident(&self.schema), quote_ident(&self.table))
    }
}

/// 双引号转义 SQL 标识符（目录中读出的表名/列名同样经过此函数）。
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

#[async_trait::async_trait]
impl TagDataStore for PgTagDataStore {
    async fn table_columns(&self) -> Result<Vec<String>, StorageError> {
        let rows = sqlx::query(
            "select column_name::text as column_name from information_schema.columns \
             where table_schema = $1 and table_name = $2 order by ordinal_position",
        )
        .bind(&self.schema)
        .bind(&self.table)
        .fetch_all(&self.pool)
        .await?;
        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            columns.push(row.try_get::<String, _>("column_name")?);
        }
        Ok(columns)
    }

    async fn upsert_current(&self, row: &CurrentRow) -> Result<(), StorageError> {
        let sql = format!(
            "insert into {} (tagid, periodstart, periodtype, hourno, shiftno, value) \
             values ($1, $2, $3, $4, $5, $6) \
             on conflict (tagid, periodtype, periodstart) do update \
             set value = excluded.value, hourno = excluded.hourno, shiftno = excluded.shiftno",
            self.qualified_table()
        );
        sqlx::query(&sql)
            .bind(row.tag_id)
            .bind(row.period_start)
            .bind(row.period_type.as_period_type())
            .bind(row.hour_no)
            .bind(row.shift_no)
            .bind(row.value)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ensure_reference_tag(&self, tag_name: &str) -> Result<ReferenceTagCheck, StorageError> {
        // 从目录中找 tag_name 列上的外键及其引用的表/列
        let target = sqlx::query(
            "select rn.nspname::text as ref_schema, rt.relname::text as ref_table, \
                    ra.attname::text as ref_column \
             from pg_constraint c \
             join pg_class t on t.oid = c.conrelid \
             join pg_namespace n on n.oid = t.relnamespace \
             join pg_attribute a on a.attrelid = c.conrelid and a.attnum = c.conkey[1] \
             join pg_class rt on rt.oid = c.confrelid \
             join pg_namespace rn on rn.oid = rt.relnamespace \
             join pg_attribute ra on ra.attrelid = c.confrelid and ra.attnum = c.confkey[1] \
             where c.contype = 'f' and n.nspname = $1 and t.relname = $2 \
               and a.attname = 'tag_name' \
             limit 1",
        )
        .bind(&self.schema)
        .bind(&self.table)
        .fetch_optional(&self.pool)
        .await?;

        let Some(target) = target else {
            return Ok(ReferenceTagCheck::NotRequired);
        };
        let ref_schema: String = target.try_get("ref_schema")?;
        let ref_table: String = target.try_get("ref_table")?;
        let ref_column: String = target.try_get("ref_column")?;

        let sql = format!(
            "insert into {}.{} ({}) values ($1) on conflict do nothing",
            quote_ident(&ref_schema),
            quote_ident(&ref_table),
            quote_ident(&ref_column)
        );
        let result = sqlx::query(&sql).bind(tag_name).execute(&self.pool).await?;
        let table = format!("{}.{}", ref_schema, ref_table);
        if result.rows_affected() > 0 {
            Ok(ReferenceTagCheck::Created { table })
        } else {
            Ok(ReferenceTagCheck::AlreadyPresent { table })
        }
    }

    async fn update_legacy(&self, row: &LegacyRow) -> Result<u64, StorageError> {
        let sql = format!(
            "update {} set value = $1, source = $2 \
             where tag_name = $3 and date = $4 and period = $5 \
               and hour_num is not distinct from $6 and shift_num is not distinct from $7",
            self.qualified_table()
        );
        let result = sqlx::query(&sql)
            .bind(row.value)
            .bind(&row.source)
            .bind(&row.tag_name)
            .bind(row.date)
            .bind(row.period.as_legacy_period())
            .bind(row.hour_num)
            .bind(row.shift_num)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn insert_legacy(&self, row: &LegacyRow) -> Result<(), StorageError> {
        let sql = format!(
            "insert into {} (tag_name, date, period, hour_num, shift_num, value, source) \
             values ($1, $2, $3, $4, $5, $6, $7)",
            self.qualified_table()
        );
        sqlx::query(&sql)
            .bind(&row.tag_name)
            .bind(row.date)
            .bind(row.period.as_legacy_period())
            .bind(row.hour_num)
            .bind(row.shift_num)
            .bind(row.value)
            .bind(&row.source)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::quote_ident;

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_ident("tag_data"), "\"tag_data\"");
        assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
    }
}
