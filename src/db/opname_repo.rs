// src/db/opname_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::opname::{
        NewStockOpnameItem, StockOpname, StockOpnameFilters, StockOpnameItem, StockOpnameStatus,
    },
};

// Repositório dos stock opnames (cabeçalho + itens). A lógica de ciclo de
// vida fica no OpnameService; aqui só persistência.
#[derive(Clone)]
pub struct OpnameRepository {
    pool: PgPool,
}

impl OpnameRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        warehouse_id: Uuid,
        count_date: DateTime<Utc>,
        reference_number: &str,
        notes: Option<&str>,
        created_by: Uuid,
    ) -> Result<StockOpname, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let opname = sqlx::query_as::<_, StockOpname>(
            r#"
            INSERT INTO stock_opnames
                (warehouse_id, count_date, reference_number, notes, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(warehouse_id)
        .bind(count_date)
        .bind(reference_number)
        .bind(notes)
        .bind(created_by)
        .fetch_one(executor)
        .await?;
        Ok(opname)
    }

    /// Insere uma linha contada. 'system_quantity' já vem fotografada pelo
    /// serviço (dentro da mesma transação do cabeçalho) e 'difference' é
    /// sempre physical - system.
    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        stock_opname_id: Uuid,
        item: &NewStockOpnameItem,
        system_quantity: i64,
    ) -> Result<StockOpnameItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, StockOpnameItem>(
            r#"
            INSERT INTO stock_opname_items
                (stock_opname_id, product_id, system_quantity, physical_quantity,
                 difference, notes, batch_number, expiry_date)
            VALUES ($1, $2, $3, $4, $4 - $3, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(stock_opname_id)
        .bind(item.product_id)
        .bind(system_quantity)
        .bind(item.physical_quantity)
        .bind(item.notes.as_deref())
        .bind(item.batch_number.as_deref())
        .bind(item.expiry_date)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<StockOpname>, AppError> {
        let opname =
            sqlx::query_as::<_, StockOpname>("SELECT * FROM stock_opnames WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(opname)
    }

    /// Trava o cabeçalho: a checagem de status e a transição acontecem na
    /// mesma transação, então dois `process` concorrentes não passam ambos.
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<StockOpname>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let opname = sqlx::query_as::<_, StockOpname>(
            "SELECT * FROM stock_opnames WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(opname)
    }

    pub async fn items_of<'e, E>(
        &self,
        executor: E,
        stock_opname_id: Uuid,
    ) -> Result<Vec<StockOpnameItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, StockOpnameItem>(
            "SELECT * FROM stock_opname_items WHERE stock_opname_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(stock_opname_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    /// Atualiza o status carimbando os campos de auditoria do status de
    /// destino (completed_*/cancelled_*/adjusted_*) numa única query.
    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        new_status: StockOpnameStatus,
        actor: Uuid,
    ) -> Result<StockOpname, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let opname = sqlx::query_as::<_, StockOpname>(
            r#"
            UPDATE stock_opnames SET
                status = $2,
                updated_by = $3,
                updated_at = NOW(),
                completed_by = CASE WHEN $2 = 'COMPLETED'::stock_opname_status THEN $3 ELSE completed_by END,
                completed_at = CASE WHEN $2 = 'COMPLETED'::stock_opname_status THEN NOW() ELSE completed_at END,
                cancelled_by = CASE WHEN $2 = 'CANCELLED'::stock_opname_status THEN $3 ELSE cancelled_by END,
                cancelled_at = CASE WHEN $2 = 'CANCELLED'::stock_opname_status THEN NOW() ELSE cancelled_at END,
                adjusted_by  = CASE WHEN $2 = 'ADJUSTED'::stock_opname_status  THEN $3 ELSE adjusted_by END,
                adjusted_at  = CASE WHEN $2 = 'ADJUSTED'::stock_opname_status  THEN NOW() ELSE adjusted_at END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(new_status)
        .bind(actor)
        .fetch_one(executor)
        .await?;
        Ok(opname)
    }

    /// Carimba a auditoria de ajuste nos itens (chamada junto da transição
    /// para ADJUSTED, na mesma transação).
    pub async fn mark_items_adjusted<'e, E>(
        &self,
        executor: E,
        stock_opname_id: Uuid,
        actor: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE stock_opname_items SET
                adjusted_by = $2,
                adjusted_at = NOW(),
                updated_at = NOW()
            WHERE stock_opname_id = $1 AND difference <> 0
            "#,
        )
        .bind(stock_opname_id)
        .bind(actor)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn list(
        &self,
        filters: &StockOpnameFilters,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<StockOpname>, i64), AppError> {
        const WHERE_CLAUSE: &str = r#"
            ($1::uuid IS NULL OR warehouse_id = $1)
            AND ($2::stock_opname_status IS NULL OR status = $2)
            AND ($3::timestamptz IS NULL OR count_date >= $3)
            AND ($4::timestamptz IS NULL OR count_date <= $4)
        "#;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM stock_opnames WHERE {WHERE_CLAUSE}"
        ))
        .bind(filters.warehouse_id)
        .bind(filters.status)
        .bind(filters.start_date)
        .bind(filters.end_date)
        .fetch_one(&self.pool)
        .await?;

        let opnames = sqlx::query_as::<_, StockOpname>(&format!(
            r#"
            SELECT * FROM stock_opnames
            WHERE {WHERE_CLAUSE}
            ORDER BY count_date DESC, id DESC
            LIMIT $5 OFFSET $6
            "#
        ))
        .bind(filters.warehouse_id)
        .bind(filters.status)
        .bind(filters.start_date)
        .bind(filters.end_date)
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok((opnames, total))
    }
}
