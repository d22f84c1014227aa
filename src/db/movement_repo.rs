// src/db/movement_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{NewStockMovement, StockMovement, StockMovementFilters},
};

// Repositório do livro-razão ('stock_movements'). Só INSERT e leituras:
// o livro é imutável, correções viram novas movimentações.
#[derive(Clone)]
pub struct MovementRepository {
    pool: PgPool,
}

impl MovementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registra uma movimentação no livro-razão, dentro da transação do
    /// chamador (a mesma que mutou os saldos).
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        movement: &NewStockMovement,
    ) -> Result<StockMovement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, StockMovement>(
            r#"
            INSERT INTO stock_movements
                (product_id, type, quantity, from_warehouse_id, to_warehouse_id,
                 reference_id, notes, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(movement.product_id)
        .bind(movement.movement_type)
        .bind(movement.quantity)
        .bind(movement.from_warehouse_id)
        .bind(movement.to_warehouse_id)
        .bind(movement.reference_id)
        .bind(movement.notes.as_deref())
        .bind(movement.created_by)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<StockMovement>, AppError> {
        let movement =
            sqlx::query_as::<_, StockMovement>("SELECT * FROM stock_movements WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(movement)
    }

    // Listagem filtrada e paginada. Os filtros opcionais usam o padrão
    // ($n IS NULL OR coluna = $n); 'warehouse_id' casa origem OU destino.
    pub async fn list(
        &self,
        filters: &StockMovementFilters,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<StockMovement>, i64), AppError> {
        const WHERE_CLAUSE: &str = r#"
            ($1::uuid IS NULL OR product_id = $1)
            AND ($2::uuid IS NULL OR from_warehouse_id = $2 OR to_warehouse_id = $2)
            AND ($3::stock_movement_type IS NULL OR type = $3)
            AND ($4::timestamptz IS NULL OR created_at >= $4)
            AND ($5::timestamptz IS NULL OR created_at <= $5)
        "#;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM stock_movements WHERE {WHERE_CLAUSE}"
        ))
        .bind(filters.product_id)
        .bind(filters.warehouse_id)
        .bind(filters.movement_type)
        .bind(filters.start_date)
        .bind(filters.end_date)
        .fetch_one(&self.pool)
        .await?;

        let movements = sqlx::query_as::<_, StockMovement>(&format!(
            r#"
            SELECT * FROM stock_movements
            WHERE {WHERE_CLAUSE}
            ORDER BY created_at DESC, id DESC
            LIMIT $6 OFFSET $7
            "#
        ))
        .bind(filters.product_id)
        .bind(filters.warehouse_id)
        .bind(filters.movement_type)
        .bind(filters.start_date)
        .bind(filters.end_date)
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok((movements, total))
    }

    /// Movimentações geradas por um stock opname (auditoria).
    pub async fn list_by_reference(
        &self,
        reference_id: Uuid,
    ) -> Result<Vec<StockMovement>, AppError> {
        let movements = sqlx::query_as::<_, StockMovement>(
            "SELECT * FROM stock_movements WHERE reference_id = $1 ORDER BY created_at ASC",
        )
        .bind(reference_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(movements)
    }
}
