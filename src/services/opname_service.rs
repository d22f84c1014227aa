// src/services/opname_service.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

use sqlx::PgPool;

use crate::{
    common::{error::AppError, pagination::Paginated},
    db::{CatalogRepository, OpnameRepository, StockRepository},
    models::{
        inventory::{NewStockMovement, StockMovementType},
        opname::{
            NewStockOpname, StockOpname, StockOpnameFilters, StockOpnameStatus,
            StockOpnameWithItems,
        },
    },
    services::MovementService,
};

// Quantas vezes tentamos um número de referência novo antes de desistir.
const MAX_REFERENCE_ATTEMPTS: u32 = 3;

type ReferenceGenerator = Arc<dyn Fn(DateTime<Utc>) -> String + Send + Sync>;

// O motor de reconciliação (stock opname): cria a sessão de contagem
// fotografando os saldos, conduz o ciclo de vida e, no `process`, converte
// cada diferença confirmada em exatamente uma movimentação de ajuste.
#[derive(Clone)]
pub struct OpnameService {
    opname_repo: OpnameRepository,
    stock_repo: StockRepository,
    catalog_repo: CatalogRepository,
    movement_service: MovementService,
    pool: PgPool,
    reference_generator: ReferenceGenerator,
}

impl OpnameService {
    pub fn new(
        opname_repo: OpnameRepository,
        stock_repo: StockRepository,
        catalog_repo: CatalogRepository,
        movement_service: MovementService,
        pool: PgPool,
    ) -> Self {
        Self {
            opname_repo,
            stock_repo,
            catalog_repo,
            movement_service,
            pool,
            reference_generator: Arc::new(Self::generate_reference_number),
        }
    }

    /// Troca o gerador do número de referência pelo informado.
    pub fn with_reference_generator<F>(mut self, generator: F) -> Self
    where
        F: Fn(DateTime<Utc>) -> String + Send + Sync + 'static,
    {
        self.reference_generator = Arc::new(generator);
        self
    }

    /// Número de referência legível: "SO" + ano/mês (2 dígitos cada) +
    /// sufixo aleatório de 4 dígitos. Colisões são possíveis — quem chama
    /// trata a violação de unicidade e tenta de novo.
    fn generate_reference_number(count_date: DateTime<Utc>) -> String {
        let suffix: u32 = rand::thread_rng().gen_range(0..10_000);
        format!("SO{}{:04}", count_date.format("%y%m"), suffix)
    }

    /// Cria a sessão de contagem. A quantidade de sistema de cada linha é
    /// fotografada do saldo DENTRO da transação de criação e nunca mais
    /// recalculada.
    pub async fn create(&self, input: NewStockOpname) -> Result<StockOpnameWithItems, AppError> {
        let mut last_err = AppError::ReferenceNumberCollision;

        for _ in 0..MAX_REFERENCE_ATTEMPTS {
            let reference_number = (self.reference_generator)(input.count_date);

            let mut tx = self.pool.begin().await?;

            if !self.catalog_repo.warehouse_exists(&mut *tx, input.warehouse_id).await? {
                return Err(AppError::WarehouseNotFound);
            }
            for item in &input.items {
                if !self.catalog_repo.product_exists(&mut *tx, item.product_id).await? {
                    return Err(AppError::ProductNotFound);
                }
            }

            let header = match self
                .opname_repo
                .insert(
                    &mut *tx,
                    input.warehouse_id,
                    input.count_date,
                    &reference_number,
                    input.notes.as_deref(),
                    input.created_by,
                )
                .await
            {
                Ok(header) => header,
                // Colisão no número de referência: desfaz e tenta com um
                // sufixo novo.
                Err(AppError::DuplicateEntry(constraint))
                    if constraint.contains("reference_number") =>
                {
                    last_err = AppError::ReferenceNumberCollision;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let mut items = Vec::with_capacity(input.items.len());
            for item in &input.items {
                let system_quantity = self
                    .stock_repo
                    .get(&mut *tx, item.product_id, input.warehouse_id)
                    .await?
                    .map(|s| s.quantity)
                    .unwrap_or(0);

                let row = self
                    .opname_repo
                    .insert_item(&mut *tx, header.id, item, system_quantity)
                    .await?;
                items.push(row);
            }

            tx.commit().await?;

            tracing::info!(
                opname_id = %header.id,
                reference = %header.reference_number,
                "stock opname criado com {} itens",
                items.len(),
            );

            return Ok(StockOpnameWithItems { opname: header, items });
        }

        Err(last_err)
    }

    pub async fn get(&self, id: Uuid) -> Result<StockOpnameWithItems, AppError> {
        let opname = self
            .opname_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::OpnameNotFound)?;
        let items = self.opname_repo.items_of(&self.pool, id).await?;
        Ok(StockOpnameWithItems { opname, items })
    }

    pub async fn list(
        &self,
        filters: &StockOpnameFilters,
        page: i64,
        limit: i64,
    ) -> Result<Paginated<StockOpname>, AppError> {
        let (opnames, total) = self.opname_repo.list(filters, page, limit).await?;
        Ok(Paginated::new(opnames, page, limit, total))
    }

    /// Transição de status dirigida pelo operador. A leitura do status atual
    /// e a escrita acontecem sob FOR UPDATE, na mesma transação.
    pub async fn set_status(
        &self,
        id: Uuid,
        new_status: StockOpnameStatus,
        actor: Uuid,
    ) -> Result<StockOpname, AppError> {
        let mut tx = self.pool.begin().await?;

        let opname = self
            .opname_repo
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::OpnameNotFound)?;

        if !opname.status.can_transition(new_status) {
            return Err(AppError::InvalidState(format!(
                "Transição de {} para {} não é permitida.",
                opname.status, new_status
            )));
        }

        let updated = self.opname_repo.update_status(&mut *tx, id, new_status, actor).await?;
        tx.commit().await?;
        Ok(updated)
    }

    /// Converte as diferenças confirmadas em movimentações de ajuste —
    /// exatamente uma por linha com diferença != 0 — e leva a sessão para
    /// ADJUSTED, tudo em uma única transação. Só é legal a partir de
    /// COMPLETED; reprocessar uma sessão ADJUSTED falha, porque aplicaria
    /// as mesmas diferenças duas vezes.
    pub async fn process(&self, id: Uuid, actor: Uuid) -> Result<StockOpnameWithItems, AppError> {
        let mut tx = self.pool.begin().await?;

        // O FOR UPDATE garante que dois `process` concorrentes não enxerguem
        // ambos o status COMPLETED.
        let opname = self
            .opname_repo
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::OpnameNotFound)?;

        if opname.status != StockOpnameStatus::Completed {
            return Err(AppError::InvalidState(format!(
                "Só é possível processar um stock opname COMPLETED (status atual: {}).",
                opname.status
            )));
        }

        let items = self.opname_repo.items_of(&mut *tx, id).await?;

        let mut generated = 0usize;
        for item in &items {
            if item.difference == 0 {
                continue;
            }

            let (movement_type, from_warehouse_id, to_warehouse_id) = if item.difference > 0 {
                (StockMovementType::AdjustmentIn, None, Some(opname.warehouse_id))
            } else {
                (StockMovementType::AdjustmentOut, Some(opname.warehouse_id), None)
            };

            let movement = NewStockMovement {
                product_id: item.product_id,
                movement_type,
                quantity: item.difference.abs(),
                from_warehouse_id,
                to_warehouse_id,
                reference_id: Some(opname.id),
                notes: Some(format!(
                    "Ajuste do stock opname {}",
                    opname.reference_number
                )),
                created_by: Some(actor),
            };

            self.movement_service.apply_in_tx(&mut tx, &movement).await?;
            generated += 1;
        }

        self.opname_repo.mark_items_adjusted(&mut *tx, id, actor).await?;
        let updated = self
            .opname_repo
            .update_status(&mut *tx, id, StockOpnameStatus::Adjusted, actor)
            .await?;
        let items = self.opname_repo.items_of(&mut *tx, id).await?;

        tx.commit().await?;

        tracing::info!(
            opname_id = %updated.id,
            reference = %updated.reference_number,
            "stock opname processado: {generated} ajustes gerados",
        );

        Ok(StockOpnameWithItems { opname: updated, items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn numero_de_referencia_tem_prefixo_ano_mes_e_sufixo() {
        let date = Utc.with_ymd_and_hms(2026, 3, 15, 10, 0, 0).unwrap();
        let reference = OpnameService::generate_reference_number(date);

        assert_eq!(reference.len(), 10);
        assert!(reference.starts_with("SO2603"));
        assert!(reference[6..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn sufixo_fica_dentro_de_quatro_digitos() {
        let date = Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap();
        for _ in 0..256 {
            let reference = OpnameService::generate_reference_number(date);
            assert_eq!(reference.len(), 10, "referência gerada: {reference}");
            assert!(reference.starts_with("SO2512"));
        }
    }
}
