// src/models/inventory.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::common::error::AppError;

// --- Saldo (um registro por par produto/armazém) ---
// Representa a tabela 'stocks'. É a fonte da verdade de "quanto tem aqui agora".
// Só o MovementService escreve nela.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub id: Uuid,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub quantity: i64,
    pub updated_at: DateTime<Utc>,
}

// Visões com join para as telas de consulta de saldo.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockByWarehouse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockByProduct {
    pub id: Uuid,
    pub warehouse_id: Uuid,
    pub warehouse_name: String,
    pub quantity: i64,
    pub updated_at: DateTime<Utc>,
}

// --- Tipos de movimentação ---
// ADJUSTMENT_IN e ADJUSTMENT_OUT são gerados internamente pelo processamento
// de um stock opname; os demais entram pela API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "stock_movement_type", rename_all = "SCREAMING_SNAKE_CASE")] // Banco
#[serde(rename_all = "SCREAMING_SNAKE_CASE")] // JSON
pub enum StockMovementType {
    In,
    Out,
    Transfer,
    Adjustment,
    AdjustmentIn,
    AdjustmentOut,
}

impl StockMovementType {
    /// Regras estruturais por tipo: quais campos de armazém cada tipo exige.
    /// Validadas antes de qualquer mutação de saldo.
    pub fn validate_route(
        &self,
        from_warehouse_id: Option<Uuid>,
        to_warehouse_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        match self {
            StockMovementType::In => {
                if to_warehouse_id.is_none() {
                    return Err(AppError::InvalidMovementType(
                        "IN exige 'toWarehouseId'.".into(),
                    ));
                }
                if from_warehouse_id.is_some() {
                    return Err(AppError::InvalidMovementType(
                        "IN não aceita 'fromWarehouseId'.".into(),
                    ));
                }
            }
            StockMovementType::Out => {
                if from_warehouse_id.is_none() {
                    return Err(AppError::InvalidMovementType(
                        "OUT exige 'fromWarehouseId'.".into(),
                    ));
                }
                if to_warehouse_id.is_some() {
                    return Err(AppError::InvalidMovementType(
                        "OUT não aceita 'toWarehouseId'.".into(),
                    ));
                }
            }
            StockMovementType::Transfer => {
                let (Some(from), Some(to)) = (from_warehouse_id, to_warehouse_id) else {
                    return Err(AppError::InvalidMovementType(
                        "TRANSFER exige 'fromWarehouseId' e 'toWarehouseId'.".into(),
                    ));
                };
                if from == to {
                    return Err(AppError::InvalidMovementType(
                        "TRANSFER exige armazéns de origem e destino distintos.".into(),
                    ));
                }
            }
            StockMovementType::Adjustment
            | StockMovementType::AdjustmentIn
            | StockMovementType::AdjustmentOut => {
                if from_warehouse_id.is_none() && to_warehouse_id.is_none() {
                    return Err(AppError::InvalidMovementType(
                        "Ajustes exigem ao menos um de 'fromWarehouseId'/'toWarehouseId'.".into(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Efeitos sobre os saldos: pares (armazém, delta assinado). A ordem de
    /// aplicação fica a cargo do chamador.
    pub fn balance_deltas(
        &self,
        from_warehouse_id: Option<Uuid>,
        to_warehouse_id: Option<Uuid>,
        quantity: i64,
    ) -> Vec<(Uuid, i64)> {
        let mut deltas = Vec::with_capacity(2);

        let debits_from = matches!(
            self,
            StockMovementType::Out
                | StockMovementType::Transfer
                | StockMovementType::Adjustment
                | StockMovementType::AdjustmentOut
        );
        let credits_to = matches!(
            self,
            StockMovementType::In
                | StockMovementType::Transfer
                | StockMovementType::Adjustment
                | StockMovementType::AdjustmentIn
        );

        if debits_from {
            if let Some(from) = from_warehouse_id {
                deltas.push((from, -quantity));
            }
        }
        if credits_to {
            if let Some(to) = to_warehouse_id {
                deltas.push((to, quantity));
            }
        }

        deltas
    }
}

// --- Movimentação (linha do livro-razão) ---
// Imutável depois de criada: correções viram novas movimentações.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: Uuid,
    pub product_id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub movement_type: StockMovementType,
    pub quantity: i64,
    pub from_warehouse_id: Option<Uuid>,
    pub to_warehouse_id: Option<Uuid>,
    // Aponta para o stock opname que gerou a movimentação, quando houver.
    pub reference_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// Pedido de movimentação, já com o autor resolvido pelo handler.
#[derive(Debug, Clone)]
pub struct NewStockMovement {
    pub product_id: Uuid,
    pub movement_type: StockMovementType,
    pub quantity: i64,
    pub from_warehouse_id: Option<Uuid>,
    pub to_warehouse_id: Option<Uuid>,
    pub reference_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
}

// Filtros da listagem do livro-razão. 'warehouse_id' casa tanto com a origem
// quanto com o destino.
#[derive(Debug, Clone, Default)]
pub struct StockMovementFilters {
    pub product_id: Option<Uuid>,
    pub warehouse_id: Option<Uuid>,
    pub movement_type: Option<StockMovementType>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wid(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    #[test]
    fn in_exige_destino_e_rejeita_origem() {
        let t = StockMovementType::In;
        assert!(t.validate_route(None, Some(wid(1))).is_ok());
        assert!(matches!(
            t.validate_route(None, None),
            Err(AppError::InvalidMovementType(_))
        ));
        assert!(matches!(
            t.validate_route(Some(wid(1)), Some(wid(2))),
            Err(AppError::InvalidMovementType(_))
        ));
    }

    #[test]
    fn out_exige_origem_e_rejeita_destino() {
        let t = StockMovementType::Out;
        assert!(t.validate_route(Some(wid(1)), None).is_ok());
        assert!(matches!(
            t.validate_route(None, None),
            Err(AppError::InvalidMovementType(_))
        ));
        assert!(matches!(
            t.validate_route(Some(wid(1)), Some(wid(2))),
            Err(AppError::InvalidMovementType(_))
        ));
    }

    #[test]
    fn transfer_exige_origem_e_destino_distintos() {
        let t = StockMovementType::Transfer;
        assert!(t.validate_route(Some(wid(1)), Some(wid(2))).is_ok());
        assert!(matches!(
            t.validate_route(Some(wid(1)), None),
            Err(AppError::InvalidMovementType(_))
        ));
        assert!(matches!(
            t.validate_route(Some(wid(1)), Some(wid(1))),
            Err(AppError::InvalidMovementType(_))
        ));
    }

    #[test]
    fn ajustes_exigem_ao_menos_um_armazem() {
        for t in [
            StockMovementType::Adjustment,
            StockMovementType::AdjustmentIn,
            StockMovementType::AdjustmentOut,
        ] {
            assert!(t.validate_route(Some(wid(1)), None).is_ok());
            assert!(t.validate_route(None, Some(wid(2))).is_ok());
            assert!(matches!(
                t.validate_route(None, None),
                Err(AppError::InvalidMovementType(_))
            ));
        }
    }

    #[test]
    fn deltas_de_transfer_debitam_origem_e_creditam_destino() {
        let deltas =
            StockMovementType::Transfer.balance_deltas(Some(wid(1)), Some(wid(2)), 5);
        assert_eq!(deltas, vec![(wid(1), -5), (wid(2), 5)]);
    }

    #[test]
    fn deltas_simples_por_tipo() {
        assert_eq!(
            StockMovementType::In.balance_deltas(None, Some(wid(2)), 10),
            vec![(wid(2), 10)]
        );
        assert_eq!(
            StockMovementType::Out.balance_deltas(Some(wid(1)), None, 4),
            vec![(wid(1), -4)]
        );
        assert_eq!(
            StockMovementType::AdjustmentIn.balance_deltas(None, Some(wid(2)), 2),
            vec![(wid(2), 2)]
        );
        assert_eq!(
            StockMovementType::AdjustmentOut.balance_deltas(Some(wid(1)), None, 3),
            vec![(wid(1), -3)]
        );
    }

    #[test]
    fn adjustment_aplica_nos_dois_lados_quando_presentes() {
        let deltas =
            StockMovementType::Adjustment.balance_deltas(Some(wid(1)), Some(wid(2)), 7);
        assert_eq!(deltas, vec![(wid(1), -7), (wid(2), 7)]);

        // Com um lado só, afeta apenas esse lado.
        assert_eq!(
            StockMovementType::Adjustment.balance_deltas(Some(wid(1)), None, 7),
            vec![(wid(1), -7)]
        );
    }
}
