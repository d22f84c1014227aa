// src/models/opname.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// --- Status do stock opname ---
// Máquina de estados: DRAFT -> IN_PROGRESS -> COMPLETED -> ADJUSTED,
// com cancelamento possível a partir de qualquer estado não-terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "stock_opname_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockOpnameStatus {
    Draft,
    InProgress,
    Completed,
    Cancelled,
    Adjusted,
}

impl StockOpnameStatus {
    /// Arestas permitidas do grafo de estados. Nada além delas.
    pub fn can_transition(self, to: StockOpnameStatus) -> bool {
        use StockOpnameStatus::*;
        matches!(
            (self, to),
            (Draft, InProgress)
                | (InProgress, Completed)
                | (Completed, Adjusted)
                | (Draft, Cancelled)
                | (InProgress, Cancelled)
                | (Completed, Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, StockOpnameStatus::Cancelled | StockOpnameStatus::Adjusted)
    }
}

impl std::fmt::Display for StockOpnameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StockOpnameStatus::Draft => "DRAFT",
            StockOpnameStatus::InProgress => "IN_PROGRESS",
            StockOpnameStatus::Completed => "COMPLETED",
            StockOpnameStatus::Cancelled => "CANCELLED",
            StockOpnameStatus::Adjusted => "ADJUSTED",
        };
        f.write_str(s)
    }
}

// --- Cabeçalho do stock opname ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockOpname {
    pub id: Uuid,
    pub warehouse_id: Uuid,
    pub status: StockOpnameStatus,
    pub count_date: DateTime<Utc>,
    pub reference_number: String,
    pub notes: Option<String>,
    pub adjustment_notes: Option<String>,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
    pub adjusted_by: Option<Uuid>,
    pub adjusted_at: Option<DateTime<Utc>>,
    pub cancelled_by: Option<Uuid>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub completed_by: Option<Uuid>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Item (linha contada) ---
// 'system_quantity' é a foto do saldo no momento da criação da linha e nunca
// muda depois; 'difference' é sempre physical - system.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockOpnameItem {
    pub id: Uuid,
    pub stock_opname_id: Uuid,
    pub product_id: Uuid,
    pub system_quantity: i64,
    pub physical_quantity: i64,
    pub difference: i64,
    pub notes: Option<String>,
    pub batch_number: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub adjusted_by: Option<Uuid>,
    pub adjusted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Cabeçalho + itens, como a API devolve.
#[derive(Debug, Clone, Serialize)]
pub struct StockOpnameWithItems {
    #[serde(flatten)]
    pub opname: StockOpname,
    pub items: Vec<StockOpnameItem>,
}

// Linha de entrada na criação: a quantidade de sistema NÃO vem do chamador,
// é fotografada do saldo dentro da transação de criação.
#[derive(Debug, Clone)]
pub struct NewStockOpnameItem {
    pub product_id: Uuid,
    pub physical_quantity: i64,
    pub notes: Option<String>,
    pub batch_number: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewStockOpname {
    pub warehouse_id: Uuid,
    pub count_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub items: Vec<NewStockOpnameItem>,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct StockOpnameFilters {
    pub warehouse_id: Option<Uuid>,
    pub status: Option<StockOpnameStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::StockOpnameStatus::*;

    #[test]
    fn caminho_feliz_do_ciclo_de_vida() {
        assert!(Draft.can_transition(InProgress));
        assert!(InProgress.can_transition(Completed));
        assert!(Completed.can_transition(Adjusted));
    }

    #[test]
    fn cancelamento_permitido_antes_de_terminal() {
        assert!(Draft.can_transition(Cancelled));
        assert!(InProgress.can_transition(Cancelled));
        assert!(Completed.can_transition(Cancelled));
        assert!(!Adjusted.can_transition(Cancelled));
        assert!(!Cancelled.can_transition(Cancelled));
    }

    #[test]
    fn sem_pular_etapas_nem_voltar() {
        assert!(!Draft.can_transition(Completed));
        assert!(!Draft.can_transition(Adjusted));
        assert!(!InProgress.can_transition(Adjusted));
        assert!(!Completed.can_transition(Draft));
        assert!(!InProgress.can_transition(Draft));
    }

    #[test]
    fn estados_terminais_nao_saem() {
        for destino in [Draft, InProgress, Completed, Cancelled, Adjusted] {
            assert!(!Cancelled.can_transition(destino));
            assert!(!Adjusted.can_transition(destino));
        }
        assert!(Cancelled.is_terminal());
        assert!(Adjusted.is_terminal());
        assert!(!Completed.is_terminal());
    }
}
