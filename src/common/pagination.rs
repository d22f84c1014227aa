// src/common/pagination.rs

use serde::{Deserialize, Serialize};

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

// Parâmetros crus vindos da query string.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationQuery {
    /// Normaliza page/limit: página mínima 1, limite entre 1 e 100
    /// (padrão 20). Página fora do alcance devolve página vazia, nunca erro.
    pub fn sanitize(self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        (page, limit)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        // Limite mínimo 1, mesmo quando o chamador pula o `sanitize`.
        let limit = limit.max(1);
        let total_pages = if total == 0 { 0 } else { (total + limit - 1) / limit };
        Self { page, limit, total, total_pages }
    }
}

// Envelope de listagem: { "data": [...], "pagination": {...} }
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, page: i64, limit: i64, total: i64) -> Self {
        Self { data, pagination: PaginationMeta::new(page, limit, total) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padrao_e_limites() {
        assert_eq!(PaginationQuery::default().sanitize(), (1, 20));
        assert_eq!(
            PaginationQuery { page: Some(0), limit: Some(0) }.sanitize(),
            (1, 1)
        );
        assert_eq!(
            PaginationQuery { page: Some(-3), limit: Some(500) }.sanitize(),
            (1, 100)
        );
        assert_eq!(
            PaginationQuery { page: Some(3), limit: Some(20) }.sanitize(),
            (3, 20)
        );
    }

    #[test]
    fn total_de_paginas() {
        assert_eq!(PaginationMeta::new(1, 20, 0).total_pages, 0);
        // 10 resultados com limite 20 cabem em uma página, mesmo que a
        // página pedida esteja além do alcance.
        assert_eq!(PaginationMeta::new(3, 20, 10).total_pages, 1);
        assert_eq!(PaginationMeta::new(1, 20, 20).total_pages, 1);
        assert_eq!(PaginationMeta::new(1, 20, 21).total_pages, 2);
        assert_eq!(PaginationMeta::new(1, 20, 41).total_pages, 3);
    }

    #[test]
    fn limite_nao_positivo_e_corrigido() {
        let meta = PaginationMeta::new(1, 0, 10);
        assert_eq!(meta.limit, 1);
        assert_eq!(meta.total_pages, 10);

        let meta = PaginationMeta::new(1, -5, 10);
        assert_eq!(meta.limit, 1);
        assert_eq!(meta.total_pages, 10);
    }
}
