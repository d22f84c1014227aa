// tests/movements.rs
//
// Movimentações de estoque ponta a ponta: atualização de saldo, transferência
// atômica, guarda de saldo insuficiente e comportamento sob concorrência.

mod common;

use common::{movement, setup};
use estoque_api::{
    common::error::AppError,
    models::inventory::{StockMovementFilters, StockMovementType},
};
use uuid::Uuid;

#[tokio::test]
async fn entrada_e_saida_atualizam_o_saldo() {
    let Some(ctx) = setup().await else { return };
    let wh = ctx.warehouse_a.id;

    ctx.state
        .movement_service
        .apply(movement(ctx.product.id, StockMovementType::In, 10, None, Some(wh), ctx.user.id))
        .await
        .expect("IN deveria ser aceito");
    assert_eq!(ctx.balance(wh).await, 10);

    ctx.state
        .movement_service
        .apply(movement(ctx.product.id, StockMovementType::Out, 4, Some(wh), None, ctx.user.id))
        .await
        .expect("OUT dentro do saldo deveria ser aceito");
    assert_eq!(ctx.balance(wh).await, 6);

    // Saída maior que o saldo: rejeitada e nada muda.
    let err = ctx
        .state
        .movement_service
        .apply(movement(ctx.product.id, StockMovementType::Out, 7, Some(wh), None, ctx.user.id))
        .await
        .expect_err("OUT acima do saldo deveria falhar");
    assert!(matches!(
        err,
        AppError::InsufficientStock { available: 6, requested: 7 }
    ));
    assert_eq!(ctx.balance(wh).await, 6);
}

#[tokio::test]
async fn transferencia_move_o_saldo_em_um_unico_registro() {
    let Some(ctx) = setup().await else { return };
    let (origem, destino) = (ctx.warehouse_a.id, ctx.warehouse_b.id);

    ctx.state
        .movement_service
        .apply(movement(ctx.product.id, StockMovementType::In, 8, None, Some(origem), ctx.user.id))
        .await
        .expect("IN deveria ser aceito");

    ctx.state
        .movement_service
        .apply(movement(
            ctx.product.id,
            StockMovementType::Transfer,
            5,
            Some(origem),
            Some(destino),
            ctx.user.id,
        ))
        .await
        .expect("TRANSFER dentro do saldo deveria ser aceito");

    assert_eq!(ctx.balance(origem).await, 3);
    assert_eq!(ctx.balance(destino).await, 5);

    // O livro-razão registra a transferência como uma única linha.
    let filters = StockMovementFilters {
        product_id: Some(ctx.product.id),
        ..Default::default()
    };
    let page = ctx
        .state
        .movement_service
        .list_movements(&filters, 1, 20)
        .await
        .expect("Listagem deveria funcionar");
    assert_eq!(page.pagination.total, 2);
    assert_eq!(
        page.data
            .iter()
            .filter(|m| m.movement_type == StockMovementType::Transfer)
            .count(),
        1
    );
}

#[tokio::test]
async fn a_soma_do_livro_reproduz_o_saldo() {
    let Some(ctx) = setup().await else { return };
    let wh = ctx.warehouse_a.id;
    let svc = &ctx.state.movement_service;

    for (t, qty) in [
        (StockMovementType::In, 12),
        (StockMovementType::Out, 3),
        (StockMovementType::In, 7),
        (StockMovementType::Out, 5),
    ] {
        let (from, to) = match t {
            StockMovementType::In => (None, Some(wh)),
            _ => (Some(wh), None),
        };
        svc.apply(movement(ctx.product.id, t, qty, from, to, ctx.user.id))
            .await
            .expect("Movimentação deveria ser aceita");
    }

    let filters = StockMovementFilters {
        product_id: Some(ctx.product.id),
        warehouse_id: Some(wh),
        ..Default::default()
    };
    let page = svc
        .list_movements(&filters, 1, 100)
        .await
        .expect("Listagem deveria funcionar");

    let soma: i64 = page
        .data
        .iter()
        .map(|m| match m.movement_type {
            StockMovementType::In => m.quantity,
            StockMovementType::Out => -m.quantity,
            _ => panic!("tipo inesperado neste cenário"),
        })
        .sum();
    assert_eq!(soma, 11);
    assert_eq!(ctx.balance(wh).await, soma);
}

#[tokio::test]
async fn saidas_concorrentes_nunca_deixam_o_saldo_negativo() {
    let Some(ctx) = setup().await else { return };
    let wh = ctx.warehouse_a.id;

    ctx.state
        .movement_service
        .apply(movement(ctx.product.id, StockMovementType::In, 5, None, Some(wh), ctx.user.id))
        .await
        .expect("IN deveria ser aceito");

    // Cinco saídas de 2 disputando um saldo de 5: só duas cabem.
    let mut handles = Vec::new();
    for _ in 0..5 {
        let svc = ctx.state.movement_service.clone();
        let req = movement(ctx.product.id, StockMovementType::Out, 2, Some(wh), None, ctx.user.id);
        handles.push(tokio::spawn(async move { svc.apply(req).await }));
    }

    let mut sucessos = 0;
    for handle in handles {
        match handle.await.expect("task não deveria entrar em pânico") {
            Ok(_) => sucessos += 1,
            Err(AppError::InsufficientStock { .. }) | Err(AppError::Transient) => {}
            Err(other) => panic!("erro inesperado: {other}"),
        }
    }

    assert_eq!(sucessos, 2);
    assert_eq!(ctx.balance(wh).await, 1);
}

#[tokio::test]
async fn transferencias_em_sentidos_opostos_nao_travam() {
    let Some(ctx) = setup().await else { return };
    let (a, b) = (ctx.warehouse_a.id, ctx.warehouse_b.id);

    for wh in [a, b] {
        ctx.state
            .movement_service
            .apply(movement(ctx.product.id, StockMovementType::In, 10, None, Some(wh), ctx.user.id))
            .await
            .expect("IN deveria ser aceito");
    }

    // A->B e B->A ao mesmo tempo, várias vezes. Com a ordem de lock
    // determinística, nenhuma delas termina em deadlock.
    let ida = {
        let svc = ctx.state.movement_service.clone();
        let req = movement(ctx.product.id, StockMovementType::Transfer, 1, Some(a), Some(b), ctx.user.id);
        tokio::spawn(async move {
            for _ in 0..10 {
                svc.apply(req.clone()).await?;
            }
            Ok::<_, AppError>(())
        })
    };
    let volta = {
        let svc = ctx.state.movement_service.clone();
        let req = movement(ctx.product.id, StockMovementType::Transfer, 1, Some(b), Some(a), ctx.user.id);
        tokio::spawn(async move {
            for _ in 0..10 {
                svc.apply(req.clone()).await?;
            }
            Ok::<_, AppError>(())
        })
    };

    ida.await
        .expect("task não deveria entrar em pânico")
        .expect("transferências A->B deveriam ser aceitas");
    volta
        .await
        .expect("task não deveria entrar em pânico")
        .expect("transferências B->A deveriam ser aceitas");

    assert_eq!(ctx.balance(a).await, 10);
    assert_eq!(ctx.balance(b).await, 10);
}

#[tokio::test]
async fn quantidade_nao_positiva_e_rejeitada_antes_da_transacao() {
    let Some(ctx) = setup().await else { return };
    let wh = ctx.warehouse_a.id;

    for quantity in [0, -3] {
        let err = ctx
            .state
            .movement_service
            .apply(movement(ctx.product.id, StockMovementType::In, quantity, None, Some(wh), ctx.user.id))
            .await
            .expect_err("quantidade não positiva deveria falhar");
        assert!(matches!(err, AppError::InvalidMovementType(_)));
    }

    // Nada chegou ao livro-razão.
    let filters = StockMovementFilters {
        product_id: Some(ctx.product.id),
        ..Default::default()
    };
    let page = ctx
        .state
        .movement_service
        .list_movements(&filters, 1, 20)
        .await
        .expect("Listagem deveria funcionar");
    assert_eq!(page.pagination.total, 0);
}

#[tokio::test]
async fn rota_invalida_e_rejeitada_antes_de_tocar_o_saldo() {
    let Some(ctx) = setup().await else { return };

    // IN não aceita armazém de origem.
    let err = ctx
        .state
        .movement_service
        .apply(movement(
            ctx.product.id,
            StockMovementType::In,
            1,
            Some(ctx.warehouse_a.id),
            Some(ctx.warehouse_b.id),
            ctx.user.id,
        ))
        .await
        .expect_err("rota inválida deveria falhar");
    assert!(matches!(err, AppError::InvalidMovementType(_)));

    // TRANSFER com origem e destino iguais.
    let err = ctx
        .state
        .movement_service
        .apply(movement(
            ctx.product.id,
            StockMovementType::Transfer,
            1,
            Some(ctx.warehouse_a.id),
            Some(ctx.warehouse_a.id),
            ctx.user.id,
        ))
        .await
        .expect_err("TRANSFER para o mesmo armazém deveria falhar");
    assert!(matches!(err, AppError::InvalidMovementType(_)));
}

#[tokio::test]
async fn referencias_desconhecidas_sao_rejeitadas() {
    let Some(ctx) = setup().await else { return };

    let err = ctx
        .state
        .movement_service
        .apply(movement(
            Uuid::new_v4(),
            StockMovementType::In,
            1,
            None,
            Some(ctx.warehouse_a.id),
            ctx.user.id,
        ))
        .await
        .expect_err("produto inexistente deveria falhar");
    assert!(matches!(err, AppError::ProductNotFound));

    let err = ctx
        .state
        .movement_service
        .apply(movement(
            ctx.product.id,
            StockMovementType::In,
            1,
            None,
            Some(Uuid::new_v4()),
            ctx.user.id,
        ))
        .await
        .expect_err("armazém inexistente deveria falhar");
    assert!(matches!(err, AppError::WarehouseNotFound));
}

#[tokio::test]
async fn pagina_alem_do_total_volta_vazia_com_meta_consistente() {
    let Some(ctx) = setup().await else { return };
    let wh = ctx.warehouse_a.id;

    for _ in 0..3 {
        ctx.state
            .movement_service
            .apply(movement(ctx.product.id, StockMovementType::In, 1, None, Some(wh), ctx.user.id))
            .await
            .expect("IN deveria ser aceito");
    }

    let filters = StockMovementFilters {
        product_id: Some(ctx.product.id),
        ..Default::default()
    };
    let page = ctx
        .state
        .movement_service
        .list_movements(&filters, 5, 2)
        .await
        .expect("Listagem deveria funcionar");

    assert!(page.data.is_empty());
    assert_eq!(page.pagination.total, 3);
    assert_eq!(page.pagination.total_pages, 2);
    assert_eq!(page.pagination.page, 5);
}
