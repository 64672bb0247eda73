//! # Mock Framework
//!
//! Utilities for testing front-end code against a scripted catalog service.
//!
//! Use [`create_mock_client`] to get a client and a receiver, then the
//! `expect_*` helpers to assert what the client sent and to answer it.

use tokio::sync::mpsc;
use crate::catalog::EditSession;
use crate::catalog_service::messages::{CatalogRequest, ServiceResponse};
use crate::catalog_service::CatalogClient;
use crate::domain::{Product, ProductId, Rating};

/// Creates a client whose requests land on the returned receiver instead of
/// a running `CatalogService`.
pub fn create_mock_client(buffer_size: usize) -> (CatalogClient, mpsc::Receiver<CatalogRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (CatalogClient::new(sender), receiver)
}

/// Helper to verify that the next message is a ListProducts request
pub async fn expect_list_products(
    receiver: &mut mpsc::Receiver<CatalogRequest>,
) -> Option<ServiceResponse<Vec<Product>>> {
    match receiver.recv().await {
        Some(CatalogRequest::ListProducts { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is a GetEditSession request
pub async fn expect_edit_session(
    receiver: &mut mpsc::Receiver<CatalogRequest>,
) -> Option<ServiceResponse<EditSession>> {
    match receiver.recv().await {
        Some(CatalogRequest::GetEditSession { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is an AddProduct request
pub async fn expect_add_product(
    receiver: &mut mpsc::Receiver<CatalogRequest>,
) -> Option<(String, Rating, ServiceResponse<Product>)> {
    match receiver.recv().await {
        Some(CatalogRequest::AddProduct { name, rating, respond_to }) => Some((name, rating, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a SaveEdit request
pub async fn expect_save_edit(
    receiver: &mut mpsc::Receiver<CatalogRequest>,
) -> Option<(ProductId, String, Rating, ServiceResponse<Option<Product>>)> {
    match receiver.recv().await {
        Some(CatalogRequest::SaveEdit { id, name, rating, respond_to }) => Some((id, name, rating, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EditDraft;
    use crate::error::CatalogError;
    use crate::shell::{execute, ShellCommand};

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client(10);

        let add_task = tokio::spawn(async move {
            client.add_product("Test".to_string(), Rating::from("2")).await
        });

        let (name, rating, responder) = expect_add_product(&mut receiver).await.expect("Expected AddProduct request");
        assert_eq!(name, "Test");
        assert_eq!(rating, Rating::from("2"));
        let product = Product::new(ProductId(1), "Test", Rating::Number(2));
        responder.send(Ok(product.clone())).unwrap();

        assert_eq!(add_task.await.unwrap(), Ok(product));
    }

    #[tokio::test]
    async fn save_commits_the_session_drafts() {
        let (client, mut receiver) = create_mock_client(10);

        let save_task = tokio::spawn(async move {
            let mut out = Vec::new();
            execute(&client, ShellCommand::Save, &mut out).await.map(|_| ())
        });

        let responder = expect_edit_session(&mut receiver).await.expect("Expected session read");
        responder
            .send(Ok(EditSession::Editing(EditDraft {
                product_id: ProductId(7),
                name: "Renamed".to_string(),
                rating: Rating::from("3"),
            })))
            .unwrap();

        let (id, name, rating, responder) = expect_save_edit(&mut receiver).await.expect("Expected SaveEdit");
        assert_eq!(id, ProductId(7));
        assert_eq!(name, "Renamed");
        assert_eq!(rating, Rating::from("3"));
        responder.send(Ok(None)).unwrap();

        expect_list_products(&mut receiver).await.expect("Expected re-render").send(Ok(Vec::new())).unwrap();
        expect_edit_session(&mut receiver).await.expect("Expected session read").send(Ok(EditSession::Idle)).unwrap();

        assert!(save_task.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn closed_service_surfaces_as_communication_error() {
        let (client, receiver) = create_mock_client(1);
        drop(receiver);
        assert!(matches!(
            client.list_products().await,
            Err(CatalogError::ActorCommunicationError(_))
        ));
    }
}
