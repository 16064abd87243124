//! Listing lifecycle integration tests: allocation, browsing, removal,
//! and the seller partition, all against a real migrated database.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use tradepost_core::{Email, ListingId, Price};
use tradepost_integration_tests::TestContext;
use tradepost_storefront::models::NewListing;
use tradepost_storefront::services::listings::ListingError;
use tradepost_storefront::services::{CatalogService, ListingService};

fn seller() -> Email {
    Email::parse("s@x.com").unwrap()
}

fn book_listing() -> NewListing {
    NewListing {
        category: "Books".to_string(),
        title: "T".to_string(),
        name: "N".to_string(),
        description: "D".to_string(),
        price: Price::parse("9.99").unwrap(),
        quantity: 3,
    }
}

#[tokio::test]
async fn test_create_assigns_id_in_range() {
    let ctx = TestContext::new().await;
    ctx.seed_categories().await;

    let listings = ListingService::new(&ctx.pool);
    let id = listings.create_listing(&seller(), &book_listing()).await.unwrap();

    assert!(id.in_range(), "allocated ID {id} outside the ID space");
}

#[tokio::test]
async fn test_created_listing_appears_in_store() {
    let ctx = TestContext::new().await;
    ctx.seed_categories().await;

    let listings = ListingService::new(&ctx.pool);
    let id = listings.create_listing(&seller(), &book_listing()).await.unwrap();

    let catalog = CatalogService::new(&ctx.pool);

    // Visible both at the top level and under its own category
    let root = catalog.active_listings("Root").await.unwrap();
    assert!(root.iter().any(|l| l.id == id));

    let books = catalog.active_listings("Books").await.unwrap();
    assert!(books.iter().any(|l| l.id == id));

    // Not under a sibling category
    let electronics = catalog.active_listings("Electronics").await.unwrap();
    assert!(electronics.iter().all(|l| l.id != id));
}

#[tokio::test]
async fn test_allocated_ids_are_unique() {
    let ctx = TestContext::new().await;
    ctx.seed_categories().await;

    let listings = ListingService::new(&ctx.pool);
    let mut seen = HashSet::new();

    for _ in 0..200 {
        let id = listings.create_listing(&seller(), &book_listing()).await.unwrap();
        assert!(seen.insert(id), "ID {id} allocated twice");
    }
}

#[tokio::test]
async fn test_create_rejects_unknown_category() {
    let ctx = TestContext::new().await;
    ctx.seed_categories().await;

    let listings = ListingService::new(&ctx.pool);
    let listing = NewListing {
        category: "Vehicles".to_string(),
        ..book_listing()
    };

    let err = listings.create_listing(&seller(), &listing).await.unwrap_err();
    assert!(matches!(err, ListingError::InvalidCategory(name) if name == "Vehicles"));
}

#[tokio::test]
async fn test_create_rejects_nonpositive_quantity() {
    let ctx = TestContext::new().await;
    ctx.seed_categories().await;

    let listings = ListingService::new(&ctx.pool);
    let listing = NewListing {
        quantity: 0,
        ..book_listing()
    };

    let err = listings.create_listing(&seller(), &listing).await.unwrap_err();
    assert!(matches!(err, ListingError::InvalidInput(_)));
}

#[tokio::test]
async fn test_create_fails_when_id_space_is_full() {
    let ctx = TestContext::new().await;
    ctx.seed_categories().await;

    // Occupy every slot directly; removed rows hold their IDs too, so
    // state doesn't matter for exhaustion
    for id in ListingId::MIN..=ListingId::MAX {
        sqlx::query(
            "INSERT INTO product_listings
               (list_id, seller_email, category, title, name, description,
                price, quantity, started_at, removed_at)
             VALUES (?1, 's@x.com', 'Books', 'T', 'N', 'D', '1.00', 1,
                     '2026-01-01T00:00:00Z', NULL)",
        )
        .bind(id)
        .execute(&ctx.pool)
        .await
        .unwrap();
    }

    let listings = ListingService::new(&ctx.pool);
    let err = listings.create_listing(&seller(), &book_listing()).await.unwrap_err();
    assert!(matches!(err, ListingError::IdSpaceExhausted));
}

#[tokio::test]
async fn test_removed_listing_disappears_from_store() {
    let ctx = TestContext::new().await;
    ctx.seed_categories().await;

    let listings = ListingService::new(&ctx.pool);
    let id = listings.create_listing(&seller(), &book_listing()).await.unwrap();

    listings.remove_listing(id).await.unwrap();

    let catalog = CatalogService::new(&ctx.pool);
    let root = catalog.active_listings("Root").await.unwrap();
    assert!(root.iter().all(|l| l.id != id));
    let books = catalog.active_listings("Books").await.unwrap();
    assert!(books.iter().all(|l| l.id != id));

    // The row survives with its removal stamp
    let listing = listings.get_listing(id).await.unwrap().unwrap();
    assert!(listing.removed_at.is_some());
}

#[tokio::test]
async fn test_remove_is_idempotent_and_preserves_timestamp() {
    let ctx = TestContext::new().await;
    ctx.seed_categories().await;

    let listings = ListingService::new(&ctx.pool);
    let id = listings.create_listing(&seller(), &book_listing()).await.unwrap();

    listings.remove_listing(id).await.unwrap();
    let first = listings.get_listing(id).await.unwrap().unwrap().removed_at;

    // Second removal succeeds and changes nothing
    listings.remove_listing(id).await.unwrap();
    let second = listings.get_listing(id).await.unwrap().unwrap().removed_at;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_remove_unknown_id_is_an_error() {
    let ctx = TestContext::new().await;
    ctx.seed_categories().await;

    let listings = ListingService::new(&ctx.pool);
    let err = listings.remove_listing(ListingId::new(42)).await.unwrap_err();
    assert!(matches!(err, ListingError::NotFound(_)));
}

#[tokio::test]
async fn test_partition_is_disjoint_and_exhaustive() {
    let ctx = TestContext::new().await;
    ctx.seed_categories().await;

    let listings = ListingService::new(&ctx.pool);
    let other = Email::parse("other@x.com").unwrap();

    let mut created = Vec::new();
    for _ in 0..5 {
        created.push(listings.create_listing(&seller(), &book_listing()).await.unwrap());
    }
    // Noise from another seller must not leak in
    listings.create_listing(&other, &book_listing()).await.unwrap();

    listings.remove_listing(created[1]).await.unwrap();
    listings.remove_listing(created[3]).await.unwrap();

    let partition = listings.partition_by_seller(&seller()).await.unwrap();

    let active: HashSet<_> = partition.active.iter().map(|l| l.id).collect();
    let removed: HashSet<_> = partition.removed.iter().map(|l| l.id).collect();

    assert!(active.is_disjoint(&removed));
    let all: HashSet<_> = active.union(&removed).copied().collect();
    assert_eq!(all, created.iter().copied().collect());

    assert!(partition.active.iter().all(|l| l.removed_at.is_none()));
    assert!(partition.removed.iter().all(|l| l.removed_at.is_some()));
}

#[tokio::test]
async fn test_seller_listing_scenario() {
    let ctx = TestContext::new().await;
    ctx.seed_categories().await;

    let listings = ListingService::new(&ctx.pool);
    let catalog = CatalogService::new(&ctx.pool);

    // A seller posts a book for sale
    let id = listings.create_listing(&seller(), &book_listing()).await.unwrap();
    assert!(id.in_range());

    let stored = listings.get_listing(id).await.unwrap().unwrap();
    assert_eq!(stored.title, "T");
    assert_eq!(stored.name, "N");
    assert_eq!(stored.description, "D");
    assert_eq!(stored.price, Price::parse("9.99").unwrap());
    assert_eq!(stored.quantity, 3);
    assert!(stored.status().is_active());

    // Shoppers see it; the seller sees it in the active bucket
    assert!(catalog.active_listings("Books").await.unwrap().iter().any(|l| l.id == id));
    let partition = listings.partition_by_seller(&seller()).await.unwrap();
    assert_eq!(partition.active.len(), 1);
    assert!(partition.removed.is_empty());

    // The seller takes it down
    listings.remove_listing(id).await.unwrap();

    assert!(catalog.active_listings("Books").await.unwrap().is_empty());
    let partition = listings.partition_by_seller(&seller()).await.unwrap();
    assert!(partition.active.is_empty());
    assert_eq!(partition.removed.len(), 1);
}

#[tokio::test]
async fn test_store_child_categories_one_level() {
    let ctx = TestContext::new().await;
    ctx.seed_categories().await;

    let catalog = CatalogService::new(&ctx.pool);

    let top: Vec<String> = catalog
        .child_categories("Root")
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(top, vec!["Books".to_string(), "Electronics".to_string()]);

    let under_books: Vec<String> = catalog
        .child_categories("Books")
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(under_books, vec!["Fiction".to_string()]);
}
