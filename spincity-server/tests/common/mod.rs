#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use spincity_core::{AlbumRecord, ListingRecord, QueryConfig, StorefrontConfig};
use spincity_market::{
    in_memory_market, CollectionData, Database, Identity, IdentityError, IdentityProvider,
    MemoryDatabase, NewAlbum, NewArtist, OnboardingLinks, PaymentAccount, PaymentError,
    PaymentProcessor,
};
use spincity_server::{router, ServerContext};
use tower::ServiceExt;

pub const TOKEN: &str = "sess_valid";
pub const RECENTLY_ADDED: &str = "recent";
pub const NEW_RELEASES: &str = "new";

pub struct FakePayments;

#[async_trait]
impl PaymentProcessor for FakePayments {
    async fn create_account(&self, _email: &str) -> Result<PaymentAccount, PaymentError> {
        Ok(PaymentAccount {
            id: "acct_1".to_string(),
        })
    }

    async fn create_onboarding_link(
        &self,
        account_id: &str,
        _links: &OnboardingLinks,
    ) -> Result<String, PaymentError> {
        Ok(format!("https://connect.example/setup/{account_id}"))
    }
}

/// Accepts a single session token
pub struct FakeIdentity;

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn identify(&self, token: &str) -> Result<Identity, IdentityError> {
        if token != TOKEN {
            return Err(IdentityError::InvalidSession);
        }

        Ok(Identity {
            user_id: "user_1".to_string(),
            email: Some("seller@example.com".to_string()),
        })
    }

    async fn attach_payment_account(
        &self,
        _user_id: &str,
        _account_id: &str,
    ) -> Result<(), IdentityError> {
        Ok(())
    }
}

/// Storefront configuration that doesn't wait between queries
pub fn storefront_config() -> StorefrontConfig {
    StorefrontConfig {
        recently_added_id: RECENTLY_ADDED.to_string(),
        new_releases_id: NEW_RELEASES.to_string(),
        query: QueryConfig {
            retry_count: 1,
            retry_delay: Duration::ZERO,
            stagger_delay: Duration::ZERO,
        },
    }
}

pub fn test_app() -> (Router, Arc<MemoryDatabase>) {
    let (database, market) = in_memory_market(Arc::new(FakePayments), Arc::new(FakeIdentity));
    let context = ServerContext::new(market, storefront_config());

    (router(context), database)
}

pub fn insert_collection(database: &MemoryDatabase, id: &str, name: &str) {
    database.insert_collection(CollectionData {
        id: id.to_string(),
        name: name.to_string(),
        user_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    });
}

pub async fn insert_album(database: &MemoryDatabase, name: &str) -> AlbumRecord {
    let artist = database
        .create_artist(NewArtist {
            name: "Can".to_string(),
            bio: "Krautrock from Cologne".to_string(),
            artwork: String::new(),
        })
        .await
        .unwrap();

    database
        .create_album(NewAlbum {
            name: name.to_string(),
            label: "United Artists".to_string(),
            artwork: String::new(),
            year: 1971,
            artist_id: artist.id,
        })
        .await
        .unwrap()
}

pub fn insert_listing(database: &MemoryDatabase, id: &str, album_id: &str, order_id: Option<&str>) {
    database.insert_listing(ListingRecord {
        id: id.to_string(),
        price: 2500,
        currency: "usd".to_string(),
        weight: 180,
        format: "LP".to_string(),
        condition: "VG+".to_string(),
        speed: "33".to_string(),
        description: String::new(),
        stripe_product: String::new(),
        stripe_price: String::new(),
        stripe_id: String::new(),
        album_id: album_id.to_string(),
        user_id: Some("user_1".to_string()),
        order_id: order_id.map(Into::into),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    });
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn authorized(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Sends a request and returns the status with the parsed JSON body
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, body)
}
