mod common;

use std::sync::Arc;

use common::*;
use spincity_core::{
    storefront::{CollectionSource, HomeLoader, HomeView, SectionKind},
    ErrorCode,
};
use spincity_impls::HttpCollectionSource;
use spincity_market::Database;
use tokio::net::TcpListener;
use url::Url;

/// Serves the app on a random local port, returning its address
async fn serve(app: axum::Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move { axum::serve(listener, app).await });

    Url::parse(&format!("http://{addr}")).unwrap()
}

#[tokio::test]
async fn test_remote_source_reads_error_bodies() {
    let (app, database) = test_app();
    let source = HttpCollectionSource::new(serve(app).await);

    let error = source.fetch_collection("nope").await.unwrap_err();
    assert_eq!(error.code, ErrorCode::NotFound);
    assert_eq!(error.message, "Collection with ID nope not found");
    assert_eq!(error.http_status, Some(404));

    database.set_offline(true);
    let error = source.fetch_collection("nope").await.unwrap_err();
    assert_eq!(error.code, ErrorCode::InternalServerError);
    assert_eq!(error.http_status, Some(500));
}

#[tokio::test]
async fn test_home_page_over_http() {
    let (app, database) = test_app();
    insert_collection(&database, RECENTLY_ADDED, "Recently Added");

    let album = insert_album(&database, "Tago Mago").await;
    insert_listing(&database, "available", &album.id, None);
    insert_listing(&database, "sold", &album.id, Some("order_1"));
    database
        .add_album_to_collection(RECENTLY_ADDED, &album.id)
        .await
        .unwrap();

    let source = Arc::new(HttpCollectionSource::new(serve(app).await));
    let state = HomeLoader::new(source, storefront_config()).load().await;
    let view = state.view();

    let recent = view.section(SectionKind::RecentlyAdded).unwrap();
    assert_eq!(recent.collection.albums.len(), 1);
    assert_eq!(recent.collection.albums[0].listings.len(), 1);

    let new_releases = view.section(SectionKind::NewReleases).unwrap();
    assert!(new_releases.collection.albums.is_empty());
}

#[tokio::test]
async fn test_home_page_over_http_reports_outage() {
    let (app, database) = test_app();
    database.set_offline(true);

    let source = Arc::new(HttpCollectionSource::new(serve(app).await));
    let view = HomeLoader::new(source, storefront_config()).load().await.view();

    assert_eq!(
        view,
        HomeView::Error {
            message: "Failed to fetch collection".to_string(),
            status_code: 500,
        }
    );
}
