mod common;

use campusdesk_core::service::banner_service::BannerService;
use campusdesk_core::service::gallery_service::GalleryService;
use campusdesk_core::{
    DocumentQuery, DocumentStore, GalleryImage, RecordRepository, ResourceKind, ServiceError,
    SqliteDocumentStore,
};
use common::{image, pdf, FakeMedia, FlakyStore, MediaCall};
use std::sync::atomic::Ordering;

#[test]
fn banner_upload_goes_through_unsigned_path_and_lists_first() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let media = FakeMedia::default();
    let mut service = BannerService::new(&store, &media, "banners");

    let first = service.upload(&image("a.jpg")).unwrap();
    let second = service.upload(&image("b.jpg")).unwrap();

    assert_eq!(service.banners()[0].id, second.id);
    assert_eq!(service.banners()[1].id, first.id);
    assert_eq!(first.public_id, "banners/asset1");
    assert_eq!(
        media.calls()[0],
        MediaCall::UploadUnsigned {
            file_name: "a.jpg".to_string(),
            folder: Some("banners".to_string()),
        }
    );
    assert_eq!(store.query("banners", &DocumentQuery::new()).unwrap().len(), 2);
}

#[test]
fn banner_upload_rejects_non_images_without_calling_host() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let media = FakeMedia::default();
    let mut service = BannerService::new(&store, &media, "banners");

    let err = service.upload(&pdf("doc.pdf")).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
    assert!(media.calls().is_empty());
}

#[test]
fn banner_upload_failure_leaves_list_unchanged() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let media = FakeMedia::default();
    media.fail_uploads.store(true, Ordering::SeqCst);
    let mut service = BannerService::new(&store, &media, "banners");

    let err = service.upload(&image("a.jpg")).unwrap_err();
    assert!(matches!(err, ServiceError::Media(_)));
    assert!(service.banners().is_empty());
}

#[test]
fn banner_write_failure_destroys_fresh_asset() {
    let store = FlakyStore::new();
    store.fail_writes.store(true, Ordering::SeqCst);
    let media = FakeMedia::default();
    let mut service = BannerService::new(&store, &media, "banners");

    let err = service.upload(&image("a.jpg")).unwrap_err();
    assert!(matches!(err, ServiceError::Repo(_)));
    assert_eq!(media.destroyed(), vec!["banners/asset1".to_string()]);
    assert!(service.banners().is_empty());
}

#[test]
fn banner_delete_survives_destroy_failure() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let media = FakeMedia::default();
    let mut service = BannerService::new(&store, &media, "banners");
    let banner = service.upload(&image("a.jpg")).unwrap();

    media.fail_destroys.store(true, Ordering::SeqCst);
    service.delete(&banner.id).unwrap();

    assert!(service.banners().is_empty());
    assert!(store.get("banners", &banner.id).unwrap().is_none());
    assert_eq!(
        media.calls().last().unwrap(),
        &MediaCall::Destroy {
            public_id: "banners/asset1".to_string(),
            kind: ResourceKind::Image,
        }
    );
}

#[test]
fn banner_load_orders_newest_first() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let media = FakeMedia::default();
    let repo = RecordRepository::new(&store);
    for (url, at) in [("https://cdn/old.jpg", 1), ("https://cdn/new.jpg", 3), ("https://cdn/mid.jpg", 2)] {
        repo.add(&campusdesk_core::Banner::from_upload(url, "", at)).unwrap();
    }

    let mut service = BannerService::new(&store, &media, "banners");
    let urls: Vec<&str> = service
        .load()
        .unwrap()
        .iter()
        .map(|banner| banner.image_url.as_str())
        .collect();
    assert_eq!(urls, vec!["https://cdn/new.jpg", "https://cdn/mid.jpg", "https://cdn/old.jpg"]);
}

#[test]
fn banner_delete_of_unknown_id_is_reported() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let media = FakeMedia::default();
    let mut service = BannerService::new(&store, &media, "banners");

    let err = service.delete("missing").unwrap_err();
    assert!(matches!(err, ServiceError::UnknownRecord { kind: "banner", .. }));
    assert!(media.calls().is_empty());
}

#[test]
fn gallery_caption_update_and_delete() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let media = FakeMedia::default();
    let mut service = GalleryService::new(&store, &media, "gallery");

    let image = service.upload(&image("campus.png"), " Campus ").unwrap();
    assert_eq!(image.caption, "Campus");

    let updated = service.update_caption(&image.id, "Main gate").unwrap();
    assert_eq!(updated.caption, "Main gate");
    let stored = RecordRepository::new(&store)
        .get::<GalleryImage>(&image.id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.caption, "Main gate");

    service.delete(&image.id).unwrap();
    assert!(service.images().is_empty());
    assert_eq!(media.destroyed(), vec!["gallery/asset1".to_string()]);
}
