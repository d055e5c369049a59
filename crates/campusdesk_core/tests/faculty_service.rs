mod common;

use campusdesk_core::service::faculty_service::FacultyService;
use campusdesk_core::{
    Faculty, FacultyFilter, RecordRepository, ResourceKind, ServiceError, SqliteDocumentStore,
};
use common::{image, pdf, FakeMedia, FlakyStore, MediaCall};
use std::sync::atomic::Ordering;

fn draft(name: &str, department: &str) -> Faculty {
    Faculty {
        name: name.to_string(),
        email: format!("{}@college.edu", name.to_lowercase().replace(' ', ".")),
        department: department.to_string(),
        designation: "Assistant Professor".to_string(),
        ..Faculty::default()
    }
}

#[test]
fn create_assigns_client_id_and_keeps_list_sorted() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let media = FakeMedia::default();
    let mut service = FacultyService::new(&store, &media, "faculty");

    let zoe = service.create(draft("Zoe", "Physics"), None).unwrap();
    service.create(draft("adam", "Chemistry"), None).unwrap();

    assert_eq!(zoe.id.len(), 32);
    let names: Vec<&str> = service.members().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["adam", "Zoe"]);
    assert!(media.calls().is_empty());
}

#[test]
fn create_with_photo_uses_signed_image_upload() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let media = FakeMedia::default();
    let mut service = FacultyService::new(&store, &media, "faculty");

    let member = service
        .create(draft("Ann Lee", "Math"), Some(&image("ann.jpg")))
        .unwrap();
    assert!(member.image_url.contains("/image/upload/"));
    assert_eq!(
        media.calls(),
        vec![MediaCall::UploadSigned {
            file_name: "ann.jpg".to_string(),
            kind: ResourceKind::Image,
            folder: Some("faculty".to_string()),
        }]
    );
}

#[test]
fn create_validates_before_uploading() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let media = FakeMedia::default();
    let mut service = FacultyService::new(&store, &media, "faculty");

    let mut bad = draft("Ann", "Math");
    bad.email = "not-an-email".to_string();
    let err = service.create(bad, Some(&image("ann.jpg"))).unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let err = service
        .create(draft("Ann", "Math"), Some(&pdf("cv.pdf")))
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
    assert!(media.calls().is_empty());
    assert!(service.members().is_empty());
}

#[test]
fn create_write_failure_destroys_uploaded_photo() {
    let store = FlakyStore::new();
    store.fail_writes.store(true, Ordering::SeqCst);
    let media = FakeMedia::default();
    let mut service = FacultyService::new(&store, &media, "faculty");

    let err = service
        .create(draft("Ann", "Math"), Some(&image("ann.jpg")))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Repo(_)));
    assert_eq!(media.destroyed(), vec!["faculty/asset1".to_string()]);
    assert!(service.members().is_empty());
}

#[test]
fn update_with_new_photo_destroys_previous_first() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let media = FakeMedia::default();
    let mut service = FacultyService::new(&store, &media, "faculty");
    let member = service
        .create(draft("Ann", "Math"), Some(&image("old.jpg")))
        .unwrap();

    let mut edited = member.clone();
    edited.designation = "Professor".to_string();
    let updated = service.update(edited, Some(&image("new.jpg"))).unwrap();

    let calls = media.calls();
    assert_eq!(
        calls[1],
        MediaCall::Destroy {
            public_id: "faculty/asset1".to_string(),
            kind: ResourceKind::Image,
        }
    );
    assert!(matches!(calls[2], MediaCall::UploadSigned { .. }));
    assert!(updated.image_url.ends_with("faculty/asset2.jpg"));
    assert_eq!(service.members()[0].designation, "Professor");

    let stored = RecordRepository::new(&store)
        .get::<Faculty>(&member.id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.image_url, updated.image_url);
}

#[test]
fn update_write_failure_destroys_replacement_photo() {
    let store = FlakyStore::new();
    let media = FakeMedia::default();
    let mut service = FacultyService::new(&store, &media, "faculty");
    let member = service
        .create(draft("Ravi Kumar", "Physics"), Some(&image("old.jpg")))
        .unwrap();

    store.fail_writes.store(true, Ordering::SeqCst);
    let err = service
        .update(member.clone(), Some(&image("new.jpg")))
        .unwrap_err();

    assert!(matches!(err, ServiceError::Repo(_)));
    assert_eq!(
        media.destroyed(),
        vec!["faculty/asset1".to_string(), "faculty/asset2".to_string()]
    );
    assert_eq!(service.members()[0].image_url, member.image_url);
}

#[test]
fn update_of_unknown_member_fails() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let media = FakeMedia::default();
    let mut service = FacultyService::new(&store, &media, "faculty");

    let mut ghost = draft("Ghost", "Math");
    ghost.id = "nope".to_string();
    let err = service.update(ghost, None).unwrap_err();
    assert!(matches!(err, ServiceError::UnknownRecord { kind: "faculty", .. }));
}

#[test]
fn deactivated_members_drop_out_of_default_load() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let media = FakeMedia::default();
    let mut service = FacultyService::new(&store, &media, "faculty");
    let ann = service.create(draft("Ann", "Math"), None).unwrap();
    service.create(draft("Bob", "Physics"), None).unwrap();

    service.set_active(&ann.id, false).unwrap();

    assert_eq!(service.load(false).unwrap().len(), 1);
    assert_eq!(service.load(true).unwrap().len(), 2);
}

#[test]
fn filter_by_department_and_text() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let media = FakeMedia::default();
    let mut service = FacultyService::new(&store, &media, "faculty");
    service.create(draft("Ann", "Math"), None).unwrap();
    service.create(draft("Bob", "Physics"), None).unwrap();
    service.create(draft("Bea", "Physics"), None).unwrap();

    assert_eq!(service.departments(), vec!["Math", "Physics"]);

    let filter = FacultyFilter {
        department: Some("physics".to_string()),
        ..FacultyFilter::default()
    };
    assert_eq!(service.filtered(&filter).len(), 2);

    let filter = FacultyFilter {
        query: "BEA".to_string(),
        department: Some("All".to_string()),
        ..FacultyFilter::default()
    };
    let found = service.filtered(&filter);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Bea");
}

#[test]
fn delete_removes_record_and_photo() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let media = FakeMedia::default();
    let mut service = FacultyService::new(&store, &media, "faculty");
    let member = service
        .create(draft("Ann", "Math"), Some(&image("ann.jpg")))
        .unwrap();

    service.delete(&member.id).unwrap();
    assert!(service.members().is_empty());
    assert_eq!(media.destroyed(), vec!["faculty/asset1".to_string()]);
    assert!(RecordRepository::new(&store)
        .get::<Faculty>(&member.id)
        .unwrap()
        .is_none());
}
