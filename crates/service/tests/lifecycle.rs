//! End-to-end exercises of the token upload flow.

mod common;

use common::{png_payload, setup_state, wait_for_artifact, TEST_ACCOUNT};
use service::ingest::IngestError;
use uuid::Uuid;

#[tokio::test]
async fn test_token_flow_publishes_and_serves() {
    let (state, _temp) = setup_state().await;

    let slot = state.request_upload_slot(TEST_ACCOUNT).await.unwrap();
    assert!(slot
        .upload_url
        .path()
        .ends_with(&slot.image_id.to_string()));

    // the slot starts as an invisible draft
    let record = state
        .database()
        .find_image(&slot.image_id)
        .await
        .unwrap()
        .unwrap();
    assert!(record.draft);
    assert_eq!(record.name, None);
    assert_eq!(record.account_id, TEST_ACCOUNT);
    assert!(matches!(
        state.fetch_published(TEST_ACCOUNT, &slot.image_id).await,
        Err(IngestError::NotFound)
    ));

    state
        .complete_upload(&slot.image_id, "cat.png", png_payload())
        .await
        .unwrap();

    let record = state
        .database()
        .find_image(&slot.image_id)
        .await
        .unwrap()
        .unwrap();
    assert!(!record.draft);
    assert_eq!(record.name.as_deref(), Some("cat"));

    wait_for_artifact(&state, "cat.webp").await;
    let served = state
        .fetch_published(TEST_ACCOUNT, &slot.image_id)
        .await
        .unwrap();
    assert!(!served.is_empty());

    // account scoping is a hard boundary
    state
        .database()
        .ensure_account("acct2", "otherhash")
        .await
        .unwrap();
    assert!(matches!(
        state.fetch_published("acct2", &slot.image_id).await,
        Err(IngestError::NotFound)
    ));
}

#[tokio::test]
async fn test_completion_is_exactly_once() {
    let (state, _temp) = setup_state().await;

    let slot = state.request_upload_slot(TEST_ACCOUNT).await.unwrap();
    state
        .complete_upload(&slot.image_id, "cat.png", png_payload())
        .await
        .unwrap();

    let err = state
        .complete_upload(&slot.image_id, "dog.png", png_payload())
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::NotFound));

    // the record still reflects the first completion
    let record = state
        .database()
        .find_image(&slot.image_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.name.as_deref(), Some("cat"));
    assert!(!record.draft);
}

#[tokio::test]
async fn test_completing_unknown_image_is_not_found() {
    let (state, _temp) = setup_state().await;

    let err = state
        .complete_upload(&Uuid::new_v4(), "cat.png", png_payload())
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::NotFound));
}

#[tokio::test]
async fn test_slot_requests_require_an_account() {
    let (state, _temp) = setup_state().await;

    let err = state.request_upload_slot("ghost").await.unwrap_err();
    assert!(matches!(err, IngestError::UnknownAccount));
}

#[tokio::test]
async fn test_traversal_names_reduce_to_basename() {
    let (state, _temp) = setup_state().await;

    let slot = state.request_upload_slot(TEST_ACCOUNT).await.unwrap();
    state
        .complete_upload(&slot.image_id, "../../escape.png", png_payload())
        .await
        .unwrap();

    let record = state
        .database()
        .find_image(&slot.image_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.name.as_deref(), Some("escape"));

    // both the original and the artifact land inside the storage root
    wait_for_artifact(&state, "escape.webp").await;
    assert!(state.blobs().read("escape.png").await.unwrap().is_some());
}

#[tokio::test]
async fn test_unusable_name_is_rejected_before_publication() {
    let (state, _temp) = setup_state().await;

    let slot = state.request_upload_slot(TEST_ACCOUNT).await.unwrap();
    let err = state
        .complete_upload(&slot.image_id, "..", png_payload())
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::InvalidFileName));

    // the slot survives and can still be completed
    let record = state
        .database()
        .find_image(&slot.image_id)
        .await
        .unwrap()
        .unwrap();
    assert!(record.draft);
}
