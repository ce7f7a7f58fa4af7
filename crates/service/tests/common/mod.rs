//! Shared test fixture for ingestion integration tests
#![allow(dead_code)]

use std::io::Cursor;
use std::time::Duration;

use image::{ImageFormat, Rgba, RgbaImage};
use service::{Config, ServiceState};
use tempfile::TempDir;

pub const TEST_ACCOUNT: &str = "acct1";

/// State over an in-memory database and a tempdir blob store, with one
/// account registered.
pub async fn setup_state() -> (ServiceState, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        storage_path: Some(temp_dir.path().join("images")),
        ..Config::default()
    };

    let state = ServiceState::from_config(&config).await.unwrap();
    state
        .database()
        .ensure_account(TEST_ACCOUNT, "testhash")
        .await
        .unwrap();

    (state, temp_dir)
}

/// Tiny valid PNG payload.
pub fn png_payload() -> Vec<u8> {
    let img = RgbaImage::from_pixel(4, 4, Rgba([200, 30, 30, 255]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// Wait for the background worker to land the converted artifact.
pub async fn wait_for_artifact(state: &ServiceState, file_name: &str) -> Vec<u8> {
    for _ in 0..250 {
        if let Some(bytes) = state.blobs().read(file_name).await.unwrap() {
            return bytes;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("converted artifact {file_name} never appeared");
}
