// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    pdf = { "estimate.PDF", "application/pdf" },
    jpeg = { "site.jpeg", "image/jpeg" },
    spreadsheet = { "takeoff.xlsx", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" },
    no_extension = { "README", "application/octet-stream" },
    unknown = { "model.dwg", "application/octet-stream" },
)]
fn content_type_from_extension(name: &str, expected: &str) {
    assert_eq!(content_type_for(name), expected);
}

#[test]
fn upload_guesses_content_type() {
    let file = FileUpload::new("photo.png", vec![0; 4]);
    assert_eq!(file.content_type, "image/png");
    assert_eq!(file.bytes.len(), 4);
}

#[test]
fn errors_render_their_kind() {
    assert_eq!(
        GatewayError::Remote("quota exceeded".to_string()).to_string(),
        "backend error: quota exceeded"
    );
    assert_eq!(
        GatewayError::Transport("connection refused".to_string()).to_string(),
        "transport error: connection refused"
    );
}
