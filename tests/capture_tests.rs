// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use brokee::capture::{CameraStream, Frame, Recognizer, ScanOutcome, parse_amount_text, scan};
use brokee::error::CaptureError;
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Default)]
struct Counters {
    frames: Arc<AtomicUsize>,
    stops: Arc<AtomicUsize>,
}

struct FakeCamera {
    counts: Counters,
    fail_after: Option<usize>,
}

impl CameraStream for FakeCamera {
    async fn grab_frame(&mut self) -> Result<Frame, CaptureError> {
        let n = self.counts.frames.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_after.is_some_and(|limit| n > limit) {
            return Err(CaptureError::Frame("device lost".to_string()));
        }
        Ok(Frame {
            width: 2,
            height: 1,
            data: vec![n as u8, 0],
        })
    }

    fn stop_tracks(&mut self) {
        self.counts.stops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Reads a receipt total once the third frame arrives.
struct ThirdFrameReceipt;

impl Recognizer for ThirdFrameReceipt {
    type Output = Decimal;

    async fn recognize(&mut self, frame: &Frame) -> Option<Decimal> {
        (frame.data[0] >= 3).then(|| parse_amount_text("TOTAL 23,90 EUR")).flatten()
    }
}

struct Never;

impl Recognizer for Never {
    type Output = String;

    async fn recognize(&mut self, _frame: &Frame) -> Option<String> {
        None
    }
}

fn camera(counts: &Counters, fail_after: Option<usize>) -> FakeCamera {
    FakeCamera {
        counts: counts.clone(),
        fail_after,
    }
}

#[tokio::test(start_paused = true)]
async fn stops_on_first_recognition() {
    let counts = Counters::default();
    let token = CancellationToken::new();
    let outcome = scan(
        camera(&counts, None),
        &mut ThirdFrameReceipt,
        Duration::from_millis(500),
        &token,
    )
    .await
    .unwrap();
    assert_eq!(outcome, ScanOutcome::Recognized(Decimal::new(2390, 2)));
    assert_eq!(counts.frames.load(Ordering::SeqCst), 3);
    assert_eq!(counts.stops.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn cancellation_releases_the_camera() {
    let counts = Counters::default();
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1250)).await;
        canceller.cancel();
    });
    let outcome = scan(camera(&counts, None), &mut Never, Duration::from_millis(500), &token)
        .await
        .unwrap();
    assert_eq!(outcome, ScanOutcome::Cancelled);
    assert_eq!(counts.frames.load(Ordering::SeqCst), 3);
    assert_eq!(counts.stops.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn frame_errors_still_release_the_camera() {
    let counts = Counters::default();
    let token = CancellationToken::new();
    let err = scan(camera(&counts, Some(1)), &mut Never, Duration::from_millis(10), &token)
        .await
        .unwrap_err();
    assert_eq!(err, CaptureError::Frame("device lost".to_string()));
    assert_eq!(counts.stops.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_scan_releases_the_camera() {
    let counts = Counters::default();
    let token = CancellationToken::new();
    let mut never = Never;
    let scanning = scan(camera(&counts, None), &mut never, Duration::from_millis(100), &token);
    let timed_out = tokio::time::timeout(Duration::from_millis(350), scanning).await;
    assert!(timed_out.is_err());
    assert_eq!(counts.stops.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn zero_interval_is_rejected_and_releases_the_camera() {
    let counts = Counters::default();
    let token = CancellationToken::new();
    let err = scan(camera(&counts, None), &mut Never, Duration::ZERO, &token)
        .await
        .unwrap_err();
    assert_eq!(err, CaptureError::ZeroInterval);
    assert_eq!(counts.frames.load(Ordering::SeqCst), 0);
    assert_eq!(counts.stops.load(Ordering::SeqCst), 1);
}
