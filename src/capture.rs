// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Camera polling for receipt, QR and cash capture.
//!
//! Recognition itself is external. This module owns the loop: grab a frame
//! at a fixed interval, hand it to a [`Recognizer`], stop on the first hit
//! or on cancellation. The camera tracks are stopped on every exit path,
//! including errors and the scan future being dropped.

use std::future::Future;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::CaptureError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

pub trait CameraStream {
    fn grab_frame(&mut self) -> impl Future<Output = Result<Frame, CaptureError>> + Send;

    /// Releases the device. Must be safe to call more than once.
    fn stop_tracks(&mut self);
}

pub trait Recognizer {
    type Output;

    fn recognize(&mut self, frame: &Frame) -> impl Future<Output = Option<Self::Output>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome<T> {
    Recognized(T),
    Cancelled,
}

/// Owns the stream for the duration of a scan and stops its tracks on drop.
struct TrackGuard<S: CameraStream> {
    stream: S,
}

impl<S: CameraStream> Drop for TrackGuard<S> {
    fn drop(&mut self) {
        debug!("stopping camera tracks");
        self.stream.stop_tracks();
    }
}

/// Polls `stream` every `every` until `recognizer` yields a value or
/// `cancel` fires. A zero interval is rejected after the tracks are released.
pub async fn scan<S, R>(
    stream: S,
    recognizer: &mut R,
    every: Duration,
    cancel: &CancellationToken,
) -> Result<ScanOutcome<R::Output>, CaptureError>
where
    S: CameraStream,
    R: Recognizer,
{
    let mut guard = TrackGuard { stream };
    if every.is_zero() {
        return Err(CaptureError::ZeroInterval);
    }
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut attempts = 0u32;
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(attempts, "scan cancelled");
                return Ok(ScanOutcome::Cancelled);
            }
            _ = ticker.tick() => {}
        }
        attempts += 1;
        let step = async {
            let frame = guard.stream.grab_frame().await?;
            Ok::<_, CaptureError>(recognizer.recognize(&frame).await)
        };
        let found = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(attempts, "scan cancelled");
                return Ok(ScanOutcome::Cancelled);
            }
            found = step => found?,
        };
        if let Some(value) = found {
            debug!(attempts, "capture recognized");
            return Ok(ScanOutcome::Recognized(value));
        }
    }
}

static AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{1,3}(?:[ .,]\d{3})+(?:[.,]\d{2})?|\d+(?:[.,]\d{2})?").expect("amount regex")
});

/// Extracts the largest money amount from recognised text. Accepts comma or
/// dot decimals and space, dot or comma thousands separators.
pub fn parse_amount_text(text: &str) -> Option<Decimal> {
    AMOUNT
        .find_iter(text)
        .filter_map(|m| normalize_amount(m.as_str()))
        .max()
}

fn normalize_amount(raw: &str) -> Option<Decimal> {
    let (int_part, frac) = match raw.rfind(['.', ',']) {
        Some(i) if raw.len() - i == 3 => (&raw[..i], &raw[i + 1..]),
        _ => (raw, ""),
    };
    let digits: String = int_part.chars().filter(char::is_ascii_digit).collect();
    let text = if frac.is_empty() {
        digits
    } else {
        format!("{}.{}", digits, frac)
    };
    text.parse().ok()
}
