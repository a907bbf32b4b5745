//! Motivational text collaborator.
//!
//! # Responsibility
//! - Describe the external text source as an async trait.
//! - Resolve every failure to a fixed fallback pair.
//!
//! # Invariants
//! - The fetch never affects task data and is never retried.
//! - Callers always receive a `Motivation`, never an error.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;

pub const FALLBACK_MOTIVATION: &str = "Keep moving forward, even in the dark.";
pub const FALLBACK_TIP: &str = "Start with the smallest task and clear them one by one.";

/// A short motivational line plus a productivity tip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Motivation {
    pub motivation: String,
    pub tip: String,
}

impl Motivation {
    pub fn fallback() -> Self {
        Self {
            motivation: FALLBACK_MOTIVATION.to_string(),
            tip: FALLBACK_TIP.to_string(),
        }
    }
}

#[derive(Debug)]
pub enum MotivationError {
    /// No source is configured or reachable.
    Unavailable(String),
    /// The source answered with something that is not a motivation pair.
    Malformed(String),
}

impl Display for MotivationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "motivation source unavailable: {message}"),
            Self::Malformed(message) => write!(f, "malformed motivation response: {message}"),
        }
    }
}

impl Error for MotivationError {}

/// External generator of motivational text.
pub trait MotivationSource {
    fn fetch_motivation(
        &self,
        pending_count: usize,
    ) -> impl Future<Output = Result<Motivation, MotivationError>>;
}

/// Fetches once, substituting the fallback pair on any failure.
pub async fn fetch_motivation_or_fallback<M: MotivationSource>(
    source: &M,
    pending_count: usize,
) -> Motivation {
    match source.fetch_motivation(pending_count).await {
        Ok(motivation) if is_usable(&motivation) => {
            info!("event=motivation_fetch module=motivation status=ok pending={pending_count}");
            motivation
        }
        Ok(_) => {
            warn!(
                "event=motivation_fetch module=motivation status=fallback pending={pending_count} error_code=empty_response"
            );
            Motivation::fallback()
        }
        Err(err) => {
            warn!(
                "event=motivation_fetch module=motivation status=fallback pending={pending_count} error={err}"
            );
            Motivation::fallback()
        }
    }
}

fn is_usable(motivation: &Motivation) -> bool {
    !motivation.motivation.trim().is_empty() && !motivation.tip.trim().is_empty()
}
