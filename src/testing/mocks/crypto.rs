//! Mock key service

use crate::crypto::{CryptoError, CryptoResult, Encryptor, Envelope};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Returns `mock-ciphertext-N` for the Nth call
///
/// `failing` fails every call; `fail_after(n)` lets the first `n` calls
/// succeed and fails the rest.
#[derive(Default)]
pub struct MockEncryptor {
    calls: AtomicUsize,
    fail_with: Option<String>,
    succeed_first: usize,
}

impl MockEncryptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_with: Some(message.to_string()),
            succeed_first: 0,
        }
    }

    pub fn fail_after(mut self, successes: usize) -> Self {
        self.succeed_first = successes;
        self.fail_with
            .get_or_insert_with(|| "AccessDeniedException".to_string());
        self
    }

    /// Number of encrypt calls made, failed ones included
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Encryptor for MockEncryptor {
    async fn encrypt(&self, _plaintext: &str) -> CryptoResult<Envelope> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(message) = &self.fail_with {
            if n > self.succeed_first {
                return Err(CryptoError::Service(message.clone()));
            }
        }

        Ok(Envelope {
            ciphertext: format!("mock-ciphertext-{}", n).into_bytes(),
        })
    }
}
