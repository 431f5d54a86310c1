//! Session PIN generation.
//!
//! PINs are 6 to 10 digits. The length is drawn uniformly, then the value
//! uniformly within that length's range, both by rejection sampling over
//! OS randomness so no value is favoured by modulo bias.

use std::sync::Arc;

use rand::rngs::OsRng;
use rand::RngCore;

use crate::domain::game::{GameError, SessionPin};
use crate::ports::ActivePinStore;

/// Retry budget used when none is configured.
pub const DEFAULT_PIN_MAX_ATTEMPTS: u32 = 20;

/// Bits drawn per sample. 2^40 comfortably exceeds the widest range (9e9).
const SAMPLE_BYTES: usize = 5;
const SAMPLE_SPACE: u64 = 1 << (SAMPLE_BYTES * 8);

/// Generates PINs unique among live sessions.
pub struct PinGenerator {
    store: Arc<dyn ActivePinStore>,
    max_attempts: u32,
}

impl PinGenerator {
    pub fn new(store: Arc<dyn ActivePinStore>, max_attempts: u32) -> Self {
        Self {
            store,
            max_attempts,
        }
    }

    /// Draws a PIN no live session holds and claims it before returning.
    ///
    /// # Errors
    ///
    /// - `Exhaustion` if every attempt collided
    /// - `Infrastructure` if the PIN store fails
    pub async fn generate(&self) -> Result<SessionPin, GameError> {
        for attempt in 1..=self.max_attempts {
            let candidate = random_pin(&mut OsRng)?;

            if self.store.is_pin_active(&candidate).await? {
                tracing::debug!(attempt, "PIN candidate already active");
                continue;
            }

            // Another generator may have claimed it since the snapshot.
            if self.store.save_new_pin(&candidate).await? {
                tracing::debug!(attempt, pin = %candidate, "PIN claimed");
                return Ok(candidate);
            }
            tracing::debug!(attempt, "PIN candidate claimed concurrently");
        }

        Err(GameError::Exhaustion {
            attempts: self.max_attempts,
        })
    }

    /// Returns a PIN to the pool.
    pub async fn release(&self, pin: &SessionPin) -> Result<(), GameError> {
        self.store.release_pin(pin).await?;
        Ok(())
    }
}

/// Draws one candidate PIN.
pub(crate) fn random_pin<R: RngCore>(rng: &mut R) -> Result<SessionPin, GameError> {
    let span = (SessionPin::MAX_LENGTH - SessionPin::MIN_LENGTH + 1) as u64;
    let length = SessionPin::MIN_LENGTH as u32 + uniform_below(rng, span) as u32;

    let min = 10u64.pow(length - 1);
    let max = 10u64.pow(length) - 1;
    let value = min + uniform_below(rng, max - min + 1);

    Ok(SessionPin::from_number(value)?)
}

/// Uniform integer in `[0, n)` by rejection sampling.
///
/// Samples at or above the largest multiple of `n` that fits the sample
/// space are discarded.
fn uniform_below<R: RngCore>(rng: &mut R, n: u64) -> u64 {
    debug_assert!(n > 0 && n <= SAMPLE_SPACE);
    let limit = SAMPLE_SPACE - SAMPLE_SPACE % n;
    loop {
        let mut buf = [0u8; 8];
        rng.fill_bytes(&mut buf[..SAMPLE_BYTES]);
        let sample = u64::from_le_bytes(buf);
        if sample < limit {
            return sample % n;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DomainError, ErrorCode};
    use async_trait::async_trait;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockPinStore {
        pins: Mutex<HashSet<SessionPin>>,
        refuse_claims: bool,
        fail: bool,
    }

    #[async_trait]
    impl ActivePinStore for MockPinStore {
        async fn get_active_pins(&self) -> Result<HashSet<SessionPin>, DomainError> {
            if self.fail {
                return Err(DomainError::new(ErrorCode::CacheError, "unreachable"));
            }
            Ok(self.pins.lock().unwrap().clone())
        }

        async fn save_new_pin(&self, pin: &SessionPin) -> Result<bool, DomainError> {
            if self.refuse_claims {
                return Ok(false);
            }
            Ok(self.pins.lock().unwrap().insert(pin.clone()))
        }

        async fn release_pin(&self, pin: &SessionPin) -> Result<(), DomainError> {
            self.pins.lock().unwrap().remove(pin);
            Ok(())
        }
    }

    #[tokio::test]
    async fn thousand_pins_are_unique_and_well_formed() {
        let store = Arc::new(MockPinStore::default());
        let generator = PinGenerator::new(store.clone(), DEFAULT_PIN_MAX_ATTEMPTS);

        let mut seen = HashSet::new();
        for _ in 0..1000 {
            let pin = generator.generate().await.unwrap();
            assert!((6..=10).contains(&pin.len()));
            assert!(seen.insert(pin));
        }
        assert_eq!(store.pins.lock().unwrap().len(), 1000);
    }

    #[tokio::test]
    async fn exhaustion_after_max_attempts() {
        let store = Arc::new(MockPinStore {
            refuse_claims: true,
            ..Default::default()
        });
        let generator = PinGenerator::new(store, 3);

        let err = generator.generate().await.unwrap_err();
        assert_eq!(err, GameError::Exhaustion { attempts: 3 });
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn store_failure_is_infrastructure() {
        let store = Arc::new(MockPinStore {
            fail: true,
            ..Default::default()
        });
        let generator = PinGenerator::new(store, 3);
        assert!(matches!(
            generator.generate().await,
            Err(GameError::Infrastructure(_))
        ));
    }

    /// Answers membership per PIN and refuses full-set reads.
    #[derive(Default)]
    struct MembershipStore {
        pins: Mutex<HashSet<SessionPin>>,
        checks: Mutex<usize>,
    }

    #[async_trait]
    impl ActivePinStore for MembershipStore {
        async fn get_active_pins(&self) -> Result<HashSet<SessionPin>, DomainError> {
            Err(DomainError::new(ErrorCode::CacheError, "full set read"))
        }

        async fn is_pin_active(&self, pin: &SessionPin) -> Result<bool, DomainError> {
            *self.checks.lock().unwrap() += 1;
            Ok(self.pins.lock().unwrap().contains(pin))
        }

        async fn save_new_pin(&self, pin: &SessionPin) -> Result<bool, DomainError> {
            Ok(self.pins.lock().unwrap().insert(pin.clone()))
        }

        async fn release_pin(&self, pin: &SessionPin) -> Result<(), DomainError> {
            self.pins.lock().unwrap().remove(pin);
            Ok(())
        }
    }

    #[tokio::test]
    async fn candidates_are_checked_one_at_a_time() {
        let store = Arc::new(MembershipStore::default());
        let generator = PinGenerator::new(store.clone(), DEFAULT_PIN_MAX_ATTEMPTS);

        for _ in 0..50 {
            generator.generate().await.unwrap();
        }

        assert_eq!(store.pins.lock().unwrap().len(), 50);
        assert!(*store.checks.lock().unwrap() >= 50);
    }

    #[tokio::test]
    async fn release_frees_the_pin() {
        let store = Arc::new(MockPinStore::default());
        let generator = PinGenerator::new(store.clone(), 5);
        let pin = generator.generate().await.unwrap();
        generator.release(&pin).await.unwrap();
        assert!(store.pins.lock().unwrap().is_empty());
    }

    #[test]
    fn every_length_is_reachable() {
        let mut rng = StdRng::seed_from_u64(7);
        let lengths: HashSet<usize> = (0..2000)
            .map(|_| random_pin(&mut rng).unwrap().len())
            .collect();
        assert_eq!(lengths, (6..=10).collect());
    }

    proptest! {
        #[test]
        fn random_pin_has_no_leading_zero(seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let pin = random_pin(&mut rng).unwrap();
            prop_assert!((6..=10).contains(&pin.len()));
            prop_assert!(!pin.as_str().starts_with('0'));
        }

        #[test]
        fn uniform_below_stays_in_range(seed in any::<u64>(), n in 1u64..10_000_000_000) {
            let mut rng = StdRng::seed_from_u64(seed);
            prop_assert!(uniform_below(&mut rng, n) < n);
        }
    }
}
