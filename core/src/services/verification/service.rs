//! Verification service: origin guard, rotation engine and notifier composed
//! into the two request flows (verify, provision)

use std::sync::Arc;
use std::time::Duration;

use rc_shared::validation::{mask_email, not_empty};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{error, info, warn, Instrument, Span};

use crate::errors::{DomainError, DomainResult};
use crate::repositories::{BlockListRepository, RecordRepository};
use crate::services::code_generator::CodeGenerator;
use crate::services::guard::{GuardState, OriginGuard};
use crate::services::ledger::RecordLedger;

use super::config::VerificationServiceConfig;
use super::engine::RotationEngine;
use super::traits::Notifier;
use super::types::{ProvisionedRecord, VerifyOutcome, VerifyResult};

pub struct VerificationService<R, B, N>
where
    R: RecordRepository + ?Sized,
    B: BlockListRepository + ?Sized,
    N: Notifier + ?Sized,
{
    engine: Arc<RotationEngine<R>>,
    guard: Arc<OriginGuard<B>>,
    notifier: Arc<N>,
    config: VerificationServiceConfig,
}

impl<R, B, N> VerificationService<R, B, N>
where
    R: RecordRepository + ?Sized + 'static,
    B: BlockListRepository + ?Sized + 'static,
    N: Notifier + ?Sized + 'static,
{
    /// Create a new verification service
    ///
    /// # Arguments
    ///
    /// * `records` - Record store repository
    /// * `guard` - Origin guard, usually built with [`OriginGuard::load`]
    /// * `notifier` - Delivery channel for new codes
    /// * `config` - Service configuration
    ///
    /// # Errors
    ///
    /// `DomainError::Validation` if the configured code length is too short
    pub fn new(
        records: Arc<R>,
        guard: OriginGuard<B>,
        notifier: Arc<N>,
        config: VerificationServiceConfig,
    ) -> DomainResult<Self> {
        let generator = CodeGenerator::new(config.code_length)?;
        let ledger = RecordLedger::new(records, config.io_timeout);
        let engine = RotationEngine::new(ledger, generator, config.max_identifier_draws);

        Ok(Self {
            engine: Arc::new(engine),
            guard: Arc::new(guard),
            notifier,
            config,
        })
    }

    pub fn engine(&self) -> &RotationEngine<R> {
        &self.engine
    }

    pub fn guard(&self) -> &OriginGuard<B> {
        &self.guard
    }

    /// Current guard state of `origin`
    pub async fn origin_state(&self, origin: &str) -> GuardState {
        self.guard.state(origin).await
    }

    /// Verify a submitted code on behalf of `origin`
    ///
    /// This method:
    /// 1. Serializes attempts from the same origin
    /// 2. Refuses blocked origins without touching the store
    /// 3. Matches and rotates through the engine
    /// 4. Counts mismatches against the origin, clears its counter on success
    /// 5. Delivers the new code, bounded by the notify timeout
    ///
    /// Steps 3 to 5 run on a detached task. Dropping the returned future after
    /// that point does not stop a rotation from being recorded and delivered.
    ///
    /// # Returns
    ///
    /// * `Ok(VerifyResult)` - Success, mismatch or block
    /// * `Err(DomainError::Validation)` - The email is missing
    /// * `Err(DomainError::Store)` - The store failed; the origin is not charged a failure
    pub async fn verify(
        &self,
        origin: &str,
        email: &str,
        identifier: &str,
        code: &str,
    ) -> DomainResult<VerifyResult> {
        let permit = self.guard.acquire(origin).await;

        if let GuardState::Blocked { until } = self.guard.check(origin).await {
            warn!(
                origin = origin,
                blocked_until = %until,
                event = "blocked_origin_attempt",
                "Verification attempt from blocked origin"
            );
            return Ok(VerifyResult::Blocked { until });
        }

        if !not_empty(email) {
            return Err(DomainError::validation("email is required"));
        }

        let engine = Arc::clone(&self.engine);
        let guard = Arc::clone(&self.guard);
        let notifier = Arc::clone(&self.notifier);
        let notify_timeout = self.config.notify_timeout;
        let origin = origin.to_string();
        let identifier = identifier.to_string();
        let code = code.to_string();

        settle(tokio::spawn(async move {
            let outcome = match engine.verify(&identifier, &code).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(
                        origin = %origin,
                        error = %e,
                        event = "verification_error",
                        "Verification aborted by a store failure"
                    );
                    return Err(e);
                }
            };

            match outcome {
                VerifyOutcome::Mismatch => {
                    guard.record_failure(&origin).await;
                    Ok(VerifyResult::Mismatch)
                }
                VerifyOutcome::Success {
                    email: owner_email,
                    new_code,
                    ..
                } => {
                    guard.record_success(&origin).await;
                    drop(permit);

                    let delivered =
                        deliver(&*notifier, notify_timeout, &owner_email, &new_code).await;
                    Ok(VerifyResult::Success { delivered })
                }
            }
        }
        .instrument(Span::current())))
        .await
    }

    /// Provision a new record and send its initial code
    ///
    /// Like [`verify`](Self::verify), the store write and the delivery run on
    /// a detached task.
    pub async fn provision_user(&self, username: &str, email: &str) -> DomainResult<ProvisionedRecord> {
        let engine = Arc::clone(&self.engine);
        let notifier = Arc::clone(&self.notifier);
        let notify_timeout = self.config.notify_timeout;
        let username = username.to_string();
        let email = email.to_string();

        settle(tokio::spawn(async move {
            let mut provisioned = engine.provision(&username, &email).await?;
            provisioned.delivered = deliver(
                &*notifier,
                notify_timeout,
                &provisioned.email,
                &provisioned.code,
            )
            .await;
            Ok(provisioned)
        }
        .instrument(Span::current())))
        .await
    }
}

async fn settle<T>(task: JoinHandle<DomainResult<T>>) -> DomainResult<T> {
    match task.await {
        Ok(result) => result,
        Err(join_error) => Err(DomainError::Internal {
            message: format!("verification task failed: {}", join_error),
        }),
    }
}

/// Hand a code to the notifier. A failure here never undoes the rotation.
async fn deliver<N>(notifier: &N, notify_timeout: Duration, email: &str, code: &str) -> bool
where
    N: Notifier + ?Sized,
{
    match notify_bounded(notifier, notify_timeout, email, code).await {
        Ok(message_id) => {
            info!(
                email = %mask_email(email),
                message_id = %message_id,
                event = "code_delivered",
                "New code handed to notifier"
            );
            true
        }
        Err(e) => {
            error!(
                email = %mask_email(email),
                error = %e,
                event = "notify_failed",
                "Failed to deliver new code"
            );
            false
        }
    }
}

async fn notify_bounded<N>(
    notifier: &N,
    notify_timeout: Duration,
    email: &str,
    code: &str,
) -> DomainResult<String>
where
    N: Notifier + ?Sized,
{
    match timeout(notify_timeout, notifier.notify(email, code)).await {
        Ok(Ok(message_id)) => Ok(message_id),
        Ok(Err(message)) => Err(DomainError::Notify { message }),
        Err(_) => Err(DomainError::Notify {
            message: format!("notifier timed out after {}s", notify_timeout.as_secs_f64()),
        }),
    }
}
