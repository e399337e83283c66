//! Match-and-rotate engine over the record ledger

use constant_time_eq::constant_time_eq;
use rc_shared::validation::{is_valid_identifier, mask_email, not_empty};
use tracing::{info, warn};

use crate::domain::entities::Record;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::RecordRepository;
use crate::services::code_generator::CodeGenerator;
use crate::services::ledger::{Mutation, RecordLedger};

use super::types::{ProvisionedRecord, VerifyOutcome};

/// Validation message when no free identifier was found within the draw limit
pub const DUPLICATE_IDENTIFIER: &str = "duplicate identifier";

/// Verifies submitted codes and rotates them on success.
///
/// Every read-modify-write goes through the ledger, so a code can be accepted
/// at most once no matter how many requests race for it.
pub struct RotationEngine<R: RecordRepository + ?Sized> {
    ledger: RecordLedger<R>,
    generator: CodeGenerator,
    max_identifier_draws: usize,
}

impl<R: RecordRepository + ?Sized + 'static> RotationEngine<R> {
    pub fn new(ledger: RecordLedger<R>, generator: CodeGenerator, max_identifier_draws: usize) -> Self {
        Self {
            ledger,
            generator,
            max_identifier_draws: max_identifier_draws.max(1),
        }
    }

    pub fn ledger(&self) -> &RecordLedger<R> {
        &self.ledger
    }

    /// Check `submitted_code` against the record for `identifier`.
    ///
    /// Malformed identifiers and empty codes are a `Mismatch` without any
    /// store access. On a match the record's code is replaced and persisted
    /// before `Success` is returned.
    pub async fn verify(&self, identifier: &str, submitted_code: &str) -> DomainResult<VerifyOutcome> {
        if !is_valid_identifier(identifier) || submitted_code.is_empty() {
            warn!(
                identifier_length = identifier.len(),
                event = "verification_input_rejected",
                "Malformed identifier or empty code"
            );
            return Ok(VerifyOutcome::Mismatch);
        }

        let generator = self.generator;
        let outcome = self
            .ledger
            .transact(|records| {
                let Some(record) = records.iter_mut().find(|r| r.identifier == identifier) else {
                    return Ok(Mutation::Unchanged(VerifyOutcome::Mismatch));
                };
                if !codes_match(&record.code, submitted_code) {
                    return Ok(Mutation::Unchanged(VerifyOutcome::Mismatch));
                }

                let mut new_code = generator.generate();
                while new_code == record.code {
                    new_code = generator.generate();
                }
                record.code = new_code.clone();

                Ok(Mutation::Commit(VerifyOutcome::Success {
                    email: record.email.clone(),
                    username: record.username.clone(),
                    identifier: record.identifier.clone(),
                    new_code,
                }))
            })
            .await?;

        match &outcome {
            VerifyOutcome::Success { email, identifier, .. } => info!(
                identifier = %identifier,
                email = %mask_email(email),
                event = "code_rotated",
                "Code accepted and rotated"
            ),
            VerifyOutcome::Mismatch => warn!(
                identifier = identifier,
                event = "verification_mismatch",
                "Submitted code did not match"
            ),
        }

        Ok(outcome)
    }

    /// Create a record with a fresh identifier and initial code
    pub async fn provision(&self, username: &str, email: &str) -> DomainResult<ProvisionedRecord> {
        if !not_empty(username) {
            return Err(DomainError::validation("username is required"));
        }
        if !not_empty(email) {
            return Err(DomainError::validation("email is required"));
        }

        let generator = self.generator;
        let draws = self.max_identifier_draws;
        let record = self
            .ledger
            .transact(|records| {
                let identifier =
                    unused_identifier(records, draws, || generator.generate_identifier())?;

                let record = Record::new(username, email, identifier, generator.generate());
                records.push(record.clone());
                Ok(Mutation::Commit(record))
            })
            .await?;

        info!(
            identifier = %record.identifier,
            email = %mask_email(&record.email),
            event = "record_provisioned",
            "New record provisioned"
        );

        Ok(ProvisionedRecord {
            username: record.username,
            email: record.email,
            identifier: record.identifier,
            code: record.code,
            delivered: false,
        })
    }
}

/// Draw up to `draws` identifiers, returning the first one not already taken
fn unused_identifier<F>(records: &[Record], draws: usize, mut draw: F) -> DomainResult<String>
where
    F: FnMut() -> String,
{
    (0..draws)
        .map(|_| draw())
        .find(|candidate| records.iter().all(|r| &r.identifier != candidate))
        .ok_or_else(|| DomainError::validation(DUPLICATE_IDENTIFIER))
}

fn codes_match(stored: &str, submitted: &str) -> bool {
    let stored = stored.as_bytes();
    let submitted = submitted.as_bytes();
    // Only equal-length inputs reach the constant-time comparison
    stored.len() == submitted.len() && constant_time_eq(stored, submitted)
}

impl<R: RecordRepository + ?Sized> std::fmt::Debug for RotationEngine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotationEngine")
            .field("code_length", &self.generator.length())
            .finish_non_exhaustive()
    }
}
