//! Business services containing domain logic and use cases.

pub mod code_generator;
pub mod encryption;
pub mod guard;
pub mod ledger;
pub mod verification;

// Re-export commonly used types
pub use code_generator::{CodeGenerator, CODE_ALPHABET};
pub use encryption::SnapshotCipher;
pub use guard::{GuardState, OriginGuard, OriginPermit};
pub use ledger::{Mutation, RecordLedger};
pub use verification::{
    Notifier, ProvisionedRecord, RotationEngine, VerificationService, VerificationServiceConfig,
    VerifyOutcome, VerifyResult,
};
