use crate::assets::TransferError;
use crate::capability::Capability;
use stakecast_types::{AccountId, Amount, Epoch, EventId};
use thiserror::Error;

/// Every failure the engine can report. All are synchronous, terminal for
/// the call, and leave prior state unchanged; retries are a caller concern.
#[derive(Debug, Error)]
pub enum StakingError {
    #[error("unknown staking event: {0}")]
    NotFound(EventId),
    #[error("invalid event configuration: {reason}")]
    InvalidConfiguration { reason: &'static str },
    #[error("event {id} is not open for deposits at epoch {now}")]
    NotOpen { id: EventId, now: Epoch },
    #[error("event {id} has not closed at epoch {now}")]
    NotClosed { id: EventId, now: Epoch },
    #[error("account {account} holds none of the required credential tags")]
    IneligibleParticipant { account: AccountId },
    #[error("per-wallet cap exceeded for account {account}: attempted={attempted}, cap={cap}")]
    WalletCapExceeded {
        account: AccountId,
        attempted: Amount,
        cap: Amount,
    },
    #[error("account {account} has nothing to claim in event {id}")]
    NothingToClaim { id: EventId, account: AccountId },
    #[error("account {account} lacks the {capability} capability")]
    InsufficientAuthorization {
        account: AccountId,
        capability: Capability,
    },
    #[error("arithmetic overflow in reward computation")]
    ArithmeticOverflow,
    #[error("ledger transfer failed: {0}")]
    LedgerTransferFailed(#[from] TransferError),
}
