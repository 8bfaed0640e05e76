use alloy_primitives::{Address, U256};
use thiserror::Error;

use crate::application::orchestration::CallbackKind;
use crate::domain::MarketId;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("unknown market '{name}'")]
    UnknownMarket { name: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures raised by the orchestrator itself.
///
/// Everything else that can go wrong during a leverage flow is passed through
/// from the ledger, the token primitive or the swap adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorError {
    #[error("reentrancy violation: a top-level call initiated by {active} is in flight")]
    ReentrancyViolation { active: Address },

    #[error("unauthorized callback from {caller}, expected ledger {ledger}")]
    UnauthorizedCallback { caller: Address, ledger: Address },

    #[error("invalid callback discriminator {0}")]
    InvalidCallbackDiscriminator(u8),

    #[error("confused deputy: swap adapter {adapter} is the ledger itself")]
    ConfusedDeputy { adapter: Address },

    #[error("swap adapter {adapter} is not on the allow-list")]
    AdapterNotAllowed { adapter: Address },

    #[error("callback received with no active initiator")]
    NoActiveInitiator,

    #[error("{kind} callback was not requested by an outstanding ledger call")]
    UnexpectedCallback { kind: CallbackKind },

    #[error("continuation targets market {continuation}, call was made on {entry}")]
    MarketMismatch {
        entry: MarketId,
        continuation: MarketId,
    },

    #[error("markets {prev} and {new} do not share loan and collateral assets")]
    IncompatibleMarkets { prev: MarketId, new: MarketId },

    #[error("malformed continuation: {0}")]
    MalformedContinuation(String),
}

/// Failures raised by the lending ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("market {0} is not created")]
    MarketNotCreated(MarketId),

    #[error("market {0} already exists")]
    MarketAlreadyCreated(MarketId),

    #[error("exactly one of assets and shares must be zero")]
    InconsistentInput,

    #[error("amount must be nonzero")]
    ZeroAmount,

    #[error("zero address")]
    ZeroAddress,

    #[error("{caller} is not authorized to act for {on_behalf}")]
    Unauthorized { caller: Address, on_behalf: Address },

    #[error("position of {account} in market {market} would be undercollateralized")]
    InsufficientCollateral { market: MarketId, account: Address },

    #[error("market {0} lacks liquidity")]
    InsufficientLiquidity(MarketId),

    #[error("repay of {shares} shares exceeds the borrow of {account}")]
    RepayExceedsDebt { account: Address, shares: U256 },

    #[error("withdrawal of {amount} exceeds the collateral of {account}")]
    WithdrawExceedsCollateral { account: Address, amount: U256 },

    #[error("no price for oracle {0}")]
    PriceUnavailable(Address),

    #[error("caller {0} cannot receive ledger callbacks")]
    CallbackUnsupported(Address),

    #[error("lltv {0} is not allowed")]
    LltvNotAllowed(U256),

    #[error("math overflow")]
    MathOverflow,
}

/// Failures raised by the asset transfer primitive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("insufficient {token} balance for {owner}: have {balance}, need {needed}")]
    InsufficientBalance {
        token: Address,
        owner: Address,
        balance: U256,
        needed: U256,
    },

    #[error("insufficient {token} allowance from {owner} to {spender}: have {allowance}, need {needed}")]
    InsufficientAllowance {
        token: Address,
        owner: Address,
        spender: Address,
        allowance: U256,
        needed: U256,
    },

    #[error("token amount overflow")]
    Overflow,
}

/// Failures raised by a swap adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("no swap adapter deployed at {0}")]
    UnknownAdapter(Address),

    #[error("invalid swap instruction: {0}")]
    InvalidInstruction(String),

    #[error("no rate for {token_in} -> {token_out}")]
    UnsupportedPair { token_in: Address, token_out: Address },

    #[error("slippage exceeded: got {amount_out}, minimum {min_amount_out}")]
    SlippageExceeded {
        amount_out: U256,
        min_amount_out: U256,
    },

    #[error("adapter rejected the call: {0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Swap(#[from] SwapError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The orchestrator-level failure, when this error is one.
    #[must_use]
    pub fn as_orchestrator(&self) -> Option<&OrchestratorError> {
        match self {
            Self::Orchestrator(err) => Some(err),
            _ => None,
        }
    }
}
