//! Error definitions

use anchor_lang::prelude::*;

#[error_code]
pub enum PrismError {
    // Liquidity errors
    #[msg("Insufficient liquidity for requested amount")]
    InsufficientLiquidity,

    #[msg("Remaining liquidity would fall below the configured minimum")]
    LiquidityBelowMinimum,

    #[msg("Zero amount")]
    ZeroAmount,

    #[msg("Slippage exceeded")]
    SlippageExceeded,

    // Withdrawal state machine errors
    #[msg("Position is not in the required bucket for this transition")]
    InvalidBucketTransition,

    #[msg("Position is not in withdraw mode")]
    NotInWithdrawMode,

    #[msg("Proposal is still active")]
    ProposalStillActive,

    // Proposal / split errors
    #[msg("Market already split for an open proposal")]
    MarketAlreadySplit,

    #[msg("Market is not split")]
    MarketNotSplit,

    #[msg("Proposal is not active")]
    ProposalNotActive,

    #[msg("Proposal has not resolved")]
    ProposalNotResolved,

    #[msg("Proposal does not match the one this market is locked to")]
    ProposalMismatch,

    #[msg("Outcome index out of range")]
    OutcomeOutOfRange,

    #[msg("Split ratio must be in (0, 10000] basis points")]
    InvalidSplitRatio,

    // Ledger errors
    #[msg("Balances do not form a complete set across all outcomes")]
    IncompleteSet,

    #[msg("Ledger still holds balances from a previous proposal")]
    StaleLedger,

    // Arbitrage errors
    #[msg("No profitable arbitrage cycle at current prices")]
    NoProfitableCycle,

    // Crank errors
    #[msg("Crank invoked before the minimum interval elapsed")]
    CrankTooSoon,

    // Math errors (fatal: a reserve or supply invariant has been exceeded)
    #[msg("Math overflow")]
    ArithmeticOverflow,

    #[msg("Math underflow")]
    ArithmeticUnderflow,

    #[msg("Division by zero")]
    DivisionByZero,

    #[msg("Constant-product invariant decreased")]
    KInvariantViolated,

    // Internal errors (asserted defensively, unreachable in correct code)
    #[msg("Bucket totals do not sum to the recorded total")]
    BucketConservationViolation,

    // Oracle errors
    #[msg("Invalid timestamp")]
    InvalidTimestamp,

    #[msg("Insufficient TWAP duration")]
    InsufficientTwapDuration,

    // Configuration errors
    #[msg("Invalid market configuration")]
    InvalidConfig,

    #[msg("Unauthorized access")]
    Unauthorized,
}
