use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MathError {
    #[error("Math error - overflow")]
    Overflow,
    #[error("Math error - division by zero")]
    DivisionByZero,
}

/// Out-of-domain inputs at the codec boundaries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("Range error - tick out of bounds")]
    TickOutOfBounds,
    #[error("Range error - price out of bounds")]
    PriceOutOfBounds,
    #[error("Range error - book id exceeds 192 bits")]
    BookIdOutOfBounds,
    #[error("Range error - order index exceeds 40 bits")]
    OrderIndexOutOfBounds,
}

/// Caller-supplied parameters that can never be computed with.
/// Depleted liquidity is not in here: running out of depth is a
/// normal simulation result, not a failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("Param error - unit size is 0")]
    ZeroUnitSize,
    #[error("Param error - reference swap amount is 0")]
    ZeroReferenceSwapAmount,
    #[error("Param error - fee rate must be below RATE_PRECISION")]
    FeeRateOutOfBounds,
    #[error("Param error - unparseable decimal price: {0}")]
    InvalidPriceString(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    MathError(#[from] MathError),

    #[error(transparent)]
    RangeError(#[from] RangeError),

    #[error(transparent)]
    ParamError(#[from] ParamError),
}
