//! System-wide constants for the OpenAuction clearing engine.

/// Largest representable order amount: amounts are 96-bit unsigned atoms.
pub const MAX_ORDER_AMOUNT: u128 = (1 << 96) - 1;

/// Number of bits each amount field occupies inside an order key.
pub const AMOUNT_BITS: usize = 96;

/// Fee denominator: fees are expressed as `numerator / 1000`.
pub const FEE_DENOMINATOR: u64 = 1000;

/// Upper bound on the fee numerator (1.5%).
pub const MAX_FEE_NUMERATOR: u64 = 15;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "OpenAuction";
