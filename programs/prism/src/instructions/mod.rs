pub mod arbitrage;
pub mod complete_set;
pub mod initialize;
pub mod liquidity_add;
pub mod liquidity_remove;
pub mod proposal;
pub mod recombine;
pub mod redeem;
pub mod split;
pub mod swap;
pub mod swap_conditional;
pub mod transition;
pub mod withdraw_claim;
pub mod withdraw_request;

// Account contexts, re-exported for the program entrypoints. Handlers are
// reached through their module paths.
pub use arbitrage::*;
pub use complete_set::*;
pub use initialize::*;
pub use liquidity_add::*;
pub use liquidity_remove::*;
pub use proposal::*;
pub use recombine::*;
pub use redeem::*;
pub use split::*;
pub use swap::*;
pub use swap_conditional::*;
pub use transition::*;
pub use withdraw_claim::*;
pub use withdraw_request::*;
