pub mod amm;
pub mod balances;
pub mod bucket;
pub mod conditional;
pub mod oracle;
pub mod position;
pub mod proposal;
pub mod spot;

pub use amm::*;
pub use balances::*;
pub use bucket::*;
pub use conditional::*;
pub use oracle::*;
pub use position::*;
pub use proposal::*;
pub use spot::*;
