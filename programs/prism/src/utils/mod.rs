pub mod math_safe;
pub mod transfers;

pub use math_safe::*;
pub use transfers::*;
