pub mod arbitrage;
pub mod recombine;
pub mod split;
pub mod swap;
pub mod withdraw;
