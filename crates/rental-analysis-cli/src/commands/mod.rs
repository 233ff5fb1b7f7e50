pub mod loan;
pub mod property;
pub mod ratios;
pub mod screening;
