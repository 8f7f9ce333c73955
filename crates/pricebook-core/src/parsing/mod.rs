pub mod filter;
pub mod metadata;
pub mod numeric;
pub mod standardize;
