//! Service layer for customer records.
//! - Separates business rules from data access.
//! - Reuses entity definitions in `models` crate.
//! - Repository trait lets the transport run against PostgreSQL or memory.

pub mod errors;
pub mod customer;
#[cfg(test)]
pub mod test_support;
