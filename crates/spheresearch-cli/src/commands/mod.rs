pub mod lattice;
pub mod search;
