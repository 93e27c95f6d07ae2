pub mod corpus;
pub mod fields;
