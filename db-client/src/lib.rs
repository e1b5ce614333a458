pub mod db;
pub mod domain;
pub mod schema;
pub mod units;
pub mod validation;
