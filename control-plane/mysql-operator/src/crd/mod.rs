pub mod mysql;

pub use mysql::{MySQL, MySQLSpec, MySQLStatus};
