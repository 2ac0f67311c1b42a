//! gestor-domain
//!
//! Pure domain models (Company, Client, Employee, Contract, Transaction, AppData).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod app_data;
pub mod client;
pub mod common;
pub mod company;
pub mod contract;
pub mod employee;
pub mod transaction;

pub use app_data::*;
pub use client::*;
pub use common::*;
pub use company::*;
pub use contract::*;
pub use employee::*;
pub use transaction::*;
