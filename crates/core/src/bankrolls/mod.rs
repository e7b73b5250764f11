//! Bankrolls module - domain models, API seam and service.

mod bankrolls_constants;
mod bankrolls_model;
mod bankrolls_service;
mod bankrolls_traits;

#[cfg(test)]
mod bankrolls_model_tests;
#[cfg(test)]
mod bankrolls_service_tests;

pub use bankrolls_constants::*;
pub use bankrolls_model::{
    AdjustmentSource, Bankroll, BankrollAdjustment, BankrollRef, BankrollSessionFilter,
    BankrollStats, BankrollType, BankrollUpdate, NewBankroll,
};
pub use bankrolls_service::BankrollService;
pub use bankrolls_traits::BankrollApiTrait;
