//! Pay run orchestration: the transactional layer that coordinates the
//! pure calculation engines against persistent state.

mod pay_run;
mod repository;

pub use pay_run::create_pay_run;
pub use repository::{InMemoryRepository, PayrollRepository, TransactionScope};
