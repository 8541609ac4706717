//! 도메인 엔티티 정의.

mod ipo;
mod params;
mod pool;
mod position;
mod quote;
mod signal;
mod transaction;

pub use ipo::IpoListing;
pub use params::{StrategyParams, StrategyParamsSet};
pub use pool::{PoolEtf, PoolKind};
pub use position::Position;
pub use quote::Quote;
pub use signal::{ExecStatus, ExecutionResult, Signal};
pub use transaction::{TradeAction, Transaction};
