pub mod config;
pub mod core;
pub mod error;
pub mod feed;
pub mod findings;
pub mod notifications;
pub mod publish;
pub mod rpc;

pub use crate::core::detector::{Detector, DetectorSettings};
pub use crate::core::{DepositEvent, DepositRecord, EventLog, TxEvent};
pub use crate::error::{DetectorError, SetupError};
pub use crate::findings::Finding;
