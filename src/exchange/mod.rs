pub mod request;
pub mod coordinator;

pub use request::{Caller, SwapRequest};
pub use coordinator::ExchangeCoordinator;
