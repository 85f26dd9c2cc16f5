pub mod flow;
pub mod transport;

pub use flow::{FlowPhase, FlowState, VerificationFlow};
pub use transport::{HttpTransport, VerifyTransport};
