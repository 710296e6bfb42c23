pub mod dispatcher;
pub mod forwarding;
pub mod transport;

pub use dispatcher::TransportDispatcher;
