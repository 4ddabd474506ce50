pub mod backoff;
pub mod channel;
pub mod socket;
pub mod stomp;

pub use channel::{
    parse_job_event, ChannelLink, ConnectionState, Connector, JobChannel, ReconnectListener,
    Subscription, Topic,
};
pub use socket::WebSocketConnector;
