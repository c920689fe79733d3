//! Datagram acquisition: socket lifecycle, background receive loop and
//! frame decoding.

pub mod bind_error;
pub mod client_error;
pub mod client_event;
pub mod endpoint;
pub mod frame_parser;
pub mod lifecycle_error;
pub mod parse_error;
pub mod read_error;
pub mod receiver;
pub mod receiver_config;
pub mod receiver_state;
pub mod receiver_stats;
mod receiver_worker;
pub mod sample;
pub mod sample_handler;
pub mod sensor_client;
pub mod start_error;

pub use bind_error::BindError;
pub use client_error::ClientError;
pub use client_event::ClientEvent;
pub use endpoint::Endpoint;
pub use frame_parser::{parse, parse_datagram};
pub use lifecycle_error::{ClientOp, LifecycleError};
pub use parse_error::ParseError;
pub use read_error::ReadError;
pub use receiver::Receiver;
pub use receiver_config::ReceiverConfig;
pub use receiver_state::ReceiverState;
pub use receiver_stats::StatsSnapshot;
pub use sample::{CHANNEL_COUNT, Sample};
pub use sample_handler::{ChannelSampleHandler, SampleHandler};
pub use sensor_client::SensorClient;
pub use start_error::StartError;
