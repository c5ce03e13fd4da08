//! Message broker implementation and consumer loop

pub mod consumer;
mod database_queue;

pub use consumer::{ConsumerOptions, consume_one, subscribe};
pub use database_queue::DatabaseBroker;
