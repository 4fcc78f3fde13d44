//! Standard observer implementations.
//!
//! - [`ObserverCatalog`]: explicit registration point observers add themselves to
//! - [`LoggingObserver`]: logs every lifecycle event
//! - [`TimeoutObserver`]: bounds another observer's notification time

pub mod catalog;
pub mod logging;
pub mod timeout;

pub use catalog::ObserverCatalog;
pub use logging::LoggingObserver;
pub use timeout::{TimeoutError, TimeoutObserver};
