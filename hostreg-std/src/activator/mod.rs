//! Activator implementations.

pub mod binding;
pub mod recording;

pub use binding::BindingActivator;
pub use recording::RecordingBinder;
