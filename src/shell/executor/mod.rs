mod builtin;
#[allow(clippy::module_inception)]
mod executor;
mod redirect;
mod status;
mod wait;

pub use executor::Executor;
pub use status::ExitStatus;
