mod compare;
mod export;
mod status;

pub use compare::*;
pub use export::*;
pub use status::*;

use crate::config::Opts;

pub trait SubCommandExtend {
    fn run(&self, opts: &Opts) -> impl std::future::Future<Output = anyhow::Result<()>> + Send;
}
