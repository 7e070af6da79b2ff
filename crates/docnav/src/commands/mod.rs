//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod redirects;

pub(crate) use build::BuildArgs;
pub(crate) use redirects::RedirectsArgs;
