mod build;
mod info;
mod init;
mod watch;

pub use build::*;
pub use info::*;
pub use init::*;
pub use watch::*;
