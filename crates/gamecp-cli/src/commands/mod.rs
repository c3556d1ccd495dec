//! 子命令实现（每个子命令一个模块）。

pub mod build;
pub mod dev;
pub mod init;
pub mod validate;
