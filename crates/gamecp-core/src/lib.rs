//! GameCP 扩展工具链核心库（与打包工具/命令行无关）。
//!
//! 功能：
//! - 定义扩展清单（gamecp.json）的类型模型与权限枚举
//! - 提供清单校验（错误/警告一次性收集，不短路）
//! - 提供清单文件读写、版本号递增、完整性摘要（SRI）计算
//! - 提供扩展目录内的统一路径约定（dist/release/压缩包命名）
//!
//! 作者：GameCP 扩展工具组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

pub mod integrity;
pub mod manifest;
pub mod manifest_file;
pub mod paths;
pub mod validate;
pub mod version;

pub use manifest::{ExtensionManifest, Permission};
pub use manifest_file::ManifestError;
pub use validate::{is_valid_manifest, parse_manifest, validate_manifest, ValidationResult};
pub use version::{BumpKind, VersionError};
