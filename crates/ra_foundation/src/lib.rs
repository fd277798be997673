// crates/ra_foundation/src/lib.rs

//! River Architect Foundation Layer
//!
//! 基础层，提供整个项目共享的错误类型。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型 `RaError` 与输入校验错误 `InputError`
//!
//! # 示例
//!
//! ```
//! use ra_foundation::{InputError, RaError, RaResult};
//!
//! fn check(depth: usize, velocity: usize) -> RaResult<()> {
//!     if depth != velocity {
//!         return Err(InputError::LengthMismatch { depth, velocity }.into());
//!     }
//!     Ok(())
//! }
//!
//! assert!(matches!(check(2, 3), Err(RaError::Input(_))));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;

// 重导出常用类型
pub use error::{InputError, RaError, RaResult};
