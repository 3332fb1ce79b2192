//! 基础设施层
//!
//! 持有稀缺资源（临时文件、客户端缓存），只暴露能力，不认识表单和题目

pub mod client_cache;
pub mod temp_file;

pub use client_cache::{ClientCache, ClientKey};
pub use temp_file::{with_staged_upload, ScopedTempFile};
