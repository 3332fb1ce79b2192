//! 临时文件 - 基础设施层
//!
//! 上传的二进制内容只在一次引擎调用期间落盘，
//! 无论成功、失败、panic 还是 future 被丢弃，文件都会被删除

use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{AppResult, FileError};
use crate::models::request::{media_type_for, FileHandle, Upload};

/// 作用域临时文件
///
/// 持有期间文件存在；`release()` 或 Drop 时删除
pub struct ScopedTempFile {
    file: Option<NamedTempFile>,
    path: PathBuf,
    media_type: &'static str,
}

impl ScopedTempFile {
    /// 把上传内容写入临时文件
    ///
    /// # 参数
    /// - `dir`: 临时目录，None 时使用系统临时目录
    /// - `upload`: 上传内容
    pub fn stage(dir: Option<&Path>, upload: &Upload) -> AppResult<Self> {
        let extension = upload.extension().unwrap_or_default();
        let suffix = if extension.is_empty() {
            String::new()
        } else {
            format!(".{}", extension)
        };

        let mut builder = tempfile::Builder::new();
        builder.prefix("upload-").suffix(&suffix);
        let created = match dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };

        let stage_failed = |source| FileError::StageFailed {
            file_name: upload.file_name.clone(),
            source,
        };

        let mut file = created.map_err(stage_failed)?;
        file.write_all(&upload.bytes).map_err(stage_failed)?;
        file.flush().map_err(stage_failed)?;

        let path = file.path().to_path_buf();
        debug!("📎 临时文件已写入: {} ({} 字节)", path.display(), upload.bytes.len());

        Ok(Self {
            file: Some(file),
            path,
            media_type: media_type_for(&extension).unwrap_or("application/octet-stream"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 交给引擎的文件句柄
    pub fn handle(&self) -> FileHandle {
        FileHandle {
            path: self.path.clone(),
            media_type: self.media_type,
        }
    }

    /// 立即删除文件；删除失败只记录日志
    pub fn release(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if let Some(file) = self.file.take() {
            match file.close() {
                Ok(()) => debug!("🧹 临时文件已删除: {}", self.path.display()),
                Err(e) => warn!("⚠️ 删除临时文件失败 {}: {}", self.path.display(), e),
            }
        }
    }
}

impl Drop for ScopedTempFile {
    fn drop(&mut self) {
        self.remove();
    }
}

/// 在临时文件存在期间执行一次调用
///
/// # 参数
/// - `dir`: 临时目录
/// - `upload`: 上传内容
/// - `call`: 使用文件句柄的调用
///
/// # 返回
/// 返回调用结果；返回前文件已被删除
pub async fn with_staged_upload<F, Fut, T>(
    dir: Option<&Path>,
    upload: &Upload,
    call: F,
) -> AppResult<T>
where
    F: FnOnce(FileHandle) -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let staged = ScopedTempFile::stage(dir, upload)?;
    let result = call(staged.handle()).await;
    staged.release();
    result
}
