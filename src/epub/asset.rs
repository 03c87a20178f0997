//! 资源文件
//!
//! 一个[`Asset`]代表容器中的一个逻辑文件，内容在每次访问时从后备存储重新读取。

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::ZipArchive;

use crate::epub::obfuscation::{self, ObfuscationAlgorithm};

/// 资源内容的后备存储
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    /// 内存中的字节
    Memory(Vec<u8>),
    /// 文件系统上的绝对路径
    File(PathBuf),
    /// 根目录加相对路径
    Directory { root: PathBuf, relative: String },
    /// ZIP归档加条目名
    Archive { archive: PathBuf, entry: String },
}

impl AssetSource {
    fn read(&self) -> Option<Vec<u8>> {
        match self {
            AssetSource::Memory(bytes) => Some(bytes.clone()),
            AssetSource::File(path) => read_file(path),
            AssetSource::Directory { root, relative } => read_file(&root.join(relative)),
            AssetSource::Archive { archive, entry } => read_archive_entry(archive, entry),
        }
    }
}

fn read_file(path: &Path) -> Option<Vec<u8>> {
    match fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "无法读取文件");
            None
        }
    }
}

fn read_archive_entry(archive: &Path, entry: &str) -> Option<Vec<u8>> {
    let read = || -> crate::epub::Result<Vec<u8>> {
        let mut zip = ZipArchive::new(File::open(archive)?)?;
        let mut file = zip.by_name(entry)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        Ok(buffer)
    };
    match read() {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            debug!(archive = %archive.display(), entry, error = %e, "无法读取归档条目");
            None
        }
    }
}

/// 资源的混淆标注：算法与密钥（出版物唯一标识符）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Obfuscation {
    pub algorithm: ObfuscationAlgorithm,
    pub key: String,
}

/// 容器中的一个逻辑文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    internal_path: String,
    source: AssetSource,
    obfuscation: Option<Obfuscation>,
}

impl Asset {
    /// 由内存字节创建资源
    pub fn from_bytes(internal_path: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(internal_path.into(), AssetSource::Memory(bytes))
    }

    /// 由文件系统上的绝对路径创建资源
    pub fn from_file(internal_path: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::new(internal_path.into(), AssetSource::File(path.into()))
    }

    /// 由根目录和相对路径创建资源，内部路径即相对路径
    pub fn in_directory(root: impl Into<PathBuf>, relative: impl Into<String>) -> Self {
        let relative = relative.into();
        Self::new(
            relative.clone(),
            AssetSource::Directory {
                root: root.into(),
                relative,
            },
        )
    }

    /// 由ZIP归档和条目名创建资源，内部路径即条目名
    pub fn in_archive(archive: impl Into<PathBuf>, entry: impl Into<String>) -> Self {
        let entry = entry.into();
        Self::new(
            entry.clone(),
            AssetSource::Archive {
                archive: archive.into(),
                entry,
            },
        )
    }

    fn new(internal_path: String, source: AssetSource) -> Self {
        Self {
            internal_path,
            source,
            obfuscation: None,
        }
    }

    /// 返回带混淆标注的资源
    ///
    /// 这是资源创建之后唯一的修改途径，由出版物的加密处理步骤显式调用。
    pub fn with_obfuscation(self, algorithm: ObfuscationAlgorithm, key: impl Into<String>) -> Self {
        Self {
            obfuscation: Some(Obfuscation {
                algorithm,
                key: key.into(),
            }),
            ..self
        }
    }

    pub fn internal_path(&self) -> &str {
        &self.internal_path
    }

    pub fn source(&self) -> &AssetSource {
        &self.source
    }

    pub fn obfuscation(&self) -> Option<&Obfuscation> {
        self.obfuscation.as_ref()
    }

    /// 读取原始字节，不做去混淆
    ///
    /// # 返回值
    /// * `Option<Vec<u8>>` - 文件缺失或不可读时为`None`
    pub fn raw_contents(&self) -> Option<Vec<u8>> {
        self.source.read()
    }

    /// 读取内容，若带混淆标注则返回去混淆后的字节
    ///
    /// # 返回值
    /// * `Option<Vec<u8>>` - 文件缺失或不可读时为`None`
    pub fn contents(&self) -> Option<Vec<u8>> {
        let mut bytes = self.raw_contents()?;
        if let Some(obfuscation) = &self.obfuscation {
            let key = obfuscation.algorithm.derive_key(&obfuscation.key);
            obfuscation::obfuscate_in_place(&mut bytes, &key, obfuscation.algorithm);
        }
        Some(bytes)
    }
}
