use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EpubError>;

/// Epub相关的错误类型
#[derive(Error, Debug)]
pub enum EpubError {
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),

    #[error("Zip文件错误: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML解析错误: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("路径不存在: {}", .0.display())]
    NotFound(PathBuf),

    #[error("文件不是有效的EPUB格式: {0}")]
    InvalidEpub(String),

    #[error("无法读取必需的文档: {0}")]
    MissingDocument(String),

    #[error("container.xml解析错误: {0}")]
    ContainerParseError(String),

    #[error("OPF文件解析错误: {0}")]
    OpfParseError(String),

    #[error("NCX文件解析错误: {0}")]
    NcxParseError(String),

    #[error("导航文档解析错误: {0}")]
    NavParseError(String),

    #[error("SMIL文件解析错误: {0}")]
    SmilParseError(String),

    #[error("渲染映射文档解析错误: {0}")]
    MappingParseError(String),

    #[error("metadata.xml解析错误: {0}")]
    MetadataParseError(String),

    #[error("encryption.xml解析错误: {0}")]
    EncryptionParseError(String),

    #[error("配置文件错误: {0}")]
    ConfigError(String),
}
