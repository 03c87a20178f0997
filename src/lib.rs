pub mod epub;

// === 核心API重新导出 ===

/// 发布物（主要接口）
pub use epub::{Manifestation, Publication};

/// 书籍门面
pub use epub::{Book, CoverImage, TocEntry};

/// 解析选项
pub use epub::{ParsingFeature, ParsingOption, ParsingOptions};

/// 错误处理
pub use epub::{EpubError, Result};

// === 对象图组件（高级用法） ===

/// 资源与混淆
pub use epub::{Asset, AssetSource, Obfuscation, ObfuscationAlgorithm};

/// 容器组件
pub use epub::{Container, Rendition, RenditionMapping, PublicationMetadata, Encryption};

/// OPF组件
pub use epub::{ManifestItem, Metadatum, OpfPackage, PackageDocument};

/// 导航组件
pub use epub::{MoDocument, NavDocument, NcxToc, Toc};

// === 库信息 ===

/// 库的版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库的描述
pub const DESCRIPTION: &str = "一个将EPUB容器解析为可查询对象图的Rust库";

// === 便捷函数 ===

/// 使用默认解析选项打开EPUB文件或解压目录
///
/// 这是 `Publication::open` 的便捷包装函数。
///
/// # 参数
/// * `path` - EPUB文件或解压目录的路径
///
/// # 返回值
/// * `Result<Publication>` - 解析完成的发布物
///
/// # 示例
///
/// ```no_run
/// let publication = epubgraph::open("book.epub")?;
/// println!("唯一标识符: {:?}", publication.unique_identifier());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Publication> {
    Publication::open(path, ParsingOptions::default())
}
