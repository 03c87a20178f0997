pub mod error;
pub mod xml;
pub mod path;
pub mod namespace;
pub mod media_type;
pub mod obfuscation;
pub mod asset;
pub mod opf;
pub mod nav;
pub mod ncx;
pub mod smil;
pub mod mapping;
pub mod metadata;
pub mod encryption;
pub mod container;
pub mod rendition;
pub mod options;
pub mod publication;
pub mod book;

// 重新导出错误处理
pub use error::{EpubError, Result};

// 重新导出资源与混淆
pub use asset::{Asset, AssetSource, Obfuscation};
pub use obfuscation::ObfuscationAlgorithm;

// 重新导出容器与渲染版本
pub use container::Container;
pub use rendition::{Rendition, Toc};
pub use mapping::{MappingLocation, MappingPoint, RenditionMapping};
pub use metadata::PublicationMetadata;
pub use encryption::{EncryptedData, EncryptedKey, Encryption};

// 重新导出OPF相关
pub use opf::{
    Guide,
    GuideReference,
    Itemref,
    Manifest,
    ManifestItem,
    Metadatum,
    OpfMetadata,
    OpfPackage,
    PackageDocument,
    Spine,
};

// 重新导出导航相关
pub use nav::{NavDocument, NavElement, NavNode};
pub use ncx::{NcxToc, NcxTocNode, PageList, PageTarget};
pub use smil::{MoDocument, MoNode};

// 重新导出发布物
pub use options::{ParsingFeature, ParsingOption, ParsingOptions};
pub use publication::{Manifestation, Publication};
pub use book::{Book, CoverImage, TocEntry};
