//! 命名空间与固定路径
//!
//! EPUB各类文档使用的XML命名空间URI，以及容器内约定位置的文件路径。

/// OPF包文档命名空间
pub const OPF: &str = "http://www.idpf.org/2007/opf";
/// Dublin Core元素命名空间
pub const DC: &str = "http://purl.org/dc/elements/1.1/";
/// OCF容器命名空间
pub const CONTAINER: &str = "urn:oasis:names:tc:opendocument:xmlns:container";
/// XML加密命名空间
pub const ENC: &str = "http://www.w3.org/2001/04/xmlenc#";
/// XML数字签名命名空间
pub const DS: &str = "http://www.w3.org/2000/09/xmldsig#";
/// EPUB结构语义命名空间（epub:type等）
pub const EPUB: &str = "http://www.idpf.org/2007/ops";
pub const NCX: &str = "http://www.daisy.org/z3986/2005/ncx/";
pub const SMIL: &str = "http://www.w3.org/ns/SMIL";
pub const XHTML: &str = "http://www.w3.org/1999/xhtml";
/// `xml:`前缀固定绑定的命名空间
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
/// 多渲染版本属性命名空间
pub const RENDITION: &str = "http://www.idpf.org/2013/rendition";
/// 跨渲染版本元数据命名空间
pub const METADATA: &str = "http://www.idpf.org/2013/metadata";

/// mimetype文件路径
pub const MIMETYPE_PATH: &str = "mimetype";
/// 容器描述文件路径
pub const CONTAINER_PATH: &str = "META-INF/container.xml";
/// 跨渲染版本元数据文件路径
pub const METADATA_PATH: &str = "META-INF/metadata.xml";
/// 加密信息文件路径
pub const ENCRYPTION_PATH: &str = "META-INF/encryption.xml";
