//! NCX（Navigation Control file for XML）文件解析模块
//!
//! 此模块提供EPUB文件中NCX导航控制文件的解析功能，包括导航地图、页面列表等信息的提取。
//! NCX文件是EPUB 2的目录，EPUB 3中由导航文档取代但仍常见。

pub mod navigation;
pub mod parser;

pub use navigation::{NcxTocNode, PageList, PageTarget};
pub use parser::NcxToc;
