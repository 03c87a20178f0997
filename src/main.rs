use std::fs;
use std::path::PathBuf;

use clap::Parser;
use epubgraph::{
    Book, EpubError, ParsingOption, ParsingOptions, Publication, Result, Toc, TocEntry,
};
use tracing_subscriber::EnvFilter;

/// 📚 epubgraph - EPUB对象图查看工具
#[derive(Parser)]
#[command(name = "epubgraph")]
#[command(about = "把EPUB文件或解压目录解析为对象图并显示")]
#[command(version)]
struct Args {
    /// EPUB文件或解压目录路径
    #[arg(help = "要解析的EPUB文件或解压目录")]
    path: PathBuf,

    /// 解析选项，可重复
    #[arg(short, long = "option", value_name = "FLAG", help = "解析选项，例如 NO_NCX、NO_ENCRYPTION（可重复）")]
    options: Vec<ParsingOption>,

    /// YAML选项文件
    #[arg(short, long, value_name = "FILE", help = "从YAML文件加载解析选项")]
    config: Option<PathBuf>,

    /// 显示目录树
    #[arg(short, long, help = "显示目录树")]
    toc: bool,

    /// 显示阅读顺序
    #[arg(short, long, help = "显示脊柱（阅读顺序）")]
    spine: bool,

    /// 显示资源列表
    #[arg(short, long, help = "显示所有已注册的资源")]
    assets: bool,

    /// 导出资源
    #[arg(short, long, value_name = "INTERNAL_PATH", requires = "output", help = "导出指定内部路径的资源（已去混淆）")]
    extract: Option<String>,

    /// 导出目标文件
    #[arg(long, value_name = "FILE", help = "--extract的输出文件")]
    output: Option<PathBuf>,

    /// 详细输出模式
    #[arg(short, long, help = "显示调试日志")]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("❌ 错误: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_options(args: &Args) -> Result<ParsingOptions> {
    let base = match &args.config {
        Some(path) => ParsingOptions::from_file(path)?,
        None => ParsingOptions::default(),
    };
    Ok(args
        .options
        .iter()
        .fold(base, |options, option| options.with(*option)))
}

fn run(args: &Args) -> Result<()> {
    let options = load_options(args)?;
    let publication = Publication::open(&args.path, options)?;
    let book = Book::from_publication(publication);

    display_summary(&book);

    if args.toc {
        display_toc(&book);
    }
    if args.spine {
        display_spine(&book);
    }
    if args.assets {
        display_assets(book.publication());
    }
    if let (Some(internal_path), Some(output)) = (&args.extract, &args.output) {
        let contents = book
            .asset_contents(internal_path)
            .ok_or_else(|| EpubError::MissingDocument(internal_path.clone()))?;
        fs::write(output, &contents)?;
        println!("\n💾 已导出 {} ({} 字节) -> {}", internal_path, contents.len(), output.display());
    }

    Ok(())
}

fn display_summary(book: &Book) {
    let publication = book.publication();
    println!("📚 {}", book.title().unwrap_or("未知标题"));
    println!("  形式: {:?}", publication.manifestation());
    if let Some(size) = publication.size() {
        println!("  大小: {} 字节", size);
    }
    if let Some(version) = publication.version() {
        println!("  EPUB版本: {}", version);
    }
    if let Some(identifier) = publication.unique_identifier() {
        println!("  唯一标识符: {}", identifier);
    }
    if let Some(release_identifier) = publication.release_identifier() {
        println!("  发行标识符: {}", release_identifier);
    }
    let authors = book.authors();
    if !authors.is_empty() {
        println!("  作者: {}", authors.join(", "));
    }
    if let Some(language) = book.language() {
        println!("  语言: {}", language);
    }
    if let Some(cover) = publication.internal_path_cover_image() {
        println!("  封面: {}", cover);
    }

    if let Some(container) = publication.container() {
        println!("\n📦 渲染版本: {} 个", container.renditions.len());
        for (i, rendition) in container.renditions.iter().enumerate() {
            let mut line = format!("  {}. {} ({})", i + 1, rendition.full_path, rendition.media_type);
            if let Some(label) = &rendition.label {
                line.push_str(&format!(" [{}]", label));
            }
            if let Some(layout) = &rendition.layout {
                line.push_str(&format!(" [布局: {}]", layout));
            }
            let toc = match rendition.toc() {
                Some(Toc::Nav(_)) => "导航文档",
                Some(Toc::Ncx(_)) => "NCX",
                None => "无",
            };
            line.push_str(&format!(" 目录: {}, 媒体叠加: {} 个", toc, rendition.mo_documents.len()));
            println!("{}", line);
        }
    }

    if let Some(encryption) = publication.encryption() {
        println!(
            "\n🔐 混淆资源: Adobe {} 个, IDPF {} 个",
            encryption.adobe_obfuscated_assets().len(),
            encryption.idpf_obfuscated_assets().len()
        );
    }
}

fn display_toc(book: &Book) {
    let toc = book.toc();
    let total: usize = toc.iter().map(TocEntry::count).sum();
    println!("\n🌳 目录树 (共 {} 项):", total);
    for (i, entry) in toc.iter().enumerate() {
        print_entry(entry, "", i + 1 == toc.len());
    }
}

fn print_entry(entry: &TocEntry, prefix: &str, last: bool) {
    let branch = if last { "└── " } else { "├── " };
    match &entry.href {
        Some(href) => println!("{}{}{} ({})", prefix, branch, entry.label, href),
        None => println!("{}{}{}", prefix, branch, entry.label),
    }
    let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
    for (i, child) in entry.children.iter().enumerate() {
        print_entry(child, &child_prefix, i + 1 == entry.children.len());
    }
}

fn display_spine(book: &Book) {
    let spine = book.spine();
    let linear = book.linear_spine();
    println!("\n📖 阅读顺序 ({} 项, 线性 {} 项):", spine.len(), linear.len());
    for (i, internal_path) in spine.iter().enumerate() {
        let marker = if linear.contains(internal_path) { "" } else { " [非线性]" };
        println!("  {}. {}{}", i + 1, internal_path, marker);
    }
}

fn display_assets(publication: &Publication) {
    println!("\n📁 资源:");
    for asset in publication.assets() {
        match asset.obfuscation() {
            Some(obfuscation) => println!("  {} [混淆: {}]", asset.internal_path(), obfuscation.algorithm),
            None => println!("  {}", asset.internal_path()),
        }
    }
}
