//! 内部路径解析
//!
//! 内部路径是相对于容器根目录、以`/`分隔的路径，是所有交叉引用的统一标识。

/// 规范化内部路径：去掉空段和`.`段，折叠`..`段
///
/// 无法折叠的前导`..`会保留；结果为空时返回`.`。
pub fn normalize(path: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match stack.last() {
                Some(&last) if last != ".." => {
                    stack.pop();
                }
                _ => stack.push(".."),
            },
            other => stack.push(other),
        }
    }

    if stack.is_empty() {
        ".".to_string()
    } else {
        stack.join("/")
    }
}

/// 返回路径中最后一个`/`之前的部分（没有`/`时为空串）
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(index) => &path[..index],
        None => "",
    }
}

/// 用目标路径替换基准路径的最后一段，再规范化
///
/// 以`/`开头的目标视为相对于容器根目录。
///
/// # 参数
/// * `base` - 基准文件的内部路径（例如OPF文件路径）
/// * `target` - 相对于基准文件的路径（例如清单项的href）
///
/// # 返回值
/// * `String` - 目标的内部路径
pub fn norm_join_parent(base: &str, target: &str) -> String {
    if let Some(rooted) = target.strip_prefix('/') {
        return normalize(rooted);
    }
    let directory = parent(base);
    if directory.is_empty() {
        normalize(target)
    } else {
        normalize(&format!("{}/{}", directory, target))
    }
}

/// 在第一个`#`处拆分引用，返回(文件部分, 片段标识符)
pub fn split_reference(reference: &str) -> (&str, Option<&str>) {
    match reference.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (reference, None),
    }
}
