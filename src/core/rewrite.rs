//! # Code Rewriting Module / 代码重写模块
//!
//! Textual transformation of code cells: ordered find/replace rules over
//! the whole document, and inlining of `%run` references so that later
//! rewrites also apply to code that originated in an external document.
//!
//! Rules are literal pattern/replacement pairs by design; rule authors are
//! responsible for avoiding partial or ambiguous matches. No structural
//! parsing of the cell source is attempted.
//!
//! 代码单元格的文本转换：对整个文档按顺序应用查找/替换规则，
//! 并内联 `%run` 引用，使后续重写也能作用于源自外部文档的代码。
//!
//! 规则在设计上就是字面的模式/替换对；规则作者负责避免部分或歧义匹配。
//! 不对单元格源码做任何结构化解析。

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::core::document::Document;

/// Matches a "run external document" directive inside a code cell, capturing
/// the full directive text and the referenced relative path.
static RUN_DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(%run\s*["']?([^"'\n]+\.ipynb)["']?)"#).unwrap());

/// A single find/replace rule. The pattern is compiled eagerly: an invalid
/// pattern is a configuration error, fatal to the whole run, because a bad
/// rule would otherwise silently corrupt every document in the batch.
///
/// 单个查找/替换规则。模式被立即编译：无效模式是配置错误，
/// 对整个运行是致命的，因为坏规则否则会悄悄破坏批次中的每个文档。
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pattern: Regex,
    replacement: String,
}

impl RewriteRule {
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .with_context(|| format!("Invalid rewrite pattern: {}", pattern))?;
        Ok(Self {
            pattern,
            replacement: replacement.into(),
        })
    }
}

/// Applies an ordered set of rewrite rules to every code cell. Each rule is
/// applied across the whole document before the next rule begins, replacing
/// all non-overlapping matches left to right; capture groups are available
/// to the replacement as `${n}`. Rule order is load-bearing: each rule sees
/// the previous rule's output.
///
/// 将一组有序的重写规则应用到每个代码单元格。每条规则在下一条规则开始前
/// 作用于整个文档，从左到右替换所有不重叠的匹配；捕获组以 `${n}` 形式
/// 提供给替换文本。规则顺序是有语义的：每条规则看到的是上一条规则的输出。
#[derive(Debug, Clone, Default)]
pub struct PatternRewriter {
    rules: Vec<RewriteRule>,
}

impl PatternRewriter {
    pub fn new(rules: Vec<RewriteRule>) -> Self {
        Self { rules }
    }

    /// Compiles an ordered list of pattern/replacement pairs. Fails on the
    /// first invalid pattern.
    pub fn compile<P, R>(pairs: &[(P, R)]) -> Result<Self>
    where
        P: AsRef<str>,
        R: AsRef<str>,
    {
        let rules = pairs
            .iter()
            .map(|(pattern, replacement)| {
                RewriteRule::new(pattern.as_ref(), replacement.as_ref())
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(rules))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Applies every rule, in declared order, to the document's code cells.
    pub fn apply(&self, document: &mut Document) {
        for rule in &self.rules {
            for source in document.code_sources_mut() {
                let rewritten = rule
                    .pattern
                    .replace_all(source, rule.replacement.as_str())
                    .into_owned();
                *source = rewritten;
            }
        }
    }
}

/// Replaces `%run other.ipynb` directives with the referenced document's
/// translated source, so that parameter injection and pattern rewriting also
/// reach code that lives in external documents. Must run before the injector
/// and the rewriter. A missing referenced document is a propagated read
/// error, fatal to this document's processing.
///
/// 将 `%run other.ipynb` 指令替换为被引用文档翻译后的源码，
/// 使参数注入和模式重写也能触及存放在外部文档中的代码。
/// 必须在注入器和重写器之前运行。缺失的被引用文档是一个传播的读取错误，
/// 对该文档的处理是致命的。
#[derive(Debug, Clone)]
pub struct ReferenceInliner {
    base_dir: PathBuf,
}

impl ReferenceInliner {
    /// `base_dir` is the directory the directives' relative paths resolve
    /// against, normally the document's own directory.
    pub fn new(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
        }
    }

    /// Scans every code cell and inlines each referenced document in place.
    pub fn inline(&self, document: &mut Document) -> Result<()> {
        for source in document.code_sources_mut() {
            let references: Vec<(String, String)> = RUN_DIRECTIVE
                .captures_iter(source)
                .map(|captures| (captures[1].to_string(), captures[2].to_string()))
                .collect();

            for (directive, relative_path) in references {
                let referenced_path = self.base_dir.join(&relative_path);
                let referenced = Document::load(&referenced_path).with_context(|| {
                    format!("Failed to inline referenced document: {}", relative_path)
                })?;
                // Wrapping in newlines keeps the spliced source valid when the
                // directive shares a cell with other statements.
                let script = format!("\n{}\n", referenced.to_script());
                *source = source.replace(&directive, &script);
            }
        }
        Ok(())
    }
}
