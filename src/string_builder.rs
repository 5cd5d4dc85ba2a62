//! 按源偏移拼接输出：未改动的源片段原样拷贝，只替换占位符所在的区间。

use crate::scanner::Span;

#[derive(Debug)]
pub(crate) struct Splicer<'a> {
    src: &'a str,
    buf: String,
    /// 下一个尚未拷贝的源偏移。
    copied: usize,
}

impl<'a> Splicer<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self {
            src,
            buf: String::with_capacity(src.len() + 16),
            copied: 0,
        }
    }

    /// 拷贝 `span` 之前的源片段，并跳过 `span` 本身。调用方负责写入替换内容。
    pub(crate) fn replace(&mut self, span: Span) -> &mut String {
        self.buf.push_str(&self.src[self.copied..span.start]);
        self.copied = span.end;
        &mut self.buf
    }

    pub(crate) fn finish(mut self) -> String {
        self.buf.push_str(&self.src[self.copied..]);
        self.buf
    }
}
