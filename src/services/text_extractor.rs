//! PDF 文本提取 - 业务能力层
//!
//! 只负责"PDF 字节 → 文本"能力，按页序拼接，页与页之间用换行分隔。
//! 没有 OCR 兜底：扫描件直接报错。

use crate::error::ExtractionError;
use lopdf::Document;
use tracing::debug;

/// 从 PDF 字节流中提取全部文本
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let document =
        Document::load_mem(bytes).map_err(|source| ExtractionError::OpenFailed { source })?;

    let pages = document.get_pages();
    if pages.is_empty() {
        return Err(ExtractionError::NoPages);
    }

    // get_pages 返回 BTreeMap，键即页码，天然有序
    let mut page_texts = Vec::with_capacity(pages.len());
    for page_number in pages.keys().copied() {
        let text = document
            .extract_text(&[page_number])
            .map_err(|source| ExtractionError::PageFailed {
                page: page_number,
                source,
            })?;
        debug!("第 {} 页提取到 {} 个字符", page_number, text.len());
        page_texts.push(text);
    }

    let full_text = page_texts.join("\n");
    if full_text.trim().is_empty() {
        return Err(ExtractionError::EmptyText);
    }

    Ok(full_text)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// 生成每页包含若干行文本的最小 PDF
    pub(crate) fn build_pdf(pages: &[&[&str]]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for lines in pages {
            // 每行一个文本对象，提取时每行以换行结束
            let mut operations = Vec::new();
            for (i, line) in lines.iter().enumerate() {
                let y = 780 - 14 * i as i64;
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
                operations.push(Operation::new("Td", vec![50.into(), y.into()]));
                operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
                operations.push(Operation::new("ET", vec![]));
            }

            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn test_extract_text_keeps_page_order() {
        let pdf = build_pdf(&[&["FIRST PAGE"], &["SECOND PAGE"]]);

        let text = extract_text(&pdf).unwrap();
        let first = text.find("FIRST PAGE").expect("first page text");
        let second = text.find("SECOND PAGE").expect("second page text");
        assert!(first < second);
    }

    #[test]
    fn test_corrupt_bytes_fail_to_open() {
        let result = extract_text(b"this is not a pdf");
        assert!(matches!(
            result,
            Err(ExtractionError::OpenFailed { .. } | ExtractionError::NoPages)
        ));
    }

    #[test]
    fn test_image_only_pdf_has_no_text() {
        let pdf = build_pdf(&[&[]]);
        let result = extract_text(&pdf);
        assert!(matches!(result, Err(ExtractionError::EmptyText)));
    }
}
