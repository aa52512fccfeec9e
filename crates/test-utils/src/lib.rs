use async_trait::async_trait;
use docforge::{
    errors::TemplateError, extract::Extractor, providers::ai::AiProvider, types::ModelRequest,
    UploadedFile,
};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

// --- Mock AI Provider ---

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    responses: Arc<Mutex<HashMap<String, String>>>,
    failure: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<Vec<ModelRequest>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            failure: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pre-programs a response for a specific prompt.
    /// The key should be a unique substring of the prompt.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(key.to_string(), response.to_string());
    }

    /// Makes every subsequent call fail with `ModelCallFailed(message)`.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    /// Retrieves the recorded calls for assertion.
    pub fn get_calls(&self) -> Vec<ModelRequest> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(&self, request: &ModelRequest) -> Result<String, TemplateError> {
        self.calls.lock().unwrap().push(request.clone());

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(TemplateError::ModelCallFailed(message));
        }

        let responses = self.responses.lock().unwrap();
        for (key, response) in responses.iter() {
            if request.prompt.contains(key) {
                return Ok(response.clone());
            }
        }

        Err(TemplateError::ModelCallFailed(format!(
            "MockAiProvider: No response programmed for prompt. Got: '{}'",
            request.prompt
        )))
    }
}

// --- Mock Extractor ---

/// An extractor that returns the file's bytes as UTF-8 text after an optional delay.
///
/// A file whose content is exactly `FAIL` fails with `ExtractionFailed`.
#[derive(Clone, Debug, Default)]
pub struct MockExtractor {
    delay_per_byte: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleeps proportionally to the file size, so larger files finish later.
    pub fn with_delay_per_byte(mut self, delay: Duration) -> Self {
        self.delay_per_byte = Some(delay);
        self
    }

    /// A handle on the number of `extract` invocations.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    async fn extract(&self, file: &UploadedFile) -> Result<String, TemplateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay_per_byte {
            tokio::time::sleep(delay * file.bytes.len() as u32).await;
        }
        if file.bytes == b"FAIL" {
            return Err(TemplateError::ExtractionFailed(format!(
                "MockExtractor: refused '{}'",
                file.label()
            )));
        }
        Ok(String::from_utf8_lossy(&file.bytes).into_owned())
    }
}

// --- Test-Specific Helpers ---
#[cfg(feature = "pdf")]
pub mod pdf_helpers {
    use anyhow::Result;
    use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

    /// Generates a single-page PDF drawing each line of `lines` with Helvetica.
    pub fn generate_test_pdf(lines: &[&str]) -> Result<Vec<u8>> {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let page_id = Ref::new(3);
        let font_id = Ref::new(4);
        let content_id = Ref::new(5);
        let font_name = Name(b"F1");

        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id).kids([page_id]).count(1);

        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, 595.0, 842.0));
        page.parent(page_tree_id);
        page.contents(content_id);
        page.resources().fonts().pair(font_name, font_id);
        page.finish();

        pdf.type1_font(font_id).base_font(Name(b"Helvetica"));

        let mut content = Content::new();
        content.begin_text();
        content.set_font(font_name, 14.0);
        content.next_line(72.0, 770.0);
        for line in lines {
            content.show(Str(line.as_bytes()));
            content.next_line(0.0, -20.0);
        }
        content.end_text();
        pdf.stream(content_id, &content.finish());

        Ok(pdf.finish())
    }
}

#[cfg(feature = "docx")]
pub mod docx_helpers {
    use anyhow::Result;
    use docx_rs::{Docx, Paragraph, Pic, Run, Table, TableCell, TableRow};
    use std::io::Cursor;

    /// A 1x1 PNG.
    pub const TINY_PNG: &[u8] = &[
        0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d,
        0x49, 0x48, 0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01,
        0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4, 0x89, 0x00, 0x00, 0x00,
        0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0xda, 0x63, 0x64, 0x60, 0xf8, 0x5f,
        0x0f, 0x00, 0x02, 0x87, 0x01, 0x80, 0xeb, 0x47, 0xba, 0x92, 0x00, 0x00,
        0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
    ];

    fn text_paragraph(text: &str) -> Paragraph {
        Paragraph::new().add_run(Run::new().add_text(text))
    }

    /// Builds a DOCX with one paragraph per entry of `paragraphs`, followed by
    /// an optional table whose rows are given as lists of cell texts.
    pub fn generate_test_docx(paragraphs: &[&str], table: Option<&[&[&str]]>) -> Result<Vec<u8>> {
        let mut docx = Docx::new();
        for text in paragraphs {
            docx = docx.add_paragraph(text_paragraph(text));
        }

        if let Some(rows) = table {
            let rows = rows
                .iter()
                .map(|cells| {
                    TableRow::new(
                        cells
                            .iter()
                            .map(|cell| TableCell::new().add_paragraph(text_paragraph(cell)))
                            .collect(),
                    )
                })
                .collect();
            docx = docx.add_table(Table::new(rows));
        }

        pack(docx)
    }

    /// Builds a DOCX with `png` embedded twice: inline after `caption` in a
    /// paragraph, and alone in the first cell of a one-row table whose second
    /// cell holds `cell_text`.
    pub fn generate_test_docx_with_image(
        caption: &str,
        cell_text: &str,
        png: &[u8],
    ) -> Result<Vec<u8>> {
        let picture_run = || Run::new().add_image(Pic::new(png));

        let docx = Docx::new()
            .add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text(caption))
                    .add_run(picture_run()),
            )
            .add_table(Table::new(vec![TableRow::new(vec![
                TableCell::new().add_paragraph(Paragraph::new().add_run(picture_run())),
                TableCell::new().add_paragraph(text_paragraph(cell_text)),
            ])]));

        pack(docx)
    }

    fn pack(docx: Docx) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to pack test DOCX: {e}"))?;
        Ok(buffer.into_inner())
    }
}
