use std::io::Write;

use chrono::Local;
use flate2::{Compression, write::ZlibEncoder};
use image::RgbImage;

use crate::error::ExportError;

const HEADER: &[u8] = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n";
const MARGIN: f32 = 18.0;

/// A single-page document with a text panel on the left and an image panel
/// on the right, each `panel_size` points square.
pub struct PageLayout<'a> {
    pub lines: &'a [String],
    pub image: &'a RgbImage,
    pub panel_size: f32,
    pub font_size: f32,
}

/// Serializes `layout` to PDF bytes.
pub fn render(layout: &PageLayout<'_>) -> Result<Vec<u8>, ExportError> {
    let page_width = layout.panel_size * 2.0;
    let page_height = layout.panel_size;
    let (image_width, image_height) = layout.image.dimensions();

    let pixels = deflate(layout.image.as_raw())?;
    let content = page_content(layout);

    let mut writer = PdfWriter::new();
    writer.object(b"<< /Type /Catalog /Pages 2 0 R >>");
    writer.object(b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>");
    writer.object(
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /F1 4 0 R >> /XObject << /Im1 5 0 R >> >> \
             /Contents 6 0 R >>",
            number(page_width),
            number(page_height)
        )
        .as_bytes(),
    );
    writer.object(
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    );
    writer.stream(
        &format!(
            "/Type /XObject /Subtype /Image /Width {} /Height {} \
             /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /FlateDecode",
            image_width, image_height
        ),
        &pixels,
    );
    writer.stream("", content.as_bytes());
    writer.object(
        format!(
            "<< /Producer (pixelwolf {}) /CreationDate (D:{}) >>",
            env!("CARGO_PKG_VERSION"),
            Local::now().format("%Y%m%d%H%M%S")
        )
        .as_bytes(),
    );

    Ok(writer.finish(7))
}

fn page_content(layout: &PageLayout<'_>) -> String {
    let leading = layout.font_size * 1.6;
    let mut content = format!(
        "BT\n/F1 {} Tf\n{} TL\n{} {} Td\n",
        number(layout.font_size),
        number(leading),
        number(MARGIN),
        number(layout.panel_size - MARGIN - layout.font_size)
    );
    for line in layout.lines {
        content.push_str(&format!("({}) Tj\nT*\n", escape(line)));
    }
    content.push_str("ET\n");

    // Fit the image into the right panel, keeping its aspect ratio.
    let (width, height) = layout.image.dimensions();
    let available = layout.panel_size - 2.0 * MARGIN;
    let scale = available / width.max(height).max(1) as f32;
    let drawn_width = width as f32 * scale;
    let drawn_height = height as f32 * scale;
    let x = layout.panel_size + MARGIN + (available - drawn_width) / 2.0;
    let y = MARGIN + (available - drawn_height) / 2.0;
    content.push_str(&format!(
        "q\n{} 0 0 {} {} {} cm\n/Im1 Do\nQ\n",
        number(drawn_width),
        number(drawn_height),
        number(x),
        number(y)
    ));
    content
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, ExportError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).map_err(ExportError::Compression)?;
    encoder.finish().map_err(ExportError::Compression)
}

fn number(value: f32) -> String {
    format!("{:.2}", value)
}

// Literal strings only need the delimiters and backslash escaped; anything
// outside printable ASCII is replaced since the font is not embedded.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            ' '..='~' => escaped.push(c),
            _ => escaped.push('?'),
        }
    }
    escaped
}

/// Appends numbered objects and tracks their byte offsets for the xref table.
struct PdfWriter {
    buffer: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new() -> Self {
        Self {
            buffer: HEADER.to_vec(),
            offsets: Vec::new(),
        }
    }

    fn object(&mut self, body: &[u8]) {
        self.begin();
        self.buffer.extend_from_slice(body);
        self.buffer.extend_from_slice(b"\nendobj\n");
    }

    fn stream(&mut self, dictionary: &str, data: &[u8]) {
        self.begin();
        self.buffer.extend_from_slice(
            format!("<< {} /Length {} >>\nstream\n", dictionary, data.len()).as_bytes(),
        );
        self.buffer.extend_from_slice(data);
        self.buffer.extend_from_slice(b"\nendstream\nendobj\n");
    }

    fn begin(&mut self) {
        self.offsets.push(self.buffer.len());
        let id = self.offsets.len();
        self.buffer.extend_from_slice(format!("{} 0 obj\n", id).as_bytes());
    }

    fn finish(mut self, info: usize) -> Vec<u8> {
        let xref = self.buffer.len();
        let size = self.offsets.len() + 1;
        let mut table = format!("xref\n0 {}\n0000000000 65535 f \n", size);
        for offset in &self.offsets {
            table.push_str(&format!("{:010} 00000 n \n", offset));
        }
        table.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            size, info, xref
        ));
        self.buffer.extend_from_slice(table.as_bytes());
        self.buffer
    }
}
