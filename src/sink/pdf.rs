//! PDF report output.
//!
//! The report is an A4 page with a centered "Reddit Posts" heading and a
//! bordered three-column table beneath it. Rows that do not fit on a page
//! continue on the next one under a repeated header row. Everything is
//! drawn with the standard Helvetica fonts, so no font files are embedded.

use crate::reddit::thing::Post;
use crate::sink::{Sink, WriteError};
use crate::text::{to_latin1, truncate};
use log::{debug, info};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Name of the PDF file written to the output directory.
pub const FILENAME: &str = "reddit_posts.pdf";

/// Titles longer than this many characters are truncated.
pub const TITLE_MAX_CHARS: usize = 50;

/// URLs longer than this many characters are truncated for display. The
/// link itself always points at the full URL.
pub const URL_MAX_CHARS: usize = 40;

const HEADING: &str = "Reddit Posts";
const HEADERS: [&str; 3] = ["Title", "URL", "Score"];

// All layout measurements are in millimetres, measured from the top-left
// corner of the page.
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 10.0;
const BOTTOM_MARGIN: f32 = 20.0;
const CELL_PADDING: f32 = 1.0;
const ROW_HEIGHT: f32 = 10.0;
const HEADING_WIDTH: f32 = 200.0;
const COLUMN_WIDTHS: [f32; 3] = [90.0, 70.0, 30.0];
const LINE_WIDTH: f32 = 0.2;

const HEADING_SIZE: f32 = 16.0;
const TABLE_SIZE: f32 = 10.0;

const PT_PER_MM: f32 = 72.0 / 25.4;

// Helvetica advance widths for ' ' through '~', in thousandths of an em.
// Bold text is measured with the same table.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];
const DEFAULT_WIDTH: u16 = 556;

/// Writes posts to a PDF table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfSink {
    path: PathBuf,
}

impl PdfSink {
    /// Creates a sink that writes to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a sink that writes [`FILENAME`] inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(FILENAME))
    }

    fn pdf_error(&self, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> WriteError {
        WriteError::Pdf {
            path: self.path.clone(),
            source: source.into(),
        }
    }

    fn io_error(&self, source: std::io::Error) -> WriteError {
        WriteError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Sink for PdfSink {
    fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, posts: &[Post]) -> Result<(), WriteError> {
        let pages = Layout::for_posts(posts);
        debug!("laid out {} posts on {} pages", posts.len(), pages.len());
        let mut doc = render(&pages).map_err(|err| self.pdf_error(err))?;

        let file = File::create(&self.path).map_err(|err| self.io_error(err))?;
        let mut writer = BufWriter::new(file);
        doc.save_to(&mut writer)
            .map_err(|err| self.pdf_error(err))?;
        writer.flush().map_err(|err| self.io_error(err))?;

        info!("wrote {} posts to {}", posts.len(), self.path.display());
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource_name(&self) -> &'static [u8] {
        match self {
            Font::Regular => b"F1",
            Font::Bold => b"F2",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Align {
    Left,
    Center,
    Right,
}

/// A rectangle of text on a page, optionally bordered and linked.
#[derive(Clone, Debug, PartialEq)]
struct Cell {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    text: String,
    font: Font,
    size: f32,
    align: Align,
    border: bool,
    link: Option<String>,
}

impl Cell {
    fn text_width(&self) -> f32 {
        let units: u32 = to_latin1(&self.text)
            .into_iter()
            .map(|byte| match byte {
                b' '..=b'~' => HELVETICA_WIDTHS[(byte - b' ') as usize],
                _ => DEFAULT_WIDTH,
            })
            .map(u32::from)
            .sum();
        units as f32 * self.size / 1000.0 / PT_PER_MM
    }

    fn text_x(&self) -> f32 {
        match self.align {
            Align::Left => self.x + CELL_PADDING,
            Align::Center => self.x + (self.width - self.text_width()) / 2.0,
            Align::Right => self.x + self.width - CELL_PADDING - self.text_width(),
        }
    }

    // Vertically centers a line of text in the cell.
    fn baseline(&self) -> f32 {
        self.y + 0.5 * self.height + 0.3 * self.size / PT_PER_MM
    }

    /// The cell's bounds in PDF user space: lower-left x and y, width,
    /// and height, all in points.
    fn rect(&self) -> [f32; 4] {
        [
            self.x * PT_PER_MM,
            (PAGE_HEIGHT - self.y - self.height) * PT_PER_MM,
            self.width * PT_PER_MM,
            self.height * PT_PER_MM,
        ]
    }

    fn operations(&self) -> Vec<Operation> {
        let rect = self.rect().map(real).to_vec();
        let mut ops = vec![
            Operation::new("q", vec![]),
            Operation::new("re", rect.clone()),
            Operation::new("W", vec![]),
            Operation::new("n", vec![]),
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(self.font.resource_name().to_vec()), real(self.size)],
            ),
            Operation::new(
                "Td",
                vec![
                    real(self.text_x() * PT_PER_MM),
                    real((PAGE_HEIGHT - self.baseline()) * PT_PER_MM),
                ],
            ),
            Operation::new(
                "Tj",
                vec![Object::String(to_latin1(&self.text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
        ];
        if self.border {
            ops.push(Operation::new("re", rect));
            ops.push(Operation::new("S", vec![]));
        }
        ops
    }
}

/// The cells drawn on a single page.
#[derive(Debug, Default)]
struct Page {
    cells: Vec<Cell>,
}

impl Page {
    fn links(&self) -> impl Iterator<Item = (&Cell, &str)> {
        self.cells
            .iter()
            .filter_map(|cell| cell.link.as_deref().map(|url| (cell, url)))
    }
}

/// Places cells on pages, top to bottom, breaking pages as they fill up.
#[derive(Debug, Default)]
struct Layout {
    pages: Vec<Page>,
    y: f32,
}

impl Layout {
    fn for_posts(posts: &[Post]) -> Vec<Page> {
        let mut layout = Layout::default();
        layout.add_page();
        layout.heading();
        layout.header_row();
        for post in posts {
            if layout.y + ROW_HEIGHT > PAGE_HEIGHT - BOTTOM_MARGIN {
                layout.add_page();
                layout.header_row();
            }
            layout.post_row(post);
        }
        layout.pages
    }

    fn add_page(&mut self) {
        self.pages.push(Page::default());
        self.y = MARGIN;
    }

    fn heading(&mut self) {
        self.push(Cell {
            x: MARGIN,
            y: self.y,
            width: HEADING_WIDTH,
            height: ROW_HEIGHT,
            text: String::from(HEADING),
            font: Font::Bold,
            size: HEADING_SIZE,
            align: Align::Center,
            border: false,
            link: None,
        });
        self.y += ROW_HEIGHT * 2.0;
    }

    fn header_row(&mut self) {
        self.row(HEADERS.map(|header| (header.to_string(), Align::Left, None)), Font::Bold);
    }

    fn post_row(&mut self, post: &Post) {
        self.row(
            [
                (truncate(post.title(), TITLE_MAX_CHARS).to_string(), Align::Left, None),
                (
                    truncate(post.url(), URL_MAX_CHARS).to_string(),
                    Align::Left,
                    Some(post.url().to_string()),
                ),
                (post.score().to_string(), Align::Right, None),
            ],
            Font::Regular,
        );
    }

    fn row(&mut self, columns: [(String, Align, Option<String>); 3], font: Font) {
        let mut x = MARGIN;
        for ((text, align, link), width) in columns.into_iter().zip(COLUMN_WIDTHS) {
            self.push(Cell {
                x,
                y: self.y,
                width,
                height: ROW_HEIGHT,
                text,
                font,
                size: TABLE_SIZE,
                align,
                border: true,
                link,
            });
            x += width;
        }
        self.y += ROW_HEIGHT;
    }

    fn push(&mut self, cell: Cell) {
        if let Some(page) = self.pages.last_mut() {
            page.cells.push(cell);
        }
    }
}

fn real(value: f32) -> Object {
    Object::Real(value.into())
}

fn font(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn link_annotation(cell: &Cell, url: &str) -> lopdf::Dictionary {
    let [x, y, width, height] = cell.rect();
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => vec![real(x), real(y), real(x + width), real(y + height)],
        "Border" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
        "A" => dictionary! {
            "Type" => "Action",
            "S" => "URI",
            "URI" => Object::string_literal(url),
        },
    }
}

fn render(pages: &[Page]) -> lopdf::Result<Document> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font("Helvetica"));
    let bold_id = doc.add_object(font("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids = Vec::with_capacity(pages.len());
    for page in pages {
        let page_id = render_page(&mut doc, pages_id, page)?;
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                real(PAGE_WIDTH * PT_PER_MM),
                real(PAGE_HEIGHT * PT_PER_MM),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    Ok(doc)
}

fn render_page(doc: &mut Document, pages_id: ObjectId, page: &Page) -> lopdf::Result<ObjectId> {
    let mut operations = vec![Operation::new("w", vec![real(LINE_WIDTH * PT_PER_MM)])];
    operations.extend(page.cells.iter().flat_map(Cell::operations));
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let annots = page
        .links()
        .map(|(cell, url)| Object::Reference(doc.add_object(link_annotation(cell, url))))
        .collect::<Vec<_>>();

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Annots" => annots,
    }))
}
