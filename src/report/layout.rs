//! Page layout of the audit report.
//!
//! [`ReportDocument::compose`] places every element of the report on A4
//! landscape pages using a top-down cursor in millimetres. The result is a
//! plain value: pagination is decided here, and the PDF backend only draws
//! what it is given.
//!
//! Coordinates are measured from the top-left corner of the page.

use chrono::{DateTime, Utc};

use crate::config::ReportConfig;
use crate::models::AuditReport;

use super::tables::DetailRow;

/// A4 landscape width.
pub const PAGE_WIDTH_MM: f32 = 297.0;
/// A4 landscape height.
pub const PAGE_HEIGHT_MM: f32 = 210.0;
/// Left and top margin.
pub const MARGIN_MM: f32 = 10.0;
/// Content below this line spills onto a new page.
pub const AUTO_BREAK_MM: f32 = 190.0;

const HEADER_BAND_MM: f32 = 45.0;
const SECTION_HEIGHT_MM: f32 = 10.0;
const TABLE_HEADER_MM: f32 = 10.0;
const RANKING_ROW_MM: f32 = 9.0;
const NAME_LIMIT: usize = 30;

const RANKING_COLUMNS: [(f32, &str); 3] = [
    (20.0, "Rank"),
    (150.0, "Nama Karyawan"),
    (40.0, "Frekuensi Pelanggaran"),
];

const DETAIL_COLUMNS: [(f32, &str); 8] = [
    (10.0, "No"),
    (20.0, "Tanggal"),
    (50.0, "Nama Karyawan"),
    (22.0, "Jam IN"),
    (22.0, "Jam OUT"),
    (22.0, "Jam Aktv"),
    (22.0, "Selisih"),
    (109.0, "Tipe Aktivitas"),
];

/// Colour roles used by the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Header band, section titles, detail table header.
    Primary,
    /// Summary box background.
    Secondary,
    /// Ranking table header.
    Accent,
    /// Body text.
    Ink,
    /// Text on dark fills.
    White,
    /// Footer text.
    Muted,
    /// Alternate detail rows.
    Zebra,
}

impl Tone {
    /// Returns the 8-bit RGB components.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Tone::Primary => (31, 73, 125),
            Tone::Secondary => (242, 242, 242),
            Tone::Accent => (44, 62, 80),
            Tone::Ink => (40, 40, 40),
            Tone::White => (255, 255, 255),
            Tone::Muted => (120, 120, 120),
            Tone::Zebra => (250, 250, 250),
        }
    }
}

/// Font weight or slant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    /// Upright.
    Regular,
    /// Bold.
    Bold,
    /// Oblique.
    Italic,
}

/// Horizontal text alignment inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Flush left with a small inset.
    Left,
    /// Centred.
    Center,
    /// Flush right with a small inset.
    Right,
}

/// How a cell's text and box are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStyle {
    /// Font face.
    pub font: FontStyle,
    /// Font size in points.
    pub size_pt: f32,
    /// Text colour.
    pub text: Tone,
    /// Background fill, if any.
    pub fill: Option<Tone>,
    /// Whether the cell has a border.
    pub border: bool,
    /// Text alignment.
    pub align: Align,
}

impl CellStyle {
    fn plain(font: FontStyle, size_pt: f32, text: Tone, align: Align) -> Self {
        Self {
            font,
            size_pt,
            text,
            fill: None,
            border: false,
            align,
        }
    }

    fn boxed(self, fill: Option<Tone>) -> Self {
        Self {
            fill,
            border: true,
            ..self
        }
    }

    fn aligned(self, align: Align) -> Self {
        Self { align, ..self }
    }
}

/// A text cell placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Left edge.
    pub x_mm: f32,
    /// Top edge.
    pub y_mm: f32,
    /// Width.
    pub width_mm: f32,
    /// Height.
    pub height_mm: f32,
    /// Text content.
    pub text: String,
    /// Drawing style.
    pub style: CellStyle,
}

/// Something drawn on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// A filled rectangle without text.
    Band {
        /// Left edge.
        x_mm: f32,
        /// Top edge.
        y_mm: f32,
        /// Width.
        width_mm: f32,
        /// Height.
        height_mm: f32,
        /// Fill colour.
        tone: Tone,
    },
    /// A text cell.
    Cell(Cell),
}

/// One page of the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Elements in drawing order.
    pub elements: Vec<Element>,
    /// Indices into the report's violation list placed on this page.
    pub detail_rows: Vec<usize>,
}

/// A fully laid out report, ready for a rendering backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    /// Document title metadata.
    pub title: String,
    /// Pages in order. Never empty.
    pub pages: Vec<Page>,
}

struct Composer {
    finished: Vec<Page>,
    current: Page,
    y: f32,
}

impl Composer {
    fn new() -> Self {
        Self {
            finished: Vec::new(),
            current: Page::default(),
            y: MARGIN_MM,
        }
    }

    fn new_page(&mut self) {
        self.finished.push(std::mem::take(&mut self.current));
        self.y = MARGIN_MM;
    }

    fn band(&mut self, x_mm: f32, y_mm: f32, width_mm: f32, height_mm: f32, tone: Tone) {
        self.current.elements.push(Element::Band {
            x_mm,
            y_mm,
            width_mm,
            height_mm,
            tone,
        });
    }

    fn cell(&mut self, x_mm: f32, width_mm: f32, height_mm: f32, text: impl Into<String>, style: CellStyle) {
        self.current.elements.push(Element::Cell(Cell {
            x_mm,
            y_mm: self.y,
            width_mm,
            height_mm,
            text: text.into(),
            style,
        }));
    }

    /// Full-width line of text; advances the cursor.
    fn line(&mut self, height_mm: f32, text: impl Into<String>, style: CellStyle) {
        self.cell(MARGIN_MM, PAGE_WIDTH_MM - 2.0 * MARGIN_MM, height_mm, text, style);
        self.y += height_mm;
    }

    /// A table row left to right from the margin; advances the cursor.
    fn row<S: AsRef<str>>(&mut self, widths: &[f32], texts: &[S], height_mm: f32, styles: &[CellStyle]) {
        let mut x = MARGIN_MM;
        for (i, (width, text)) in widths.iter().zip(texts).enumerate() {
            let style = styles.get(i).or(styles.last()).copied();
            if let Some(style) = style {
                self.cell(x, *width, height_mm, text.as_ref(), style);
            }
            x += width;
        }
        self.y += height_mm;
    }

    fn skip(&mut self, height_mm: f32) {
        self.y += height_mm;
    }

    fn finish(mut self) -> Vec<Page> {
        self.finished.push(self.current);
        self.finished
    }
}

fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

impl ReportDocument {
    /// Lays out the report.
    ///
    /// Page one carries the header band, the executive summary and the top
    /// offenders. The detail table starts on a fresh page; before each detail
    /// row, once the cursor is past `config.page_break_mm`, a new page is
    /// started and the table header repeated. The footer stamps
    /// `generated_at`.
    pub fn compose(report: &AuditReport, config: &ReportConfig, generated_at: DateTime<Utc>) -> Self {
        let mut page = Composer::new();

        Self::header(&mut page, report, config);
        Self::summary(&mut page, report);
        Self::ranking(&mut page, report, config);
        Self::detail(&mut page, report, config);
        Self::footer(&mut page, generated_at);

        Self {
            title: config.title.clone(),
            pages: page.finish(),
        }
    }

    fn header(page: &mut Composer, report: &AuditReport, config: &ReportConfig) {
        page.band(0.0, 0.0, PAGE_WIDTH_MM, HEADER_BAND_MM, Tone::Primary);
        page.line(
            15.0,
            config.title.as_str(),
            CellStyle::plain(FontStyle::Bold, 24.0, Tone::White, Align::Center),
        );
        page.line(
            5.0,
            config.subtitle.as_str(),
            CellStyle::plain(FontStyle::Bold, 12.0, Tone::White, Align::Center),
        );
        page.line(
            10.0,
            format!("Periode Pemeriksaan: {}", report.period.label()),
            CellStyle::plain(FontStyle::Regular, 10.0, Tone::White, Align::Center),
        );
        page.skip(22.0);
    }

    fn section_title(page: &mut Composer, title: &str) {
        page.line(
            SECTION_HEIGHT_MM,
            title,
            CellStyle::plain(FontStyle::Bold, 14.0, Tone::Primary, Align::Left),
        );
    }

    fn summary(page: &mut Composer, report: &AuditReport) {
        Self::section_title(page, "I. RINGKASAN EKSEKUTIF");
        page.band(MARGIN_MM, page.y, 50.0, 0.4, Tone::Primary);
        page.skip(5.0);

        let style = CellStyle::plain(FontStyle::Bold, 11.0, Tone::Ink, Align::Left)
            .boxed(Some(Tone::Secondary));
        page.cell(
            MARGIN_MM,
            80.0,
            20.0,
            format!(
                "Total Pelanggaran Aktivitas : {} Kasus",
                report.summary.total_violations
            ),
            style,
        );
        page.cell(
            MARGIN_MM + 90.0,
            80.0,
            20.0,
            format!(
                "Total Personel Terlibat : {} Orang",
                report.summary.distinct_persons
            ),
            style,
        );
        page.skip(20.0 + 10.0);
    }

    fn ranking(page: &mut Composer, report: &AuditReport, config: &ReportConfig) {
        Self::section_title(page, "II. DAFTAR PERINGKAT PELANGGAR TERTINGGI");
        page.skip(2.0);

        let widths = RANKING_COLUMNS.map(|(w, _)| w);
        let header = CellStyle::plain(FontStyle::Bold, 10.0, Tone::White, Align::Center)
            .boxed(Some(Tone::Accent));
        page.row(&widths, &RANKING_COLUMNS.map(|(_, h)| h), TABLE_HEADER_MM, &[header]);

        let body = CellStyle::plain(FontStyle::Regular, 10.0, Tone::Ink, Align::Center).boxed(None);
        for offender in report.top_offenders(config.top_offenders) {
            page.row(
                &widths,
                &[
                    offender.rank.to_string(),
                    offender.person_id.clone(),
                    format!("{} Kali", offender.total_violations),
                ],
                RANKING_ROW_MM,
                &[body, body.aligned(Align::Left), body],
            );
        }
    }

    fn detail_header(page: &mut Composer) {
        let header = CellStyle::plain(FontStyle::Bold, 8.0, Tone::White, Align::Center)
            .boxed(Some(Tone::Primary));
        page.row(
            &DETAIL_COLUMNS.map(|(w, _)| w),
            &DETAIL_COLUMNS.map(|(_, h)| h),
            TABLE_HEADER_MM,
            &[header],
        );
    }

    fn detail(page: &mut Composer, report: &AuditReport, config: &ReportConfig) {
        page.new_page();
        Self::section_title(page, "III. DATA DETAIL AKTIVITAS PEMERIKSAAN");
        page.skip(2.0);
        Self::detail_header(page);

        let widths = DETAIL_COLUMNS.map(|(w, _)| w);
        for (index, violation) in report.violations.iter().enumerate() {
            if page.y > config.page_break_mm {
                page.new_page();
                Self::detail_header(page);
            }

            let number = index + 1;
            let fill = (number % 2 == 0).then_some(Tone::Zebra);
            let body = CellStyle::plain(FontStyle::Regular, 7.5, Tone::Ink, Align::Center).boxed(fill);
            let left = body.aligned(Align::Left);

            let row = DetailRow::from_violation(violation);
            page.row(
                &widths,
                &[
                    number.to_string(),
                    row.trx_date,
                    truncate(&row.auth_name, NAME_LIMIT),
                    row.shift_in,
                    row.shift_out,
                    row.create_tim,
                    row.delta,
                    row.source,
                ],
                config.row_height_mm,
                &[body, body, left, body, body, body, body, left],
            );
            page.current.detail_rows.push(index);
        }
    }

    fn footer(page: &mut Composer, generated_at: DateTime<Utc>) {
        page.skip(5.0);
        if page.y + SECTION_HEIGHT_MM > AUTO_BREAK_MM {
            page.new_page();
        }
        page.line(
            SECTION_HEIGHT_MM,
            format!(
                "Dokumen ini bersifat rahasia. Dibuat secara otomatis pada: {}",
                generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            CellStyle::plain(FontStyle::Italic, 8.0, Tone::Muted, Align::Right),
        );
    }

    /// Returns the number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Iterates over every text cell in the document, page by page.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.pages.iter().flat_map(|p| &p.elements).filter_map(|e| match e {
            Element::Cell(cell) => Some(cell),
            Element::Band { .. } => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AuditPeriod, AuditStatus, AuditSummary, DeltaDirection, OffenderRank, RunStats,
        SourceCategory, TemporalHeatmap, ViolationRecord,
    };
    use chrono::{NaiveDate, NaiveTime, TimeZone};
    use uuid::Uuid;

    fn report_with(violations: usize) -> AuditReport {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let violations: Vec<ViolationRecord> = (0..violations)
            .map(|i| ViolationRecord {
                person_id: format!("PERSON {}", i % 7),
                date,
                shift_in: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                shift_out: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                activity_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
                source_tag: SourceCategory::Return,
                delta_minutes: 60,
                delta_direction: DeltaDirection::After,
            })
            .collect();
        let ranking = (0..7.min(violations.len()))
            .map(|i| OffenderRank {
                rank: i + 1,
                person_id: format!("PERSON {}", i),
                total_violations: 1,
            })
            .collect();

        AuditReport {
            audit_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            engine_version: "test".to_string(),
            period: AuditPeriod::new(date, date).unwrap(),
            status: if violations.is_empty() {
                AuditStatus::Clean
            } else {
                AuditStatus::ViolationsFound
            },
            summary: AuditSummary {
                total_violations: violations.len(),
                distinct_persons: 7.min(violations.len()),
                top_source: None,
            },
            ranking,
            by_source: Vec::new(),
            heatmap: TemporalHeatmap::default(),
            violations,
            stats: RunStats::default(),
        }
    }

    fn compose(report: &AuditReport) -> ReportDocument {
        let stamp = Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap();
        ReportDocument::compose(report, &ReportConfig::default(), stamp)
    }

    fn all_detail_rows(doc: &ReportDocument) -> Vec<usize> {
        doc.pages.iter().flat_map(|p| p.detail_rows.iter().copied()).collect()
    }

    #[test]
    fn test_detail_starts_on_second_page() {
        let doc = compose(&report_with(3));

        assert_eq!(doc.page_count(), 2);
        assert!(doc.pages[0].detail_rows.is_empty());
        assert_eq!(doc.pages[1].detail_rows, vec![0, 1, 2]);
    }

    #[test]
    fn test_first_detail_page_fits_nineteen_rows() {
        let doc = compose(&report_with(19));
        assert_eq!(doc.pages[1].detail_rows.len(), 19);

        let doc = compose(&report_with(20));
        assert_eq!(doc.pages[1].detail_rows.len(), 19);
        assert_eq!(doc.pages[2].detail_rows, vec![19]);
    }

    #[test]
    fn test_continuation_pages_fit_twenty_one_rows() {
        let doc = compose(&report_with(19 + 21 + 1));
        assert_eq!(doc.pages[2].detail_rows.len(), 21);
        assert_eq!(doc.pages[3].detail_rows.len(), 1);
    }

    #[test]
    fn test_every_row_appears_once_in_order() {
        let doc = compose(&report_with(137));
        assert_eq!(all_detail_rows(&doc), (0..137).collect::<Vec<_>>());
    }

    #[test]
    fn test_no_row_starts_past_the_break_line() {
        let doc = compose(&report_with(90));
        let row_height = ReportConfig::default().row_height_mm;

        for cell in doc.cells().filter(|c| c.height_mm == row_height) {
            assert!(cell.y_mm <= ReportConfig::default().page_break_mm);
            assert!(cell.y_mm + cell.height_mm <= AUTO_BREAK_MM);
        }
    }

    #[test]
    fn test_header_repeats_on_each_detail_page() {
        // 19 + 21 + 5 rows leaves room for the footer on the last page.
        let doc = compose(&report_with(45));
        let header_pages = doc
            .pages
            .iter()
            .filter(|p| {
                p.elements
                    .iter()
                    .any(|e| matches!(e, Element::Cell(c) if c.text == "Tipe Aktivitas"))
            })
            .count();
        assert_eq!(doc.page_count(), 4);
        assert_eq!(header_pages, 3);
    }

    #[test]
    fn test_footer_spills_onto_its_own_page() {
        // A full first detail page leaves no room above the auto break line.
        let doc = compose(&report_with(19));
        assert_eq!(doc.page_count(), 3);
        assert!(doc.pages[2].detail_rows.is_empty());
        assert!(doc.pages[2]
            .elements
            .iter()
            .any(|e| matches!(e, Element::Cell(c) if c.text.starts_with("Dokumen"))));
    }

    #[test]
    fn test_header_summary_and_footer_text() {
        let doc = compose(&report_with(3));
        let texts: Vec<&str> = doc.cells().map(|c| c.text.as_str()).collect();

        assert!(texts.contains(&"OFFICIAL AUDIT REPORT"));
        assert!(texts.contains(&"Periode Pemeriksaan: 2024-01-10 s/d 2024-01-10"));
        assert!(texts.contains(&"Total Pelanggaran Aktivitas : 3 Kasus"));
        assert!(texts.contains(&"Total Personel Terlibat : 3 Orang"));
        assert!(texts.contains(
            &"Dokumen ini bersifat rahasia. Dibuat secara otomatis pada: 2024-02-01 09:30:00 UTC"
        ));
        assert!(texts.contains(&"+60 Min"));
    }

    #[test]
    fn test_ranking_lists_top_five_only() {
        let doc = compose(&report_with(20));
        let kali = doc.pages[0]
            .elements
            .iter()
            .filter(|e| matches!(e, Element::Cell(c) if c.text.ends_with(" Kali")))
            .count();
        assert_eq!(kali, 5);
    }

    #[test]
    fn test_clean_report_still_has_detail_page_and_footer() {
        let doc = compose(&report_with(0));

        assert_eq!(doc.page_count(), 2);
        assert!(all_detail_rows(&doc).is_empty());
        assert!(doc.cells().any(|c| c.text.starts_with("Dokumen ini bersifat rahasia")));
    }

    #[test]
    fn test_zebra_fill_on_even_rows() {
        let doc = compose(&report_with(2));
        let numbered: Vec<&Cell> = doc.pages[1]
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Cell(c) if c.width_mm == 10.0 && c.text != "No" => Some(c),
                _ => None,
            })
            .collect();

        assert_eq!(numbered[0].style.fill, None);
        assert_eq!(numbered[1].style.fill, Some(Tone::Zebra));
    }

    #[test]
    fn test_long_names_are_truncated() {
        assert_eq!(truncate("ABCDEFGHIJ", 4), "ABCD");
        assert_eq!(truncate("ÄÖÜ", 2), "ÄÖ");
    }
}
