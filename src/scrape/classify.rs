//! Row classification for one fetched results table.
//!
//! Scanning is a two-state machine: no open group, or one open
//! `TypeGroup` buffering items. A group is only appended to the output
//! at a boundary (next header row or end of table), so a header with no
//! items is still retained.

use scraper::{ElementRef, Html, Selector};

use crate::domain::NO_TYPE;
use crate::model::{ItemRecord, TypeGroup};

/// Explicit open/close accumulator threaded through the row scan.
/// Also reused by the CSV fallback, which mirrors the same semantics
/// with a file-native row convention.
pub(crate) struct GroupScan {
    closed: Vec<TypeGroup>,
    open: Option<TypeGroup>,
}

impl GroupScan {
    pub(crate) fn new() -> Self {
        Self { closed: Vec::new(), open: None }
    }

    /// Close any open group and start a new one.
    pub(crate) fn open_group(&mut self, group: TypeGroup) {
        if let Some(done) = self.open.replace(group) {
            self.closed.push(done);
        }
    }

    /// Append an item to the open group. With no group open the row is
    /// dropped; that only happens on malformed pages.
    pub(crate) fn push_item(&mut self, item: ItemRecord) {
        if let Some(group) = self.open.as_mut() {
            group.items.push(item);
        }
    }

    pub(crate) fn has_open(&self) -> bool {
        self.open.is_some()
    }

    pub(crate) fn finish(mut self) -> Vec<TypeGroup> {
        if let Some(done) = self.open.take() {
            self.closed.push(done);
        }
        self.closed
    }
}

enum RowKind {
    Header,
    SubItem,
    Plain,
}

fn row_kind(first_cell: &ElementRef<'_>) -> RowKind {
    if first_cell.value().classes().any(|c| c == "tb_item") {
        RowKind::Header
    } else if first_cell.value().classes().any(|c| c == "tb_subitem") {
        RowKind::SubItem
    } else {
        RowKind::Plain
    }
}

fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Classify a marker table (production / processing / commercialization):
/// the leading header row is skipped, `tb_item` cells open a type group
/// with the row's quantity as the group total, `tb_subitem` cells append
/// items. Rows with fewer than two cells are ignored.
pub fn classify_marker(page: &Html, year: i32, unit: &str) -> Vec<TypeGroup> {
    let row_selector = selector("table.tb_dados tr");
    let cell_selector = selector("td");
    let mut scan = GroupScan::new();

    for row in page.select(&row_selector).skip(1) {
        let cells: Vec<ElementRef<'_>> = row.select(&cell_selector).collect();
        if cells.len() < 2 {
            continue;
        }
        let title = cell_text(&cells[0]);
        let quantity = cell_text(&cells[1]);
        match row_kind(&cells[0]) {
            RowKind::Header => scan.open_group(TypeGroup::new(title, year, quantity)),
            RowKind::SubItem => scan.push_item(ItemRecord::plain(title, quantity, unit)),
            RowKind::Plain => {}
        }
    }

    scan.finish()
}

/// Classify a trade table (import / export): rows carry no markers, so
/// every row with at least three cells becomes one country item under a
/// single synthetic "no type" group, opened lazily. The live path never
/// parses quantities, so the group total stays empty.
pub fn classify_trade(page: &Html, year: i32, unit: &str, value_unit: &str) -> Vec<TypeGroup> {
    let row_selector = selector("table.tb_dados tr");
    let cell_selector = selector("td");
    let mut scan = GroupScan::new();

    for row in page.select(&row_selector) {
        let cells: Vec<ElementRef<'_>> = row.select(&cell_selector).collect();
        if cells.len() < 3 {
            continue;
        }
        if !scan.has_open() {
            scan.open_group(TypeGroup::new(NO_TYPE, year, String::new()));
        }
        scan.push_item(ItemRecord::with_value(
            cell_text(&cells[0]),
            cell_text(&cells[1]),
            unit,
            cell_text(&cells[2]),
            value_unit,
        ));
    }

    scan.finish()
}
