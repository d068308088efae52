//! CSV snapshot fallback: rebuilds the category → type → item tree from
//! the bundled delimited files whenever the live pipeline fails.
//!
//! Marker-domain files mirror the page's CSS classification with a
//! file-native convention: a data row whose second field's third
//! character is `_` is a sub-item, anything else opens a type header.
//! Failure here is terminal — there is no further degradation.

mod trade;

use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::domain::{CsvSource, Domain, TableShape};
use crate::error::FallbackError;
use crate::model::{CategoryGroup, ItemRecord, TypeGroup};
use crate::scrape::classify::GroupScan;

// Fixed layout of the marker snapshots: id;control;product;<year columns>.
const CONTROL_FIELD: usize = 1;
const PRODUCT_FIELD: usize = 2;
const MARKER_YEAR_OFFSET: usize = 3;

/// Character position inside the control field that separates sub-items
/// (`vm_Tinto`) from type headers (`VINHO DE MESA`).
const SUBITEM_MARK_POS: usize = 2;

/// Rebuild the response tree for one domain request from the snapshots.
pub fn reconstruct(
    data_dir: &Path,
    domain: Domain,
    year_token: &str,
    category: u8,
) -> Result<Vec<CategoryGroup>, FallbackError> {
    let mut groups = Vec::new();
    // A category with no snapshot in the file map is simply absent.
    for source in domain
        .csv_sources()
        .iter()
        .filter(|s| category == 0 || s.category == category)
    {
        let path = data_dir.join(source.file);
        debug!(path = %path.display(), domain = domain.as_str(), "reconstructing from snapshot");
        let types = match domain.table_shape() {
            TableShape::Marker => reconstruct_marker(&path, source, year_token, domain)?,
            TableShape::Trade => trade::reconstruct_trade(&path, source, year_token, domain)?,
        };
        groups.push(CategoryGroup { title: source.label.to_string(), types });
    }
    Ok(groups)
}

fn reconstruct_marker(
    path: &Path,
    source: &CsvSource,
    year_token: &str,
    domain: Domain,
) -> Result<Vec<TypeGroup>, FallbackError> {
    let header = read_header(path, source.delimiter)?;
    let years = resolve_years(&header, MARKER_YEAR_OFFSET, year_token)?;
    let unit = domain.quantity_unit();

    let mut types = Vec::new();
    // Full re-read per year, mirroring the one-fetch-per-year live shape.
    for year in years {
        let year_index = year_column(path, &header, year)?;
        let mut reader = open_reader(path, source.delimiter)?;
        let mut record = StringRecord::new();
        let mut scan = GroupScan::new();
        let mut first = true;
        while reader
            .read_record(&mut record)
            .map_err(|source| FallbackError::Csv { path: path.to_path_buf(), source })?
        {
            if first {
                // Header row.
                first = false;
                continue;
            }
            let (Some(control), Some(product)) =
                (record.get(CONTROL_FIELD), record.get(PRODUCT_FIELD))
            else {
                continue;
            };
            let Some(quantity) = record.get(year_index) else {
                continue;
            };
            let product = product.trim().to_string();
            let quantity = quantity.trim().to_string();
            if is_subitem(control) {
                scan.push_item(ItemRecord::plain(product, quantity, unit));
            } else {
                scan.open_group(TypeGroup::new(product, year, quantity));
            }
        }
        types.extend(scan.finish());
    }
    Ok(types)
}

fn is_subitem(control: &str) -> bool {
    control.chars().nth(SUBITEM_MARK_POS) == Some('_')
}

pub(crate) fn open_reader(
    path: &Path,
    delimiter: u8,
) -> Result<csv::Reader<std::fs::File>, FallbackError> {
    let file = std::fs::File::open(path)
        .map_err(|source| FallbackError::Io { path: path.to_path_buf(), source })?;
    Ok(ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(file))
}

pub(crate) fn read_header(path: &Path, delimiter: u8) -> Result<StringRecord, FallbackError> {
    let mut reader = open_reader(path, delimiter)?;
    let mut record = StringRecord::new();
    let got = reader
        .read_record(&mut record)
        .map_err(|source| FallbackError::Csv { path: path.to_path_buf(), source })?;
    if !got {
        return Err(FallbackError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "empty snapshot file"),
        });
    }
    Ok(record)
}

/// Year resolution inside the fallback: the live path reads "all" off
/// the page label, here it expands to every year column in the header.
pub(crate) fn resolve_years(
    header: &StringRecord,
    offset: usize,
    token: &str,
) -> Result<Vec<i32>, FallbackError> {
    let token = token.trim();
    if token.is_empty() || token.eq_ignore_ascii_case("all") {
        return Ok(header
            .iter()
            .skip(offset)
            .filter_map(|column| column.trim().parse::<i32>().ok())
            .collect());
    }
    let year = token
        .parse::<i32>()
        .map_err(|_| FallbackError::YearToken(token.to_string()))?;
    Ok(vec![year])
}

/// Locate the requested year by exact string match on the header.
/// A missing column is terminal, not a soft skip.
pub(crate) fn year_column(
    path: &Path,
    header: &StringRecord,
    year: i32,
) -> Result<usize, FallbackError> {
    let label = year.to_string();
    header
        .iter()
        .position(|column| column.trim() == label)
        .ok_or(FallbackError::MissingYear { path: path.to_path_buf(), year })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;
    use crate::domain::NO_CATEGORY;

    fn write_file(dir: &TempDir, name: &str, content: &str) {
        let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    const PRODUCAO: &str = "\
id;control;produto;1970;1971\n\
1;VINHO DE MESA;VINHO DE MESA;217.208;300.100\n\
2;vm_Tinto;Tinto;174.224;250.000\n\
3;vm_Branco;Branco;27.910;40.000\n\
4;SUCO;SUCO;1.010;2.020\n\
5;su_Integral;Integral;1.010;2.020\n";

    #[test]
    fn marker_snapshot_rebuilds_the_tree() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "Producao.csv", PRODUCAO);

        let groups = reconstruct(dir.path(), Domain::Production, "1970", 0).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].title, NO_CATEGORY);
        let types = &groups[0].types;
        assert_eq!(types.len(), 2);
        assert_eq!(types[0].title, "VINHO DE MESA");
        assert_eq!(types[0].total_quantity, "217.208");
        assert_eq!(types[0].year, 1970);
        assert_eq!(types[0].items.len(), 2);
        assert_eq!(types[0].items[1].title, "Branco");
        assert_eq!(types[0].items[1].quantity, "27.910");
        assert_eq!(types[0].items[1].quantity_unit, "L");
        assert_eq!(types[1].title, "SUCO");
    }

    #[test]
    fn all_years_expand_from_the_header() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "Producao.csv", PRODUCAO);

        let groups = reconstruct(dir.path(), Domain::Production, "all", 0).unwrap();
        let years: Vec<i32> = groups[0].types.iter().map(|t| t.year).collect();
        // Two full per-year passes, submission order preserved.
        assert_eq!(years, vec![1970, 1970, 1971, 1971]);
        assert_eq!(groups[0].types[2].total_quantity, "300.100");
    }

    #[test]
    fn missing_year_column_is_terminal() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "Producao.csv", PRODUCAO);

        let err = reconstruct(dir.path(), Domain::Production, "1999", 0).unwrap_err();
        assert!(matches!(err, FallbackError::MissingYear { year: 1999, .. }));
    }

    #[test]
    fn missing_file_is_terminal() {
        let dir = TempDir::new().unwrap();
        let err = reconstruct(dir.path(), Domain::Production, "1970", 0).unwrap_err();
        assert!(matches!(err, FallbackError::Io { .. }));
    }

    #[test]
    fn category_filter_selects_one_snapshot() {
        let dir = TempDir::new().unwrap();
        let vini = "id\tcontrol\tcultivar\t2010\n1\tTINTAS\tTINTAS\t100\n2\tti_Bordô\tBordô\t100\n";
        let amer = "id\tcontrol\tcultivar\t2010\n1\tBRANCAS\tBRANCAS\t50\n";
        write_file(&dir, "ProcessaViniferas.csv", vini);
        write_file(&dir, "ProcessaAmericanas.csv", amer);

        let groups = reconstruct(dir.path(), Domain::Processing, "2010", 1).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].title, "Viníferas");
        assert_eq!(groups[0].types[0].items[0].quantity_unit, "Kg");
    }

    #[test]
    fn snapshot_and_live_classifier_agree_on_equivalent_data() {
        // The same header/item structure expressed as page markup and as
        // a snapshot file must reconstruct structurally equal groups.
        let dir = TempDir::new().unwrap();
        write_file(&dir, "Producao.csv", PRODUCAO);
        let from_csv = reconstruct(dir.path(), Domain::Production, "1970", 0).unwrap();

        let page = scraper::Html::parse_document(
            r#"<html><body><table class="tb_dados">
                 <tr><th>Produto</th><th>Quantidade (L.)</th></tr>
                 <tr><td class="tb_item">VINHO DE MESA</td><td class="tb_item">217.208</td></tr>
                 <tr><td class="tb_subitem">Tinto</td><td class="tb_subitem">174.224</td></tr>
                 <tr><td class="tb_subitem">Branco</td><td class="tb_subitem">27.910</td></tr>
                 <tr><td class="tb_item">SUCO</td><td class="tb_item">1.010</td></tr>
                 <tr><td class="tb_subitem">Integral</td><td class="tb_subitem">1.010</td></tr>
               </table></body></html>"#,
        );
        let from_page = crate::scrape::classify::classify_marker(&page, 1970, "L");

        assert_eq!(from_csv[0].types, from_page);
    }

    #[test]
    fn control_marker_distinguishes_rows() {
        assert!(is_subitem("vm_Tinto"));
        assert!(is_subitem("ti_Bordô"));
        assert!(!is_subitem("VINHO DE MESA"));
        assert!(!is_subitem("vm"));
    }
}
