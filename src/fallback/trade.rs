//! Trade-domain (import/export) snapshot reconstruction.
//!
//! Trade files pair a quantity column and a value column per year
//! (`1970`, `1970.1`, …). This is the one path that parses digits: the
//! per-country quantities are summed into the synthetic group's
//! `total_quantity`. The file is re-read from the top for every
//! requested year.

use std::path::Path;

use csv::StringRecord;

use crate::domain::{CsvSource, Domain, NO_TYPE};
use crate::error::FallbackError;
use crate::model::{ItemRecord, TypeGroup};

use super::{open_reader, read_header, resolve_years, year_column};

// Trade snapshot layout: id, country, then quantity/value column pairs.
const COUNTRY_FIELD: usize = 1;
const TRADE_YEAR_OFFSET: usize = 2;

pub(super) fn reconstruct_trade(
    path: &Path,
    source: &CsvSource,
    year_token: &str,
    domain: Domain,
) -> Result<Vec<TypeGroup>, FallbackError> {
    let header = read_header(path, source.delimiter)?;
    let years = resolve_years(&header, TRADE_YEAR_OFFSET, year_token)?;
    let unit = domain.quantity_unit();
    let value_unit = domain.value_unit().unwrap_or_default();

    let mut types = Vec::new();
    for year in years {
        let quantity_index = year_column(path, &header, year)?;
        let value_index = quantity_index + 1;

        let mut reader = open_reader(path, source.delimiter)?;
        let mut record = StringRecord::new();
        let mut items = Vec::new();
        let mut total: i64 = 0;
        let mut first = true;
        while reader
            .read_record(&mut record)
            .map_err(|source| FallbackError::Csv { path: path.to_path_buf(), source })?
        {
            if first {
                // Header skipped again on every per-year pass.
                first = false;
                continue;
            }
            let (Some(country), Some(quantity)) =
                (record.get(COUNTRY_FIELD), record.get(quantity_index))
            else {
                continue;
            };
            let quantity = quantity.trim().to_string();
            let value = record.get(value_index).unwrap_or_default().trim().to_string();
            total += parse_locale_int(&quantity);
            items.push(ItemRecord::with_value(
                country.trim(),
                quantity,
                unit,
                value,
                value_unit,
            ));
        }

        if items.is_empty() {
            // Matches the live path's lazy group: no rows, no group.
            continue;
        }
        let mut group = TypeGroup::new(NO_TYPE, year, total.to_string());
        group.items = items;
        types.push(group);
    }
    Ok(types)
}

/// Strip the `.` thousands separators and read the digits. Placeholder
/// markers ("nd", "*", empty) count as zero rather than poisoning the sum.
fn parse_locale_int(raw: &str) -> i64 {
    raw.replace('.', "").trim().parse::<i64>().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::TempDir;

    use super::super::reconstruct;
    use super::*;
    use crate::domain::Domain;

    fn write_file(dir: &TempDir, name: &str, content: &str) {
        let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    const IMP_VINHOS: &str = "\
Id\tPaís\t1970\t1970.1\t1971\t1971.1\n\
1\tArgentina\t1.200\t3.400\t500\t900\n\
2\tChile\t800\t2.100\t250\t400\n";

    #[test]
    fn sums_dot_stripped_quantities_into_the_total() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "ImpVinhos.csv", IMP_VINHOS);

        let groups = reconstruct(dir.path(), Domain::Import, "1970", 1).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].title, "Vinhos de mesa");
        let group = &groups[0].types[0];
        assert_eq!(group.title, NO_TYPE);
        assert_eq!(group.total_quantity, "2000");
        assert_eq!(group.items.len(), 2);
        // Quantities stay verbatim on the items; only the total is parsed.
        assert_eq!(group.items[0].quantity, "1.200");
        assert_eq!(group.items[0].value.as_deref(), Some("3.400"));
        assert_eq!(group.items[0].value_unit.as_deref(), Some("US$"));
        assert_eq!(group.items[1].quantity_unit, "Kg");
    }

    #[test]
    fn value_comes_from_the_paired_column() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "ImpVinhos.csv", IMP_VINHOS);

        let groups = reconstruct(dir.path(), Domain::Import, "1971", 1).unwrap();
        let group = &groups[0].types[0];
        assert_eq!(group.total_quantity, "750");
        assert_eq!(group.items[1].quantity, "250");
        assert_eq!(group.items[1].value.as_deref(), Some("400"));
    }

    #[test]
    fn all_years_re_read_the_file_per_year() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "ImpVinhos.csv", IMP_VINHOS);

        let groups = reconstruct(dir.path(), Domain::Import, "all", 1).unwrap();
        let years: Vec<i32> = groups[0].types.iter().map(|t| t.year).collect();
        // The `1970.1` value columns never parse as years.
        assert_eq!(years, vec![1970, 1971]);
    }

    #[test]
    fn export_reads_export_named_snapshots() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "ExpVinho.csv", IMP_VINHOS);

        let groups = reconstruct(dir.path(), Domain::Export, "1970", 1).unwrap();
        assert_eq!(groups[0].title, "Vinhos de mesa");
        assert_eq!(groups[0].types[0].total_quantity, "2000");
    }

    #[test]
    fn missing_trade_year_is_terminal() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "ImpVinhos.csv", IMP_VINHOS);

        let err = reconstruct(dir.path(), Domain::Import, "1980", 1).unwrap_err();
        assert!(matches!(err, FallbackError::MissingYear { year: 1980, .. }));
    }

    #[test]
    fn placeholder_quantities_count_as_zero() {
        assert_eq!(parse_locale_int("1.234.567"), 1234567);
        assert_eq!(parse_locale_int("nd"), 0);
        assert_eq!(parse_locale_int(""), 0);
    }
}
