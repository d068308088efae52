//! Static configuration for the five statistics domains served by the
//! upstream portal. Option codes, units, table shapes and the snapshot
//! file map all live here so the pipeline and the fallback stay in sync.

use std::ops::RangeInclusive;

/// Group title used when a domain has no sub-categories.
pub const NO_CATEGORY: &str = "no category";

/// Synthetic type title for trade tables, which carry no type markers.
pub const NO_TYPE: &str = "no type";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Production,
    Processing,
    Commercialization,
    Import,
    Export,
}

/// How a domain's results table is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableShape {
    /// Two-column table with `tb_item`/`tb_subitem` cell markers and a
    /// leading header row.
    Marker,
    /// Three-column country/quantity/value table with no markers and no
    /// header row convention.
    Trade,
}

/// One bundled CSV snapshot backing the fallback for a (domain, category).
#[derive(Debug, Clone, Copy)]
pub struct CsvSource {
    pub category: u8,
    pub label: &'static str,
    pub file: &'static str,
    pub delimiter: u8,
}

const PRODUCTION_FILES: &[CsvSource] = &[CsvSource {
    category: 0,
    label: NO_CATEGORY,
    file: "Producao.csv",
    delimiter: b';',
}];

const PROCESSING_FILES: &[CsvSource] = &[
    CsvSource { category: 1, label: "Viníferas", file: "ProcessaViniferas.csv", delimiter: b'\t' },
    CsvSource { category: 2, label: "Americanas e híbridas", file: "ProcessaAmericanas.csv", delimiter: b'\t' },
    CsvSource { category: 3, label: "Uvas de mesa", file: "ProcessaMesa.csv", delimiter: b'\t' },
    CsvSource { category: 4, label: "Sem classificação", file: "ProcessaSemclass.csv", delimiter: b'\t' },
];

const COMMERCIALIZATION_FILES: &[CsvSource] = &[CsvSource {
    category: 0,
    label: NO_CATEGORY,
    file: "Comercio.csv",
    delimiter: b';',
}];

const IMPORT_FILES: &[CsvSource] = &[
    CsvSource { category: 1, label: "Vinhos de mesa", file: "ImpVinhos.csv", delimiter: b'\t' },
    CsvSource { category: 2, label: "Espumantes", file: "ImpEspumantes.csv", delimiter: b'\t' },
    CsvSource { category: 3, label: "Uvas frescas", file: "ImpFrescas.csv", delimiter: b'\t' },
    CsvSource { category: 4, label: "Uvas passas", file: "ImpPassas.csv", delimiter: b'\t' },
    CsvSource { category: 5, label: "Suco de uva", file: "ImpSuco.csv", delimiter: b'\t' },
];

// The upstream project read Imp* files in one export path; that was a
// copy-paste defect, export reads the export-named snapshots here.
const EXPORT_FILES: &[CsvSource] = &[
    CsvSource { category: 1, label: "Vinhos de mesa", file: "ExpVinho.csv", delimiter: b'\t' },
    CsvSource { category: 2, label: "Espumantes", file: "ExpEspumante.csv", delimiter: b'\t' },
    CsvSource { category: 3, label: "Uvas frescas", file: "ExpUva.csv", delimiter: b'\t' },
    CsvSource { category: 4, label: "Suco de uva", file: "ExpSuco.csv", delimiter: b'\t' },
];

impl Domain {
    /// Digit appended to the base URL (`opcao=opt_0` + code).
    pub fn option_code(self) -> u8 {
        match self {
            Domain::Production => 2,
            Domain::Processing => 3,
            Domain::Commercialization => 4,
            Domain::Import => 5,
            Domain::Export => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Production => "production",
            Domain::Processing => "processing",
            Domain::Commercialization => "commercialization",
            Domain::Import => "import",
            Domain::Export => "export",
        }
    }

    /// Domain constant, not derived from the page: litres for wine and
    /// grape liquids, kilograms for processed solids and trade weights.
    pub fn quantity_unit(self) -> &'static str {
        match self {
            Domain::Production | Domain::Commercialization => "L",
            Domain::Processing | Domain::Import | Domain::Export => "Kg",
        }
    }

    pub fn value_unit(self) -> Option<&'static str> {
        match self.table_shape() {
            TableShape::Trade => Some("US$"),
            TableShape::Marker => None,
        }
    }

    pub fn table_shape(self) -> TableShape {
        match self {
            Domain::Import | Domain::Export => TableShape::Trade,
            _ => TableShape::Marker,
        }
    }

    /// Valid explicit `category` query values, where the domain has any.
    pub fn category_bounds(self) -> Option<RangeInclusive<u8>> {
        match self {
            Domain::Processing => Some(1..=4),
            Domain::Import => Some(1..=5),
            Domain::Export => Some(1..=4),
            _ => None,
        }
    }

    pub fn has_subcategories(self) -> bool {
        self.category_bounds().is_some()
    }

    pub fn csv_sources(self) -> &'static [CsvSource] {
        match self {
            Domain::Production => PRODUCTION_FILES,
            Domain::Processing => PROCESSING_FILES,
            Domain::Commercialization => COMMERCIALIZATION_FILES,
            Domain::Import => IMPORT_FILES,
            Domain::Export => EXPORT_FILES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_codes_match_portal_suffixes() {
        assert_eq!(Domain::Production.option_code(), 2);
        assert_eq!(Domain::Export.option_code(), 6);
    }

    #[test]
    fn trade_domains_carry_value_unit() {
        assert_eq!(Domain::Import.value_unit(), Some("US$"));
        assert_eq!(Domain::Production.value_unit(), None);
    }

    #[test]
    fn category_bounds_per_domain() {
        assert_eq!(Domain::Processing.category_bounds(), Some(1..=4));
        assert_eq!(Domain::Import.category_bounds(), Some(1..=5));
        assert!(Domain::Commercialization.category_bounds().is_none());
    }
}
